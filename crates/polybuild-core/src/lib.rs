//! # polybuild Core Library
//!
//! A headless engine for building polymer molecule topologies interactively: a residue
//! graph assembled block by block, laid out in two dimensions, zoomed and panned, and
//! handed to an external topology generator.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that the numerical parts stay
//! pure and testable while the event bookkeeping lives in one place.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularGraph`, `BlockList`),
//!   file readers and writers, force-field library discovery, block architectures and the
//!   layout and viewport mathematics.
//!
//! - **[`engine`]: The Logic Core.** The stateful `Session` that owns the graph, the block
//!   list, the layout cache and the view state, dispatches user events, builds scenes for a
//!   rendering canvas and delegates topology generation.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built on the engine, such as
//!   replaying a script of user events against a fresh session.

pub mod core;
pub mod engine;
pub mod workflows;
