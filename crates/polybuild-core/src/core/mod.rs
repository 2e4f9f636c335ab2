//! # Core Module
//!
//! Stateless building blocks of the polymer builder: the residue graph and its
//! block bookkeeping, structure-file I/O, force-field library discovery, block
//! architectures, and the pure layout and viewport mathematics.
//!
//! ## Architecture
//!
//! - **Graph Representation** ([`models`]) - Node ids, the residue graph and the block list
//! - **File I/O** ([`io`]) - Node-link JSON and GROMACS `.itp` readers behind one registry
//! - **Force-Field Libraries** ([`library`]) - Discovery of the monomer blocks a library provides
//! - **Block Generation** ([`architecture`]) - Linear, comb, tree and carbohydrate residue graphs
//! - **Layout** ([`layout`]) - Stress-majorisation layout, its cache and the viewport transform
//!
//! Nothing in this module holds session state; the [`crate::engine`] layer owns
//! the graph, its layout and the view between events.

pub mod architecture;
pub mod io;
pub mod layout;
pub mod library;
pub mod models;
