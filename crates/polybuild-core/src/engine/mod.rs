//! # Engine Module
//!
//! The stateful layer of the builder. A [`session::Session`] owns the residue
//! graph, the block list, the layout cache and the view state, and turns user
//! events into consistent updates of all four.
//!
//! ## Architecture
//!
//! - **Session** ([`session`]) - Event handling and incremental redraw orchestration
//! - **Events** ([`events`]) - Event identifiers, payloads and the textual script form
//! - **Forms** ([`forms`]) - Architecture and link forms shown before an edit
//! - **View State** ([`state`]) - Zoom, pan and the derived session phase
//! - **Rendering** ([`render`], [`svg`]) - Scenes, palettes, the canvas seam and an SVG canvas
//! - **Topology Generation** ([`generator`]) - Delegation to the external generator
//! - **Configuration** ([`config`]) - Session settings and their builder
//! - **Progress Monitoring** ([`progress`]) - Callbacks for front ends following a replay
//! - **Error Handling** ([`error`]) - The error taxonomy every failing event is reported with

pub mod config;
pub mod error;
pub mod events;
pub mod forms;
pub mod generator;
pub mod progress;
pub mod render;
pub mod session;
pub mod state;
pub mod svg;
