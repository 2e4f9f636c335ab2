//! # Layout Module
//!
//! Turns the residue graph into something drawable: [`stress`] assigns every
//! node a normalised 2D position, [`cache`] stores those positions between
//! edits, and [`viewport`] projects them onto canvas pixels under the current
//! zoom and pan. Everything here is pure; the session owns the state.

pub mod cache;
pub mod stress;
pub mod viewport;

pub use cache::LayoutCache;
pub use stress::{LayoutOptions, compute_layout};
pub use viewport::{Viewport, project, radius_for};

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Cannot lay out or size glyphs for a graph without nodes")]
    EmptyGraph,
}
