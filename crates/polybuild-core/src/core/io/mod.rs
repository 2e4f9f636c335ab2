//! Provides input/output functionality for residue graph files.
//!
//! Structure files are turned into residue-level graphs that can be merged
//! into the session graph; the assembled graph is saved as node-link JSON,
//! which is what the external topology generator consumes.

pub mod itp;
pub mod node_link;
pub mod registry;
pub mod traits;
