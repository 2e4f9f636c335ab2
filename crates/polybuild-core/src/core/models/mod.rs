//! # Core Models Module
//!
//! Data structures describing the polymer being assembled: the residue graph
//! and the ordered list of blocks that were added to it.
//!
//! - [`ids`] - Node identifiers and contiguous id ranges
//! - [`graph`] - The undirected residue graph and its node attributes
//! - [`block`] - Blocks, their node ranges and the labelled block list
//!
//! ```ignore
//! use polybuild::core::models::graph::{MolecularGraph, NodeAttributes};
//!
//! let mut graph = MolecularGraph::new();
//! let a = graph.add_node(NodeAttributes::with_resname("PEO"));
//! let b = graph.add_node(NodeAttributes::with_resname("PEO"));
//! graph.add_edge(a, b)?;
//! ```

pub mod block;
pub mod graph;
pub mod ids;
