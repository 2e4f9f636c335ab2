use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a residue node inside a [`MolecularGraph`](super::graph::MolecularGraph).
///
/// Ids are handed out in insertion order and are never reused, so removing a
/// node leaves a gap instead of renumbering the rest of the graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn offset(self, by: usize) -> Self {
        NodeId(self.0 + by)
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A half-open, contiguous run of node ids (`start..end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeRange {
    pub start: NodeId,
    pub end: NodeId,
}

impl NodeRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: NodeId(start),
            end: NodeId(end.max(start)),
        }
    }

    pub fn len(&self) -> usize {
        self.end.0 - self.start.0
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.start <= id && id < self.end
    }

    /// Returns the id at zero-based position `index` within the range.
    pub fn get(&self, index: usize) -> Option<NodeId> {
        (index < self.len()).then(|| self.start.offset(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + use<> {
        (self.start.0..self.end.0).map(NodeId)
    }
}

impl fmt::Display for NodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_range_reports_length_and_membership() {
        let range = NodeRange::new(3, 5);
        assert_eq!(range.len(), 2);
        assert!(range.contains(NodeId(3)));
        assert!(range.contains(NodeId(4)));
        assert!(!range.contains(NodeId(5)));
        assert!(!range.contains(NodeId(2)));
    }

    #[test]
    fn node_range_get_is_zero_based_and_bounded() {
        let range = NodeRange::new(10, 13);
        assert_eq!(range.get(0), Some(NodeId(10)));
        assert_eq!(range.get(2), Some(NodeId(12)));
        assert_eq!(range.get(3), None);
    }

    #[test]
    fn inverted_bounds_collapse_to_an_empty_range() {
        let range = NodeRange::new(4, 1);
        assert!(range.is_empty());
        assert_eq!(range.iter().count(), 0);
    }

    #[test]
    fn node_id_serializes_as_a_bare_integer() {
        assert_eq!(serde_json::to_string(&NodeId(7)).unwrap(), "7");
    }
}
