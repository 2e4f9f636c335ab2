use super::ids::{NodeId, NodeRange};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stereo label carried by a residue when the force field distinguishes tacticity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chirality {
    R,
    S,
}

impl Chirality {
    pub fn flipped(self) -> Self {
        match self {
            Chirality::R => Chirality::S,
            Chirality::S => Chirality::R,
        }
    }
}

impl fmt::Display for Chirality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Chirality::R => "R",
            Chirality::S => "S",
        })
    }
}

#[derive(Debug, Error)]
#[error("Invalid chirality label '{0}', expected 'R' or 'S'")]
pub struct ParseChiralityError(String);

impl FromStr for Chirality {
    type Err = ParseChiralityError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "R" | "r" => Ok(Chirality::R),
            "S" | "s" => Ok(Chirality::S),
            other => Err(ParseChiralityError(other.to_string())),
        }
    }
}

/// Attributes attached to a residue node.
///
/// Only the attributes the builder interprets are typed; everything else read
/// from a node-link file is kept verbatim in `extra` so it survives a save.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resid: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tacticity: Option<Chirality>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeAttributes {
    pub fn with_resname(resname: &str) -> Self {
        Self {
            resname: Some(resname.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {0} is not part of the graph")]
    MissingNode(NodeId),
    #[error("Self-links are not allowed (node {0})")]
    SelfLoop(NodeId),
    #[error("Node {0} is already part of the graph")]
    DuplicateNode(NodeId),
    #[error("Node id {0} leaves no room for further ids")]
    IdOutOfRange(NodeId),
}

/// Undirected residue graph: nodes are monomer units, edges are links between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MolecularGraph {
    nodes: BTreeMap<NodeId, NodeAttributes>,
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    next_id: usize,
}

impl MolecularGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its freshly assigned id.
    pub fn add_node(&mut self, attributes: NodeAttributes) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, attributes);
        self.adjacency.insert(id, BTreeSet::new());
        id
    }

    /// Inserts a node under an explicit id, as needed when reading a saved graph.
    ///
    /// Leaves the graph untouched if the id is taken or is the largest
    /// representable id, since the counter could not move past it.
    pub fn insert_node(
        &mut self,
        id: NodeId,
        attributes: NodeAttributes,
    ) -> Result<(), GraphError> {
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        let after = id.0.checked_add(1).ok_or(GraphError::IdOutOfRange(id))?;
        self.nodes.insert(id, attributes);
        self.adjacency.insert(id, BTreeSet::new());
        self.next_id = self.next_id.max(after);
        Ok(())
    }

    /// Links two nodes. Returns `Ok(false)` if the link already existed.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool, GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        for id in [a, b] {
            if !self.nodes.contains_key(&id) {
                return Err(GraphError::MissingNode(id));
            }
        }
        let inserted = self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        Ok(inserted)
    }

    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let removed = self
            .adjacency
            .get_mut(&a)
            .is_some_and(|neighbors| neighbors.remove(&b));
        if let Some(neighbors) = self.adjacency.get_mut(&b) {
            neighbors.remove(&a);
        }
        removed
    }

    /// Removes a node together with every link touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<NodeAttributes> {
        let attributes = self.nodes.remove(&id)?;
        if let Some(neighbors) = self.adjacency.remove(&id) {
            for neighbor in neighbors {
                if let Some(set) = self.adjacency.get_mut(&neighbor) {
                    set.remove(&id);
                }
            }
        }
        Some(attributes)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|neighbors| neighbors.contains(&b))
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeAttributes> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeAttributes> {
        self.nodes.get_mut(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeAttributes)> {
        self.nodes.iter().map(|(id, attrs)| (*id, attrs))
    }

    /// Node ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(&id)
            .into_iter()
            .flat_map(|neighbors| neighbors.iter().copied())
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency.get(&id).map_or(0, BTreeSet::len)
    }

    /// Every link exactly once, as `(lower, higher)` pairs in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency.iter().flat_map(|(&a, neighbors)| {
            neighbors
                .iter()
                .copied()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The id the next added node will receive.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.next_id)
    }

    /// Merges `other` into this graph without touching existing ids.
    ///
    /// Incoming nodes are relabelled consecutively from [`Self::next_id`] in
    /// ascending order of their original ids; the returned range covers them.
    pub fn disjoint_union(&mut self, other: &MolecularGraph) -> NodeRange {
        let start = self.next_id;
        let mapping: BTreeMap<NodeId, NodeId> = other
            .nodes
            .iter()
            .map(|(old, attrs)| (*old, self.add_node(attrs.clone())))
            .collect();
        for (a, b) in other.edges() {
            let (Some(&new_a), Some(&new_b)) = (mapping.get(&a), mapping.get(&b)) else {
                continue;
            };
            self.adjacency.entry(new_a).or_default().insert(new_b);
            self.adjacency.entry(new_b).or_default().insert(new_a);
        }
        NodeRange::new(start, self.next_id)
    }

    /// Hop counts from `source` to every node reachable from it (breadth-first).
    pub fn shortest_path_lengths(&self, source: NodeId) -> BTreeMap<NodeId, usize> {
        let mut lengths = BTreeMap::new();
        if !self.contains_node(source) {
            return lengths;
        }
        let mut queue = VecDeque::from([source]);
        lengths.insert(source, 0);
        while let Some(current) = queue.pop_front() {
            let next = lengths[&current] + 1;
            for neighbor in self.neighbors(current) {
                if !lengths.contains_key(&neighbor) {
                    lengths.insert(neighbor, next);
                    queue.push_back(neighbor);
                }
            }
        }
        lengths
    }
}
