use crate::core::models::ids::NodeId;
use nalgebra::Point2;
use std::collections::BTreeMap;

/// Normalised layout positions keyed by node id.
///
/// Coordinates are in layout space, each component within `[-1, 1]`; the
/// viewport turns them into canvas pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutCache {
    positions: BTreeMap<NodeId, Point2<f64>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<&Point2<f64>> {
        self.positions.get(&id)
    }

    pub fn insert(&mut self, id: NodeId, position: Point2<f64>) -> Option<Point2<f64>> {
        self.positions.insert(id, position)
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Point2<f64>> {
        self.positions.remove(&id)
    }

    /// Drops every entry whose node no longer satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.positions.retain(|id, _| keep(*id));
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn keys(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.positions.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Point2<f64>)> {
        self.positions.iter().map(|(id, point)| (*id, point))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }
}

impl FromIterator<(NodeId, Point2<f64>)> for LayoutCache {
    fn from_iter<T: IntoIterator<Item = (NodeId, Point2<f64>)>>(iter: T) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_drops_entries_of_removed_nodes() {
        let mut cache: LayoutCache = (0..4)
            .map(|i| (NodeId(i), Point2::new(i as f64, 0.0)))
            .collect();
        cache.retain(|id| id.index() % 2 == 0);
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec![NodeId(0), NodeId(2)]);
    }
}
