//! Force-directed placement by stress majorisation.
//!
//! Every pair of residues is pulled towards a target separation equal to its
//! graph-theoretic distance (the Kamada–Kawai energy), with pair weights
//! `d^-2`. Positions are improved one node at a time with the localized
//! majorisation update, which decreases the stress monotonically and needs no
//! step-size tuning.

use super::LayoutError;
use super::cache::LayoutCache;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::NodeId;
use nalgebra::{Point2, Vector2};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::f64::consts::TAU;
use tracing::{debug, instrument, trace};

const COINCIDENT_EPSILON: f64 = 1e-9;
const NEIGHBOR_JITTER: f64 = 0.1;
const CIRCLE_JITTER: f64 = 0.01;

/// Tuning knobs for [`compute_layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Upper bound on full sweeps over all nodes.
    pub max_iterations: usize,
    /// Stop once no node moves further than this (in hop units) during a sweep.
    pub tolerance: f64,
    /// Fixes the random jitter of newly placed nodes; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            tolerance: 1e-4,
            seed: None,
        }
    }
}

/// Computes a normalised 2D position for every node of `graph`.
///
/// Positions found in `previous` seed the nodes that still exist, so repeated
/// calls after small edits keep the drawing recognisable. Entries of
/// `previous` for nodes that are gone are ignored.
///
/// # Errors
///
/// Returns [`LayoutError::EmptyGraph`] when the graph has no nodes.
#[instrument(
    skip_all,
    name = "compute_layout",
    fields(nodes = graph.node_count(), edges = graph.edge_count())
)]
pub fn compute_layout(
    graph: &MolecularGraph,
    previous: Option<&LayoutCache>,
    options: &LayoutOptions,
) -> Result<LayoutCache, LayoutError> {
    let ids: Vec<NodeId> = graph.node_ids().collect();
    match ids.len() {
        0 => return Err(LayoutError::EmptyGraph),
        1 => return Ok(LayoutCache::from_iter([(ids[0], Point2::origin())])),
        _ => {}
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (distances, diameter) = target_distances(graph, &ids);
    let mut positions = initial_positions(graph, &ids, previous, diameter, &mut rng);
    let sweeps = majorize(&distances, &mut positions, options);
    debug!(
        sweeps,
        stress = stress(&distances, &positions),
        "Stress majorisation finished"
    );

    Ok(normalize(&ids, &positions))
}

/// Pairwise target distances in hops; pairs in different components are
/// placed one hop further apart than the longest finite distance.
fn target_distances(graph: &MolecularGraph, ids: &[NodeId]) -> (Vec<Vec<f64>>, f64) {
    let n = ids.len();
    let mut hops: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];
    let index: HashMap<NodeId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut max_finite = 0;
    for (i, &source) in ids.iter().enumerate() {
        for (target, length) in graph.shortest_path_lengths(source) {
            if let Some(&j) = index.get(&target) {
                hops[i][j] = Some(length);
                max_finite = max_finite.max(length);
            }
        }
    }

    let disconnected = (max_finite + 1) as f64;
    let distances = hops
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|hop| hop.map_or(disconnected, |h| h as f64))
                .collect()
        })
        .collect();
    (distances, disconnected)
}

fn jitter(rng: &mut StdRng, magnitude: f64) -> Vector2<f64> {
    Vector2::new(
        rng.gen_range(-magnitude..magnitude),
        rng.gen_range(-magnitude..magnitude),
    )
}

/// Starting configuration in hop units.
///
/// Cached positions are scaled back up from the normalised range; new nodes
/// start next to an already placed neighbour or, failing that, on a circle.
fn initial_positions(
    graph: &MolecularGraph,
    ids: &[NodeId],
    previous: Option<&LayoutCache>,
    diameter: f64,
    rng: &mut StdRng,
) -> Vec<Point2<f64>> {
    let seed_scale = (diameter / 2.0).max(1.0);
    let n = ids.len() as f64;
    let mut placed: HashMap<NodeId, Point2<f64>> = HashMap::new();
    let mut positions = Vec::with_capacity(ids.len());

    for (k, &id) in ids.iter().enumerate() {
        let cached = previous.and_then(|cache| cache.get(id));
        let position = if let Some(point) = cached {
            Point2::from(point.coords * seed_scale)
        } else if let Some(anchor) = graph.neighbors(id).find_map(|nb| placed.get(&nb).copied())
        {
            anchor + jitter(rng, NEIGHBOR_JITTER)
        } else {
            let angle = TAU * k as f64 / n;
            Point2::new(angle.cos(), angle.sin()) * seed_scale + jitter(rng, CIRCLE_JITTER)
        };
        placed.insert(id, position);
        positions.push(position);
    }
    positions
}

/// Runs localized majorisation sweeps and returns how many were needed.
fn majorize(
    distances: &[Vec<f64>],
    positions: &mut [Point2<f64>],
    options: &LayoutOptions,
) -> usize {
    let n = positions.len();
    for sweep in 0..options.max_iterations {
        let mut max_shift: f64 = 0.0;
        for i in 0..n {
            let mut numerator = Vector2::zeros();
            let mut denominator = 0.0;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = distances[i][j];
                let weight = 1.0 / (d * d);
                let delta = positions[i] - positions[j];
                let norm = delta.norm();
                let pull = if norm > COINCIDENT_EPSILON {
                    delta * (d / norm)
                } else {
                    Vector2::zeros()
                };
                numerator += (positions[j].coords + pull) * weight;
                denominator += weight;
            }
            let updated = Point2::from(numerator / denominator);
            max_shift = max_shift.max((updated - positions[i]).norm());
            positions[i] = updated;
        }
        trace!(sweep, max_shift, "Majorisation sweep");
        if max_shift < options.tolerance {
            return sweep + 1;
        }
    }
    options.max_iterations
}

fn stress(distances: &[Vec<f64>], positions: &[Point2<f64>]) -> f64 {
    let mut total = 0.0;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let d = distances[i][j];
            let gap = (positions[i] - positions[j]).norm() - d;
            total += gap * gap / (d * d);
        }
    }
    total
}

/// Centres the layout on the origin and scales the largest coordinate to 1.
fn normalize(ids: &[NodeId], positions: &[Point2<f64>]) -> LayoutCache {
    let centroid = positions
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.coords)
        / positions.len() as f64;
    let limit = positions
        .iter()
        .map(|p| (p.coords - centroid).amax())
        .fold(0.0, f64::max);
    let scale = if limit > 0.0 { 1.0 / limit } else { 1.0 };

    ids.iter()
        .zip(positions)
        .map(|(id, p)| (*id, Point2::from((p.coords - centroid) * scale)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::graph::NodeAttributes;

    fn seeded() -> LayoutOptions {
        LayoutOptions {
            seed: Some(7),
            ..Default::default()
        }
    }

    fn path(n: usize) -> MolecularGraph {
        let mut graph = MolecularGraph::new();
        let ids: Vec<_> = (0..n)
            .map(|_| graph.add_node(NodeAttributes::with_resname("PEO")))
            .collect();
        for pair in ids.windows(2) {
            graph.add_edge(pair[0], pair[1]).unwrap();
        }
        graph
    }

    fn assert_normalised(cache: &LayoutCache) {
        for (_, p) in cache.iter() {
            assert!(p.x.abs() <= 1.0 + 1e-9 && p.y.abs() <= 1.0 + 1e-9, "{p:?}");
        }
    }

    #[test]
    fn empty_graph_is_rejected() {
        let result = compute_layout(&MolecularGraph::new(), None, &seeded());
        assert_eq!(result, Err(LayoutError::EmptyGraph));
    }

    #[test]
    fn single_node_sits_at_the_origin() {
        let cache = compute_layout(&path(1), None, &seeded()).unwrap();
        assert_eq!(cache.get(NodeId(0)), Some(&Point2::origin()));
    }

    #[test]
    fn one_position_per_node_even_with_id_gaps() {
        let mut graph = path(6);
        graph.remove_node(NodeId(2));
        graph.remove_node(NodeId(4));
        let cache = compute_layout(&graph, None, &seeded()).unwrap();
        assert_eq!(
            cache.keys().collect::<Vec<_>>(),
            graph.node_ids().collect::<Vec<_>>()
        );
    }

    #[test]
    fn positions_are_centred_and_scaled_to_the_unit_box() {
        let cache = compute_layout(&path(8), None, &seeded()).unwrap();
        assert_normalised(&cache);
        let largest = cache
            .iter()
            .map(|(_, p)| p.coords.amax())
            .fold(0.0, f64::max);
        assert!((largest - 1.0).abs() < 1e-9);
        let centroid = cache.iter().fold(Vector2::zeros(), |acc, (_, p)| acc + p.coords);
        assert!(centroid.norm() < 1e-9);
    }

    #[test]
    fn three_residue_chain_is_laid_out_straight() {
        let cache = compute_layout(&path(3), None, &seeded()).unwrap();
        let p0 = cache.get(NodeId(0)).unwrap();
        let p1 = cache.get(NodeId(1)).unwrap();
        let p2 = cache.get(NodeId(2)).unwrap();
        let bond = (p1 - p0).norm();
        assert!(((p2 - p0).norm() - 2.0 * bond).abs() < 1e-2);
    }

    #[test]
    fn graph_without_links_still_gets_distinct_positions() {
        let mut graph = MolecularGraph::new();
        for _ in 0..4 {
            graph.add_node(NodeAttributes::default());
        }
        let cache = compute_layout(&graph, None, &seeded()).unwrap();
        assert_eq!(cache.len(), 4);
        assert_normalised(&cache);
        let points: Vec<_> = cache.iter().map(|(_, p)| *p).collect();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                assert!((points[i] - points[j]).norm() > 1e-3);
            }
        }
    }

    #[test]
    fn fixed_seed_makes_layout_reproducible() {
        let graph = path(5);
        let first = compute_layout(&graph, None, &seeded()).unwrap();
        let second = compute_layout(&graph, None, &seeded()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reseeding_with_a_converged_layout_keeps_nodes_in_place() {
        let graph = path(5);
        let first = compute_layout(&graph, None, &seeded()).unwrap();
        let second = compute_layout(&graph, Some(&first), &seeded()).unwrap();
        for (id, p) in first.iter() {
            let q = second.get(id).unwrap();
            assert!((p - q).norm() < 0.05, "node {id} moved from {p:?} to {q:?}");
        }
    }

    fn largest_shift(before: &LayoutCache, after: &LayoutCache) -> f64 {
        before
            .iter()
            .map(|(id, p)| (after.get(id).unwrap() - p).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn appending_a_residue_barely_moves_the_existing_chain() {
        let mut graph = path(6);
        let first = compute_layout(&graph, None, &seeded()).unwrap();

        let tail = graph.add_node(NodeAttributes::with_resname("PEO"));
        graph.add_edge(NodeId(5), tail).unwrap();
        let reseeded = compute_layout(&graph, Some(&first), &seeded()).unwrap();
        let from_scratch = compute_layout(&graph, None, &seeded()).unwrap();

        let kept = largest_shift(&first, &reseeded);
        let scratch = largest_shift(&first, &from_scratch);
        assert!(kept < 0.5, "existing residues moved by up to {kept}");
        assert!(kept < scratch, "seeded shift {kept} vs unseeded {scratch}");
    }

    #[test]
    fn new_residue_starts_beside_its_placed_neighbour() {
        let mut graph = path(6);
        let first = compute_layout(&graph, None, &seeded()).unwrap();
        let tail = graph.add_node(NodeAttributes::with_resname("PEO"));
        graph.add_edge(NodeId(5), tail).unwrap();

        let ids: Vec<NodeId> = graph.node_ids().collect();
        let (_, diameter) = target_distances(&graph, &ids);
        let mut rng = StdRng::seed_from_u64(3);
        let start = initial_positions(&graph, &ids, Some(&first), diameter, &mut rng);

        let gap = (start[6] - start[5]).norm();
        assert!(gap <= NEIGHBOR_JITTER * 2f64.sqrt(), "tail starts {gap} away");
        let seed_scale = (diameter / 2.0).max(1.0);
        let expected = Point2::from(first.get(NodeId(2)).unwrap().coords * seed_scale);
        assert!((start[2] - expected).norm() < 1e-12);
    }

    #[test]
    fn stale_cache_entries_are_ignored() {
        let graph = path(3);
        let mut previous = compute_layout(&path(5), None, &seeded()).unwrap();
        previous.insert(NodeId(42), Point2::new(0.5, 0.5));
        let cache = compute_layout(&graph, Some(&previous), &seeded()).unwrap();
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(NodeId(3)));
        assert!(!cache.contains(NodeId(42)));
    }

    #[test]
    fn separate_components_do_not_collapse_onto_each_other() {
        let mut graph = path(3);
        graph.disjoint_union(&path(3));
        let cache = compute_layout(&graph, None, &seeded()).unwrap();
        let a = cache.get(NodeId(1)).unwrap();
        let b = cache.get(NodeId(4)).unwrap();
        assert!((a - b).norm() > 0.1);
    }
}
