//! Residue graphs for the chain architectures a user can add as a block.

use crate::core::models::block::BlockKind;
use crate::core::models::graph::{Chirality, MolecularGraph, NodeAttributes};
use crate::core::models::ids::NodeRange;
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Force fields whose residues carry no stereo information.
const TACTICITY_AGNOSTIC_FORCE_FIELDS: [&str; 2] = ["martini2", "martini3"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArchitectureError {
    #[error("A block needs a monomer name")]
    MissingMonomer,
    #[error("The number of repeat units must be at least 1")]
    ZeroRepeatUnits,
    #[error("The number of generations must be at least 1")]
    ZeroGenerations,
    #[error("The degree of branching must be at least 1")]
    ZeroBranching,
    #[error("Blocks of kind '{0}' are not generated from a monomer")]
    NotGenerated(BlockKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Linear { repeat_units: usize },
    Comb { repeat_units: usize },
    Tree { generations: usize, branching: usize },
    Carbohydrate,
}

impl Architecture {
    /// Builds an architecture from the two numeric form fields.
    ///
    /// `count` is the repeat units (or generations for a tree); `branching` is
    /// only read for trees. Carbohydrates ignore both.
    pub fn from_kind(
        kind: BlockKind,
        count: usize,
        branching: usize,
    ) -> Result<Self, ArchitectureError> {
        let architecture = match kind {
            BlockKind::Linear => Self::Linear {
                repeat_units: count,
            },
            BlockKind::Comb => Self::Comb {
                repeat_units: count,
            },
            BlockKind::Tree => Self::Tree {
                generations: count,
                branching,
            },
            BlockKind::Carbohydrate => Self::Carbohydrate,
            BlockKind::File => return Err(ArchitectureError::NotGenerated(kind)),
        };
        architecture.validate()?;
        Ok(architecture)
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Linear { .. } => BlockKind::Linear,
            Self::Comb { .. } => BlockKind::Comb,
            Self::Tree { .. } => BlockKind::Tree,
            Self::Carbohydrate => BlockKind::Carbohydrate,
        }
    }

    fn validate(&self) -> Result<(), ArchitectureError> {
        match *self {
            Self::Linear { repeat_units } | Self::Comb { repeat_units } if repeat_units == 0 => {
                Err(ArchitectureError::ZeroRepeatUnits)
            }
            Self::Tree { generations: 0, .. } => Err(ArchitectureError::ZeroGenerations),
            Self::Tree { branching: 0, .. } => Err(ArchitectureError::ZeroBranching),
            _ => Ok(()),
        }
    }

    /// Generates the residue graph of one block made of `monomer` units.
    pub fn build(&self, monomer: &str) -> Result<MolecularGraph, ArchitectureError> {
        let monomer = monomer.trim();
        if monomer.is_empty() {
            return Err(ArchitectureError::MissingMonomer);
        }
        self.validate()?;
        Ok(match *self {
            Self::Linear { repeat_units } | Self::Comb { repeat_units } => {
                branched_graph(monomer, 1, repeat_units)
            }
            Self::Tree {
                generations,
                branching,
            } => branched_graph(monomer, branching, generations),
            Self::Carbohydrate => branched_graph(monomer, 1, 1),
        })
    }
}

/// A rooted tree with `levels` levels in which every non-leaf residue has
/// `branching` children. A branching of 1 yields a linear chain.
fn branched_graph(resname: &str, branching: usize, levels: usize) -> MolecularGraph {
    let mut graph = MolecularGraph::new();
    let root = graph.add_node(NodeAttributes::with_resname(resname));
    let mut frontier = VecDeque::from([(root, 1)]);

    while let Some((parent, level)) = frontier.pop_front() {
        if level >= levels {
            continue;
        }
        for _ in 0..branching {
            let child = graph.add_node(NodeAttributes::with_resname(resname));
            let _ = graph.add_edge(parent, child);
            frontier.push_back((child, level + 1));
        }
    }
    graph
}

/// Stereo arrangement assigned to the residues of a new block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tacticity {
    Atactic,
    IsotacticR,
    IsotacticS,
    Syndiotactic,
}

impl Tacticity {
    /// Writes the `tacticity` attribute of every node in `nodes`.
    pub fn apply(&self, graph: &mut MolecularGraph, nodes: NodeRange, rng: &mut impl Rng) {
        let mut alternating = Chirality::R;
        for id in nodes.iter() {
            let label = match self {
                Tacticity::Atactic => {
                    if rng.gen_bool(0.5) {
                        Chirality::R
                    } else {
                        Chirality::S
                    }
                }
                Tacticity::IsotacticR => Chirality::R,
                Tacticity::IsotacticS => Chirality::S,
                Tacticity::Syndiotactic => {
                    let current = alternating;
                    alternating = alternating.flipped();
                    current
                }
            };
            if let Some(attributes) = graph.node_mut(id) {
                attributes.tacticity = Some(label);
            }
        }
    }
}

impl fmt::Display for Tacticity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tacticity::Atactic => "atactic",
            Tacticity::IsotacticR => "isotactic-R",
            Tacticity::IsotacticS => "isotactic-S",
            Tacticity::Syndiotactic => "syndiotactic",
        })
    }
}

#[derive(Debug, Error)]
#[error("Unknown tacticity '{0}'")]
pub struct ParseTacticityError(String);

impl FromStr for Tacticity {
    type Err = ParseTacticityError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atactic" => Ok(Self::Atactic),
            "isotactic-r" => Ok(Self::IsotacticR),
            "isotactic-s" => Ok(Self::IsotacticS),
            "syndiotactic" => Ok(Self::Syndiotactic),
            _ => Err(ParseTacticityError(s.to_string())),
        }
    }
}

/// Whether residues of `force_field` carry a tacticity attribute.
pub fn supports_tacticity(force_field: &str) -> bool {
    !TACTICITY_AGNOSTIC_FORCE_FIELDS.contains(&force_field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::NodeId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn linear_block_is_a_chain_of_repeat_units() {
        let graph = Architecture::Linear { repeat_units: 3 }.build("PEO").unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(
            graph.edges().collect::<Vec<_>>(),
            vec![(NodeId(0), NodeId(1)), (NodeId(1), NodeId(2))]
        );
        assert!(
            graph
                .nodes()
                .all(|(_, attrs)| attrs.resname.as_deref() == Some("PEO"))
        );
    }

    #[test]
    fn tree_block_grows_one_level_per_generation() {
        let graph = Architecture::Tree {
            generations: 3,
            branching: 2,
        }
        .build("PAMAM")
        .unwrap();
        assert_eq!(graph.node_count(), 1 + 2 + 4);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.degree(NodeId(0)), 2);
        assert_eq!(graph.degree(NodeId(1)), 3);
    }

    #[test]
    fn carbohydrate_block_is_a_single_residue() {
        let graph = Architecture::Carbohydrate.build("GLC").unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn degenerate_parameters_are_rejected() {
        assert_eq!(
            Architecture::from_kind(BlockKind::Linear, 0, 1),
            Err(ArchitectureError::ZeroRepeatUnits)
        );
        assert_eq!(
            Architecture::from_kind(BlockKind::Tree, 2, 0),
            Err(ArchitectureError::ZeroBranching)
        );
        assert_eq!(
            Architecture::from_kind(BlockKind::File, 1, 1),
            Err(ArchitectureError::NotGenerated(BlockKind::File))
        );
        assert_eq!(
            Architecture::Carbohydrate.build("  "),
            Err(ArchitectureError::MissingMonomer)
        );
    }

    #[test]
    fn syndiotactic_alternates_and_isotactic_is_uniform() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut graph = Architecture::Linear { repeat_units: 4 }.build("PS").unwrap();
        let all = NodeRange::new(0, 4);

        Tacticity::Syndiotactic.apply(&mut graph, all, &mut rng);
        let labels: Vec<_> = graph.nodes().map(|(_, a)| a.tacticity.unwrap()).collect();
        assert_eq!(
            labels,
            vec![Chirality::R, Chirality::S, Chirality::R, Chirality::S]
        );

        Tacticity::IsotacticS.apply(&mut graph, all, &mut rng);
        assert!(
            graph
                .nodes()
                .all(|(_, a)| a.tacticity == Some(Chirality::S))
        );
    }

    #[test]
    fn atactic_only_touches_the_given_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut graph = Architecture::Linear { repeat_units: 6 }.build("PP").unwrap();
        Tacticity::Atactic.apply(&mut graph, NodeRange::new(2, 6), &mut rng);
        assert!(graph.node(NodeId(0)).unwrap().tacticity.is_none());
        assert!(graph.node(NodeId(5)).unwrap().tacticity.is_some());
    }

    #[test]
    fn martini_force_fields_ignore_tacticity() {
        assert!(!supports_tacticity("martini3"));
        assert!(!supports_tacticity("martini2"));
        assert!(supports_tacticity("oplsaaLigParGen"));
        assert_eq!(
            "isotactic-R".parse::<Tacticity>().unwrap(),
            Tacticity::IsotacticR
        );
    }
}
