use super::traits::GraphReader;
use crate::core::models::graph::{MolecularGraph, NodeAttributes};
use crate::core::models::ids::NodeId;
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItpError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ItpParseErrorKind },
    #[error("Missing required section: [ {0} ]")]
    MissingSection(&'static str),
}

#[derive(Debug, Error)]
pub enum ItpParseErrorKind {
    #[error("Data line appears before any [ section ] header")]
    OutsideSection,
    #[error("Malformed section header '{0}'")]
    MalformedHeader(String),
    #[error("Expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },
    #[error("Invalid integer in column {column} (value: '{value}')")]
    InvalidInt { column: usize, value: String },
    #[error("Bond refers to undefined atom {0}")]
    UnknownAtom(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItpAtom {
    pub index: usize,
    pub atom_type: String,
    pub resid: usize,
    pub resname: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItpMolecule {
    pub name: String,
    pub nrexcl: Option<usize>,
    pub atoms: Vec<ItpAtom>,
    pub bonds: Vec<(usize, usize)>,
}

impl ItpMolecule {
    /// Collapses the atoms into one node per residue.
    ///
    /// Residues are keyed by `(resnr, residue name)` and numbered in order of
    /// first appearance; two residues are linked when a bond joins their atoms.
    pub fn residue_graph(&self) -> MolecularGraph {
        let mut graph = MolecularGraph::new();
        let mut residue_nodes: HashMap<(usize, &str), NodeId> = HashMap::new();
        let mut atom_to_node: HashMap<usize, NodeId> = HashMap::new();
        let mut atom_counts: HashMap<NodeId, usize> = HashMap::new();

        for atom in &self.atoms {
            let key = (atom.resid, atom.resname.as_str());
            let node = *residue_nodes.entry(key).or_insert_with(|| {
                graph.add_node(NodeAttributes {
                    resname: Some(atom.resname.clone()),
                    resid: Some(atom.resid),
                    ..Default::default()
                })
            });
            atom_to_node.insert(atom.index, node);
            *atom_counts.entry(node).or_default() += 1;
        }

        for (node, count) in atom_counts {
            if let Some(attributes) = graph.node_mut(node) {
                attributes.extra.insert("natoms".into(), Value::from(count));
            }
        }

        for (a, b) in &self.bonds {
            if let (Some(&node_a), Some(&node_b)) = (atom_to_node.get(a), atom_to_node.get(b)) {
                if node_a != node_b {
                    let _ = graph.add_edge(node_a, node_b);
                }
            }
        }
        graph
    }
}

/// Names of every molecule type found, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItpMetadata {
    pub molecule_names: Vec<String>,
}

/// A significant line of a GROMACS-style topology file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TopologyLine {
    Header(String),
    Data(String),
}

/// Strips comments and preprocessor directives and classifies what is left.
pub(crate) fn significant_lines(
    reader: &mut impl BufRead,
) -> Result<Vec<(usize, TopologyLine)>, ItpError> {
    let mut lines = Vec::new();
    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;
        let content = line.split(';').next().unwrap_or("").trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        if let Some(rest) = content.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ItpError::Parse {
                    line: line_num,
                    kind: ItpParseErrorKind::MalformedHeader(content.to_string()),
                })?;
            lines.push((line_num, TopologyLine::Header(name.to_lowercase())));
        } else {
            lines.push((line_num, TopologyLine::Data(content.to_string())));
        }
    }
    Ok(lines)
}

fn columns(line: usize, data: &str, expected: usize) -> Result<Vec<&str>, ItpError> {
    let parts: Vec<&str> = data.split_whitespace().collect();
    if parts.len() < expected {
        return Err(ItpError::Parse {
            line,
            kind: ItpParseErrorKind::TooFewColumns {
                expected,
                found: parts.len(),
            },
        });
    }
    Ok(parts)
}

fn parse_int(line: usize, parts: &[&str], column: usize) -> Result<usize, ItpError> {
    parts[column].parse().map_err(|_| ItpError::Parse {
        line,
        kind: ItpParseErrorKind::InvalidInt {
            column: column + 1,
            value: parts[column].to_string(),
        },
    })
}

/// Reads every molecule type of an include topology.
pub fn read_molecules(reader: &mut impl BufRead) -> Result<Vec<ItpMolecule>, ItpError> {
    let mut molecules: Vec<ItpMolecule> = Vec::new();
    let mut section: Option<String> = None;

    for (line, entry) in significant_lines(reader)? {
        match entry {
            TopologyLine::Header(name) => {
                if name == "moleculetype" {
                    molecules.push(ItpMolecule::default());
                }
                section = Some(name);
            }
            TopologyLine::Data(data) => {
                let Some(current) = section.as_deref() else {
                    return Err(ItpError::Parse {
                        line,
                        kind: ItpParseErrorKind::OutsideSection,
                    });
                };
                let Some(molecule) = molecules.last_mut() else {
                    continue;
                };
                match current {
                    "moleculetype" => {
                        let parts = columns(line, &data, 1)?;
                        molecule.name = parts[0].to_string();
                        if parts.len() > 1 {
                            molecule.nrexcl = Some(parse_int(line, &parts, 1)?);
                        }
                    }
                    "atoms" => {
                        let parts = columns(line, &data, 5)?;
                        molecule.atoms.push(ItpAtom {
                            index: parse_int(line, &parts, 0)?,
                            atom_type: parts[1].to_string(),
                            resid: parse_int(line, &parts, 2)?,
                            resname: parts[3].to_string(),
                            name: parts[4].to_string(),
                        });
                    }
                    "bonds" => {
                        let parts = columns(line, &data, 2)?;
                        let a = parse_int(line, &parts, 0)?;
                        let b = parse_int(line, &parts, 1)?;
                        for index in [a, b] {
                            if !molecule.atoms.iter().any(|atom| atom.index == index) {
                                return Err(ItpError::Parse {
                                    line,
                                    kind: ItpParseErrorKind::UnknownAtom(index),
                                });
                            }
                        }
                        molecule.bonds.push((a, b));
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(molecules)
}

/// GROMACS include topology (`.itp`), read as a residue-level graph.
pub struct ItpFile;

impl GraphReader for ItpFile {
    type Metadata = ItpMetadata;
    type Error = ItpError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularGraph, Self::Metadata), Self::Error> {
        let molecules = read_molecules(reader)?;
        let first = molecules
            .first()
            .ok_or(ItpError::MissingSection("moleculetype"))?;
        if first.atoms.is_empty() {
            return Err(ItpError::MissingSection("atoms"));
        }
        let metadata = ItpMetadata {
            molecule_names: molecules.iter().map(|m| m.name.clone()).collect(),
        };
        Ok((first.residue_graph(), metadata))
    }
}
