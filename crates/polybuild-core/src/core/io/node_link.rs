use super::traits::{GraphReader, GraphWriter};
use crate::core::models::graph::{GraphError, MolecularGraph, NodeAttributes};
use crate::core::models::ids::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeLinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed node-link JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Directed graphs are not supported")]
    Directed,
    #[error("Multigraphs are not supported")]
    Multigraph,
    #[error("Duplicate node id {0}")]
    DuplicateNode(NodeId),
    #[error("Node id {0} is too large")]
    IdOutOfRange(NodeId),
    #[error("Link {from}-{to} refers to a missing node")]
    DanglingLink { from: NodeId, to: NodeId },
    #[error("Link {0}-{0} connects a node to itself")]
    SelfLoop(NodeId),
}

/// Graph-level attributes (the `"graph"` object) carried alongside the nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLinkMetadata {
    pub graph: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeLinkDocument {
    #[serde(default)]
    directed: bool,
    #[serde(default)]
    multigraph: bool,
    #[serde(default)]
    graph: Map<String, Value>,
    nodes: Vec<NodeRecord>,
    #[serde(default, alias = "edges")]
    links: Vec<LinkRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: NodeId,
    #[serde(flatten)]
    attributes: NodeAttributes,
}

#[derive(Debug, Serialize, Deserialize)]
struct LinkRecord {
    source: NodeId,
    target: NodeId,
}

/// Undirected node-link JSON, the file handed to the topology generator.
pub struct NodeLinkFile;

impl GraphReader for NodeLinkFile {
    type Metadata = NodeLinkMetadata;
    type Error = NodeLinkError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularGraph, Self::Metadata), Self::Error> {
        let document: NodeLinkDocument = serde_json::from_reader(reader)?;
        if document.directed {
            return Err(NodeLinkError::Directed);
        }
        if document.multigraph {
            return Err(NodeLinkError::Multigraph);
        }

        let mut graph = MolecularGraph::new();
        for node in document.nodes {
            graph
                .insert_node(node.id, node.attributes)
                .map_err(|e| match e {
                    GraphError::IdOutOfRange(id) => NodeLinkError::IdOutOfRange(id),
                    _ => NodeLinkError::DuplicateNode(node.id),
                })?;
        }
        for link in document.links {
            graph
                .add_edge(link.source, link.target)
                .map_err(|e| match e {
                    GraphError::SelfLoop(id) => NodeLinkError::SelfLoop(id),
                    _ => NodeLinkError::DanglingLink {
                        from: link.source,
                        to: link.target,
                    },
                })?;
        }
        Ok((
            graph,
            NodeLinkMetadata {
                graph: document.graph,
            },
        ))
    }
}

impl GraphWriter for NodeLinkFile {
    fn write_to(
        graph: &MolecularGraph,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let document = NodeLinkDocument {
            directed: false,
            multigraph: false,
            graph: metadata.graph.clone(),
            nodes: graph
                .nodes()
                .map(|(id, attributes)| NodeRecord {
                    id,
                    attributes: attributes.clone(),
                })
                .collect(),
            links: graph
                .edges()
                .map(|(source, target)| LinkRecord { source, target })
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *writer, &document)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::graph::Chirality;
    use std::io::{BufReader, Cursor};

    fn read(json: &str) -> Result<(MolecularGraph, NodeLinkMetadata), NodeLinkError> {
        NodeLinkFile::read_from(&mut BufReader::new(Cursor::new(json)))
    }

    #[test]
    fn writes_the_networkx_node_link_layout() {
        let mut graph = MolecularGraph::new();
        let a = graph.add_node(NodeAttributes::with_resname("PEO"));
        let b = graph.add_node(NodeAttributes::with_resname("PS"));
        graph.add_edge(a, b).unwrap();

        let mut buffer = Vec::new();
        NodeLinkFile::write_to(&graph, &NodeLinkMetadata::default(), &mut buffer).unwrap();
        let value: Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["directed"], Value::Bool(false));
        assert_eq!(value["multigraph"], Value::Bool(false));
        assert_eq!(value["graph"], Value::Object(Map::new()));
        assert_eq!(value["nodes"][0]["id"], 0);
        assert_eq!(value["nodes"][1]["resname"], "PS");
        assert_eq!(value["links"][0]["source"], 0);
        assert_eq!(value["links"][0]["target"], 1);
    }

    #[test]
    fn reads_ids_with_gaps_and_keeps_unknown_attributes() {
        let json = r#"{
            "directed": false, "multigraph": false, "graph": {"name": "demo"},
            "nodes": [
                {"id": 3, "resname": "PEO", "tacticity": "R", "charge": -1},
                {"id": 7, "resname": "PEO"}
            ],
            "links": [{"source": 3, "target": 7}]
        }"#;
        let (graph, metadata) = read(json).unwrap();

        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![NodeId(3), NodeId(7)]);
        assert!(graph.has_edge(NodeId(3), NodeId(7)));
        assert_eq!(graph.next_id(), NodeId(8));
        let first = graph.node(NodeId(3)).unwrap();
        assert_eq!(first.tacticity, Some(Chirality::R));
        assert_eq!(first.extra["charge"], -1);
        assert_eq!(metadata.graph["name"], "demo");
    }

    #[test]
    fn file_round_trip_preserves_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let mut graph = MolecularGraph::new();
        for _ in 0..3 {
            graph.add_node(NodeAttributes::with_resname("PMMA"));
        }
        graph.add_edge(NodeId(0), NodeId(2)).unwrap();

        NodeLinkFile::write_to_path(&graph, &NodeLinkMetadata::default(), &path).unwrap();
        let (read_back, _) = NodeLinkFile::read_from_path(&path).unwrap();

        assert_eq!(read_back, graph);
    }

    #[test]
    fn rejects_directed_graphs_and_dangling_links() {
        let directed = r#"{"directed": true, "multigraph": false, "graph": {},
            "nodes": [], "links": []}"#;
        assert!(matches!(read(directed), Err(NodeLinkError::Directed)));

        let dangling = r#"{"directed": false, "multigraph": false, "graph": {},
            "nodes": [{"id": 0}], "links": [{"source": 0, "target": 4}]}"#;
        assert!(matches!(
            read(dangling),
            Err(NodeLinkError::DanglingLink { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let json = r#"{"nodes": [{"id": 1}, {"id": 1}], "links": []}"#;
        assert!(matches!(read(json), Err(NodeLinkError::DuplicateNode(NodeId(1)))));
    }

    #[test]
    fn rejects_an_id_the_counter_cannot_move_past() {
        let json = r#"{"nodes": [{"id": 0}, {"id": 18446744073709551615}], "links": []}"#;
        assert!(matches!(
            read(json),
            Err(NodeLinkError::IdOutOfRange(NodeId(id))) if id == u64::MAX as usize
        ));
    }

    #[test]
    fn self_links_are_reported_as_such() {
        let json = r#"{"nodes": [{"id": 0}, {"id": 1}], "links": [{"source": 1, "target": 1}]}"#;
        let err = read(json).unwrap_err();
        assert!(matches!(err, NodeLinkError::SelfLoop(NodeId(1))));
        assert_eq!(err.to_string(), "Link 1-1 connects a node to itself");
    }
}
