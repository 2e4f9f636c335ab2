use super::itp::{ItpError, ItpFile};
use super::node_link::{NodeLinkError, NodeLinkFile};
use super::traits::GraphReader;
use crate::core::models::graph::MolecularGraph;
use phf::{Map, phf_map};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// File formats a fragment can be loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentFormat {
    Itp,
    NodeLink,
}

static FORMATS_BY_EXTENSION: Map<&'static str, FragmentFormat> = phf_map! {
    "itp" => FragmentFormat::Itp,
    "json" => FragmentFormat::NodeLink,
};

impl FragmentFormat {
    /// Looks up the reader for a path by its (case-insensitive) extension.
    pub fn from_path(path: &Path) -> Result<Self, FragmentError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        FORMATS_BY_EXTENSION
            .get(extension.as_str())
            .copied()
            .ok_or(FragmentError::UnsupportedFormat { extension })
    }
}

#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("No reader registered for extension '{extension}'")]
    UnsupportedFormat { extension: String },
    #[error(transparent)]
    Itp(#[from] ItpError),
    #[error(transparent)]
    NodeLink(#[from] NodeLinkError),
}

/// A residue graph read from disk, ready to be merged as one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub name: String,
    pub graph: MolecularGraph,
}

/// Reads a structure file into a fragment, choosing the reader by extension.
///
/// Itp fragments are named after their first molecule type; node-link files
/// after the file stem.
pub fn read_fragment(path: &Path) -> Result<Fragment, FragmentError> {
    let format = FragmentFormat::from_path(path)?;
    debug!("Reading {:?} fragment from {:?}", format, path);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fragment".to_string());

    match format {
        FragmentFormat::Itp => {
            let (graph, metadata) = ItpFile::read_from_path(path)?;
            let name = metadata.molecule_names.into_iter().next().unwrap_or(stem);
            Ok(Fragment { name, graph })
        }
        FragmentFormat::NodeLink => {
            let (graph, _) = NodeLinkFile::read_from_path(path)?;
            Ok(Fragment { name: stem, graph })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(
            FragmentFormat::from_path(Path::new("polymer.ITP")).unwrap(),
            FragmentFormat::Itp
        );
        assert_eq!(
            FragmentFormat::from_path(Path::new("saved.json")).unwrap(),
            FragmentFormat::NodeLink
        );
    }

    #[test]
    fn unknown_extensions_are_rejected_before_reading() {
        let err = read_fragment(Path::new("/does/not/exist/structure.gro")).unwrap_err();
        assert!(matches!(
            err,
            FragmentError::UnsupportedFormat { ref extension } if extension == "gro"
        ));
    }

    #[test]
    fn itp_fragments_are_named_after_their_molecule_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.itp");
        fs::write(
            &path,
            "[ moleculetype ]\nPEG 1\n[ atoms ]\n\
             1 P 1 PEO EO 1 0\n2 P 2 PEO EO 2 0\n[ bonds ]\n1 2 1\n",
        )
        .unwrap();

        let fragment = read_fragment(&path).unwrap();
        assert_eq!(fragment.name, "PEG");
        assert_eq!(fragment.graph.node_count(), 2);
        assert_eq!(fragment.graph.edge_count(), 1);
    }
}
