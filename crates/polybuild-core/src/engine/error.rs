use thiserror::Error;

use super::config::ConfigError;
use super::generator::GenerationError;
use crate::core::architecture::ArchitectureError;
use crate::core::io::node_link::NodeLinkError;
use crate::core::io::registry::FragmentError;
use crate::core::layout::LayoutError;
use crate::core::library::LibraryError;
use crate::core::models::block::BlockError;
use crate::core::models::graph::GraphError;
use crate::core::models::ids::NodeId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid graph: {source}")]
    InvalidGraph {
        #[from]
        source: LayoutError,
    },

    #[error("Unknown block reference: {source}")]
    UnknownBlockReference {
        #[from]
        source: BlockError,
    },

    #[error("Residues {a} and {b} are not linked")]
    EdgeNotFound { a: NodeId, b: NodeId },

    #[error("Cannot link: {source}")]
    Graph {
        #[from]
        source: GraphError,
    },

    #[error("Unsupported file format '.{extension}'")]
    UnsupportedFileFormat { extension: String },

    #[error("Failed to read '{path}': {source}")]
    Parse { path: String, source: FragmentError },

    #[error("Failed to write '{path}': {source}")]
    Write { path: String, source: NodeLinkError },

    #[error("File not found: '{0}'")]
    FileNotFound(String),

    #[error("Topology generation failed")]
    ExternalGenerationFailure { lines: Vec<String> },

    #[error("Topology generator unavailable: {0}")]
    Generator(#[source] GenerationError),

    #[error("Force-field library error: {source}")]
    Library {
        #[from]
        source: LibraryError,
    },

    #[error("Invalid block: {source}")]
    Architecture {
        #[from]
        source: ArchitectureError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("No force field selected")]
    NoForceField,

    #[error("No saved graph; save the graph before generating a topology")]
    NoSavedGraph,

    #[error("No block form is open; choose a chain architecture first")]
    NoOpenForm,
}

impl From<GenerationError> for EngineError {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::Failed { lines, .. } => Self::ExternalGenerationFailure { lines },
            other => Self::Generator(other),
        }
    }
}

impl EngineError {
    /// Wraps a fragment read failure, lifting unknown extensions out of it.
    pub fn from_fragment(path: &std::path::Path, error: FragmentError) -> Self {
        match error {
            FragmentError::UnsupportedFormat { extension } => {
                Self::UnsupportedFileFormat { extension }
            }
            other => Self::Parse {
                path: path.to_string_lossy().to_string(),
                source: other,
            },
        }
    }

    /// The lines this error contributes to the log panel.
    pub fn log_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Error: {self}")];
        if let Self::ExternalGenerationFailure { lines: output } = self {
            lines.extend(output.iter().cloned());
        }
        lines
    }
}
