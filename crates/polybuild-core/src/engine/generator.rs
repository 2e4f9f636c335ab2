use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Could not execute '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("Topology generation failed (exit status {status:?})")]
    Failed {
        status: Option<i32>,
        lines: Vec<String>,
    },
}

/// Everything the generator needs to turn a saved graph into a topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub name: String,
    pub input_path: Option<PathBuf>,
    pub verbosity: u8,
    pub sequence: Option<Vec<String>>,
    pub sequence_file_path: PathBuf,
    pub output_path: PathBuf,
    pub library_names: Vec<String>,
}

/// Produces a topology file from a saved residue graph.
///
/// Returns the program's output lines for the log panel.
pub trait TopologyGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError>;
}

/// Runs `polyply gen_itp` as a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyplyCommand {
    program: String,
}

impl Default for PolyplyCommand {
    fn default() -> Self {
        Self::new("polyply")
    }
}

impl PolyplyCommand {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self, request: &GenerationRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> =
            vec!["gen_itp".into(), "-name".into(), request.name.clone().into()];
        if let Some(input) = &request.input_path {
            args.push("-f".into());
            args.push(input.into());
        }
        if let Some(sequence) = &request.sequence {
            args.push("-seq".into());
            args.extend(sequence.iter().map(OsString::from));
        }
        args.push("-seqf".into());
        args.push(request.sequence_file_path.clone().into());
        args.push("-o".into());
        args.push(request.output_path.clone().into());
        args.push("-lib".into());
        args.extend(request.library_names.iter().map(OsString::from));
        for _ in 0..request.verbosity {
            args.push("-v".into());
        }
        args
    }
}

impl TopologyGenerator for PolyplyCommand {
    #[instrument(skip_all, name = "polyply_gen_itp", fields(output = ?request.output_path))]
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        let args = self.arguments(request);
        debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| GenerationError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
            .map(str::to_string)
            .filter(|line| !line.trim().is_empty())
            .collect();

        if output.status.success() {
            info!("Generated topology {:?}", request.output_path);
            Ok(lines)
        } else {
            warn!(
                "{} exited with {:?} after {} line(s) of output",
                self.program,
                output.status.code(),
                lines.len()
            );
            Err(GenerationError::Failed {
                status: output.status.code(),
                lines,
            })
        }
    }
}
