use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable that points at a library directory, checked after
/// the command line and the config file.
pub const DATA_DIR_ENV: &str = "POLYBUILD_DATA_DIR";

/// Where force-field libraries are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirectory {
    base_path: PathBuf,
}

impl DataDirectory {
    /// Picks the first of `cli_path`, `file_path`, `$POLYBUILD_DATA_DIR` and
    /// the platform data directory.
    pub fn resolve(cli_path: Option<&Path>, file_path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(DATA_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let base_path = match cli_path
            .map(Path::to_path_buf)
            .or_else(|| file_path.map(Path::to_path_buf))
            .or(env_path)
        {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if !base_path.is_dir() {
            warn!(
                "Library directory {:?} does not exist; force fields cannot be loaded.",
                base_path
            );
        }
        debug!("Using library directory {:?}", base_path);
        Ok(Self { base_path })
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    fn default_path() -> Result<PathBuf> {
        ProjectDirs::from("org", "polybuild", "polybuild")
            .map(|dirs| dirs.data_dir().join("libraries"))
            .ok_or_else(|| {
                CliError::Data("Could not determine default data directory path.".to_string())
            })
    }
}
