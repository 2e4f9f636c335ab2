use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileCanvasConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub radius_scale: Option<f64>,
    pub zoom_step: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileLayoutConfig {
    pub max_iterations: Option<usize>,
    pub tolerance: Option<f64>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileLibraryConfig {
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub extra_paths: Vec<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileGeneratorConfig {
    pub program: Option<String>,
    pub molecule_name: Option<String>,
    pub verbosity: Option<u8>,
}

/// The optional TOML configuration file; every key may be left out.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub canvas: Option<FileCanvasConfig>,
    pub layout: Option<FileLayoutConfig>,
    pub library: Option<FileLibraryConfig>,
    pub generator: Option<FileGeneratorConfig>,
    /// Residue colour table, see `Palette`.
    pub palette: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.resolve_relative_paths(path.parent().unwrap_or(Path::new("")));
        Ok(config)
    }

    /// Paths inside the file are taken relative to the file itself.
    fn resolve_relative_paths(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(palette) = self.palette.as_mut() {
            rebase(palette);
        }
        if let Some(library) = self.library.as_mut() {
            if let Some(data_dir) = library.data_dir.as_mut() {
                rebase(data_dir);
            }
            library.extra_paths.iter_mut().for_each(rebase);
        }
    }
}
