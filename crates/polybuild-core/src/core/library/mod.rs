//! # Force-Field Library Module
//!
//! Locates the monomer blocks a force-field library provides so that they can
//! be offered as monomer choices. Only block names and where they were found
//! are collected; the chemistry inside a block is left to the topology
//! generator.
//!
//! A library named `martini3` lives in `<data_dir>/martini3/` and consists of
//! every `.ff` and `.itp` file in that directory. Blocks are announced by a
//! `[ moleculetype ]` or `[ block ]` header whose first data line starts with
//! the block name.

use crate::core::io::itp::{ItpError, TopologyLine, significant_lines};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};

const LIBRARY_EXTENSIONS: [&str; 2] = ["ff", "itp"];

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Force-field library '{name}' not found in {searched:?}")]
    NotFound { name: String, searched: PathBuf },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to read library file '{path}': {source}")]
    Parse { path: String, source: ItpError },
}

/// Which header introduced a block definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    MoleculeType,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDefinition {
    pub name: String,
    pub kind: DefinitionKind,
    pub source: PathBuf,
}

/// The blocks of one or more libraries merged into a single lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryHandle {
    pub name: String,
    pub libraries: Vec<String>,
    pub blocks: BTreeMap<String, BlockDefinition>,
}

impl LibraryHandle {
    /// Block names in alphabetical order, as offered in the monomer picker.
    pub fn monomers(&self) -> Vec<String> {
        self.blocks.keys().cloned().collect()
    }
}

/// Loads the blocks of the named libraries plus any extra user files.
///
/// Later files override earlier definitions of the same block name; extra
/// files are read last.
#[instrument(skip_all, fields(category = category, libraries = ?names))]
pub fn load_library(
    category: &str,
    names: &[String],
    extra_paths: &[PathBuf],
    data_dir: &Path,
) -> Result<LibraryHandle, LibraryError> {
    let mut handle = LibraryHandle {
        name: category.to_string(),
        libraries: names.to_vec(),
        blocks: BTreeMap::new(),
    };

    for name in names {
        let dir = data_dir.join(name);
        if !dir.is_dir() {
            return Err(LibraryError::NotFound {
                name: name.clone(),
                searched: dir,
            });
        }
        for file in library_files(&dir)? {
            scan_file(&file, &mut handle.blocks)?;
        }
    }
    for file in extra_paths {
        scan_file(file, &mut handle.blocks)?;
    }

    info!(
        "Loaded {} block(s) from {} librar(y/ies) and {} extra file(s)",
        handle.blocks.len(),
        names.len(),
        extra_paths.len()
    );
    Ok(handle)
}

/// Names of the libraries available under `data_dir`, sorted.
pub fn available_libraries(data_dir: &Path) -> Result<Vec<String>, LibraryError> {
    let entries = fs::read_dir(data_dir).map_err(|e| LibraryError::Io {
        path: data_dir.to_string_lossy().to_string(),
        source: e,
    })?;
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}

fn library_files(dir: &Path) -> Result<Vec<PathBuf>, LibraryError> {
    let entries = fs::read_dir(dir).map_err(|e| LibraryError::Io {
        path: dir.to_string_lossy().to_string(),
        source: e,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| LIBRARY_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn scan_file(
    path: &Path,
    blocks: &mut BTreeMap<String, BlockDefinition>,
) -> Result<(), LibraryError> {
    debug!("Scanning library file {:?}", path);
    let file = File::open(path).map_err(|e| LibraryError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    let lines =
        significant_lines(&mut BufReader::new(file)).map_err(|e| LibraryError::Parse {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

    let mut pending: Option<DefinitionKind> = None;
    for (_, line) in lines {
        match line {
            TopologyLine::Header(name) => {
                pending = match name.as_str() {
                    "moleculetype" => Some(DefinitionKind::MoleculeType),
                    "block" => Some(DefinitionKind::Block),
                    _ => None,
                };
            }
            TopologyLine::Data(data) => {
                if let Some(kind) = pending.take() {
                    if let Some(block_name) = data.split_whitespace().next() {
                        blocks.insert(
                            block_name.to_string(),
                            BlockDefinition {
                                name: block_name.to_string(),
                                kind,
                                source: path.to_path_buf(),
                            },
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn data_dir_with_martini() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let lib = root.path().join("martini3");
        fs::create_dir(&lib).unwrap();
        write(
            &lib,
            "PEO.martini3.ff",
            "[ moleculetype ]\n; name nrexcl\nPEO 1\n[ atoms ]\n1 SN1a 1 PEO EO 1 0\n",
        );
        write(
            &lib,
            "PS.martini3.itp",
            "[ block ]\nPS 1\n[ atoms ]\n1 TC5 1 PS R1 1 0\n[ link ]\nresname \"PS\"\n",
        );
        write(&lib, "README.md", "[ moleculetype ]\nNOT_A_BLOCK 1\n");
        fs::create_dir(root.path().join("oplsaa")).unwrap();
        root
    }

    #[test]
    fn collects_block_names_from_library_files() {
        let root = data_dir_with_martini();
        let handle =
            load_library("libs", &["martini3".to_string()], &[], root.path()).unwrap();
        assert_eq!(handle.monomers(), vec!["PEO", "PS"]);
        assert_eq!(handle.blocks["PS"].kind, DefinitionKind::Block);
        assert_eq!(handle.name, "libs");
    }

    #[test]
    fn extra_files_override_library_definitions() {
        let root = data_dir_with_martini();
        let extra = write(root.path(), "custom.itp", "[ moleculetype ]\nPEO 1\n");
        let handle = load_library(
            "libs",
            &["martini3".to_string()],
            &[extra.clone()],
            root.path(),
        )
        .unwrap();
        assert_eq!(handle.blocks["PEO"].source, extra);
    }

    #[test]
    fn unknown_library_is_reported() {
        let root = data_dir_with_martini();
        let err = load_library("libs", &["gromos".to_string()], &[], root.path()).unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { ref name, .. } if name == "gromos"));
    }

    #[test]
    fn lists_available_libraries() {
        let root = data_dir_with_martini();
        assert_eq!(
            available_libraries(root.path()).unwrap(),
            vec!["martini3", "oplsaa"]
        );
    }
}
