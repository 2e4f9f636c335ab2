use crate::cli::LibraryArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use polybuild::core::library::{self, LibraryHandle};
use polybuild::engine::error::EngineError;
use std::path::Path;
use tracing::info;

pub fn run(args: LibraryArgs) -> Result<()> {
    let config = build_config(&args.session)?;
    let data_dir = &config.library.data_dir;

    match &args.force_field {
        Some(force_field) => {
            let handle = monomers_of(force_field, &config.library.extra_paths, data_dir)?;
            println!("Monomers in '{}':", handle.name);
            for monomer in handle.monomers() {
                println!("  {}", monomer);
            }
        }
        None => {
            let names = library::available_libraries(data_dir).map_err(EngineError::from)?;
            if names.is_empty() {
                return Err(CliError::Data(format!(
                    "No force-field libraries found in {}",
                    data_dir.display()
                )));
            }
            println!("Libraries in {}:", data_dir.display());
            for name in names {
                println!("  {}", name);
            }
        }
    }
    Ok(())
}

fn monomers_of(
    force_field: &str,
    extra_paths: &[std::path::PathBuf],
    data_dir: &Path,
) -> Result<LibraryHandle> {
    info!("Scanning library '{}' in {:?}", force_field, data_dir);
    let handle = library::load_library(
        force_field,
        &[force_field.to_string()],
        extra_paths,
        data_dir,
    )
    .map_err(EngineError::from)?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SessionArgs;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    fn args(dir: &Path, force_field: Option<&str>) -> LibraryArgs {
        LibraryArgs {
            force_field: force_field.map(str::to_string),
            session: SessionArgs {
                data_dir: Some(dir.to_path_buf()),
                ..Default::default()
            },
        }
    }

    #[test]
    #[serial]
    fn lists_monomers_of_a_force_field() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("martini3")).unwrap();
        fs::write(
            dir.path().join("martini3/PEO.itp"),
            "[ moleculetype ]\nPEO 1\n[ atoms ]\n1 SN1a 1 PEO EO 1 0\n",
        )
        .unwrap();

        let handle = monomers_of("martini3", &[], dir.path()).unwrap();
        assert_eq!(handle.monomers(), vec!["PEO".to_string()]);
        run(args(dir.path(), Some("martini3"))).unwrap();
    }

    #[test]
    #[serial]
    fn unknown_force_field_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            run(args(dir.path(), Some("gromos"))),
            Err(CliError::Core(EngineError::Library { .. }))
        ));
    }

    #[test]
    #[serial]
    fn empty_data_dir_has_no_libraries() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            run(args(dir.path(), None)),
            Err(CliError::Data(_))
        ));
    }
}
