use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::SessionArgs;
use crate::data::DataDirectory;
use crate::error::{CliError, Result};
use polybuild::core::layout::LayoutOptions;
use polybuild::engine::config as core_config;
use polybuild::engine::render::Palette;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Merges built-in defaults, the config file, `-S` overrides and explicit
/// flags (in increasing precedence) into a session configuration.
pub fn build_config(args: &SessionArgs) -> Result<core_config::SessionConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let canvas = file_config.canvas.take().unwrap_or_default();
    let layout_file = file_config.layout.take().unwrap_or_default();
    let library = file_config.library.take().unwrap_or_default();
    let generator = file_config.generator.take().unwrap_or_default();

    let data_dir = DataDirectory::resolve(args.data_dir.as_deref(), library.data_dir.as_deref())?;

    let palette = match &file_config.palette {
        Some(path) => Palette::load(path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?,
        None => Palette::default(),
    };

    let layout = LayoutOptions {
        max_iterations: layout_file
            .max_iterations
            .unwrap_or(defaults.max_iterations),
        tolerance: layout_file.tolerance.unwrap_or(defaults.tolerance),
        seed: None,
    };

    let mut builder = core_config::SessionConfigBuilder::new()
        .canvas_size(
            args.width
                .or(canvas.width)
                .unwrap_or(defaults.canvas_width),
            args.height
                .or(canvas.height)
                .unwrap_or(defaults.canvas_height),
        )
        .radius_scale(canvas.radius_scale.unwrap_or(defaults.radius_scale))
        .zoom_step(canvas.zoom_step.unwrap_or(defaults.zoom_step))
        .palette(palette)
        .layout(layout)
        .data_dir(data_dir.path().to_path_buf())
        .generator_program(
            generator
                .program
                .as_deref()
                .unwrap_or(&defaults.generator_program),
        )
        .molecule_name(
            generator
                .molecule_name
                .as_deref()
                .unwrap_or(&defaults.molecule_name),
        )
        .generator_verbosity(generator.verbosity.unwrap_or(defaults.generator_verbosity));

    if let Some(seed) = args.seed.or(layout_file.seed) {
        builder = builder.seed(seed);
    }
    for path in library.extra_paths {
        builder = builder.extra_library_path(path);
    }

    let config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!("Session configuration: {:?}", config);
    Ok(config)
}

fn parse_set_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "canvas.width" => {
                config.canvas.get_or_insert_with(Default::default).width =
                    Some(parse_set_value(key, value_str, "float")?);
            }
            "canvas.height" => {
                config.canvas.get_or_insert_with(Default::default).height =
                    Some(parse_set_value(key, value_str, "float")?);
            }
            "canvas.radius-scale" => {
                config
                    .canvas
                    .get_or_insert_with(Default::default)
                    .radius_scale = Some(parse_set_value(key, value_str, "float")?);
            }
            "canvas.zoom-step" => {
                config.canvas.get_or_insert_with(Default::default).zoom_step =
                    Some(parse_set_value(key, value_str, "float")?);
            }
            "layout.max-iterations" => {
                config
                    .layout
                    .get_or_insert_with(Default::default)
                    .max_iterations = Some(parse_set_value(key, value_str, "integer")?);
            }
            "layout.tolerance" => {
                config.layout.get_or_insert_with(Default::default).tolerance =
                    Some(parse_set_value(key, value_str, "float")?);
            }
            "layout.seed" => {
                config.layout.get_or_insert_with(Default::default).seed =
                    Some(parse_set_value(key, value_str, "integer")?);
            }
            "library.data-dir" => {
                config.library.get_or_insert_with(Default::default).data_dir =
                    Some(PathBuf::from(value_str));
            }
            "generator.program" => {
                config.generator.get_or_insert_with(Default::default).program =
                    Some(value_str.to_string());
            }
            "generator.molecule-name" => {
                config
                    .generator
                    .get_or_insert_with(Default::default)
                    .molecule_name = Some(value_str.to_string());
            }
            "generator.verbosity" => {
                config.generator.get_or_insert_with(Default::default).verbosity =
                    Some(parse_set_value(key, value_str, "integer")?);
            }
            "palette" => config.palette = Some(PathBuf::from(value_str)),
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn args_with_data_dir(dir: &Path) -> SessionArgs {
        SessionArgs {
            data_dir: Some(dir.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    #[serial]
    fn defaults_fill_every_missing_value() {
        let data = tempdir().unwrap();
        let config = build_config(&args_with_data_dir(data.path())).unwrap();
        assert_eq!(config.canvas.width, 800.0);
        assert_eq!(config.canvas.height, 600.0);
        assert_eq!(config.canvas.zoom_step, 0.12);
        assert_eq!(config.library.data_dir, data.path());
        assert_eq!(config.generator.program, "polyply");
        assert_eq!(config.layout, LayoutOptions::default());
        assert_eq!(config.seed, None);
    }

    #[test]
    #[serial]
    fn flags_override_set_values_which_override_the_file() {
        let data = tempdir().unwrap();
        let config_path = data.path().join("polybuild.toml");
        fs::write(
            &config_path,
            "[canvas]\nwidth = 500\nheight = 400\nzoom-step = 0.3\n\n[layout]\nseed = 3\n",
        )
        .unwrap();

        let mut args = args_with_data_dir(data.path());
        args.config = Some(config_path);
        args.set_values = vec!["canvas.width=640".into(), "canvas.zoom-step=0.05".into()];
        args.height = Some(480.0);
        args.seed = Some(11);

        let config = build_config(&args).unwrap();
        assert_eq!(config.canvas.width, 640.0);
        assert_eq!(config.canvas.height, 480.0);
        assert_eq!(config.canvas.zoom_step, 0.05);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.layout.seed, Some(11));
    }

    #[test]
    fn malformed_set_values_are_config_errors() {
        let err = apply_set_values(FileConfig::default(), &["canvas.width".into()]).unwrap_err();
        assert!(matches!(err, CliError::Config(ref msg) if msg.contains("KEY=VALUE")));

        let err =
            apply_set_values(FileConfig::default(), &["canvas.width=wide".into()]).unwrap_err();
        assert!(matches!(err, CliError::Config(ref msg) if msg.contains("canvas.width")));

        let err = apply_set_values(FileConfig::default(), &["zoom=1".into()]).unwrap_err();
        assert!(matches!(err, CliError::Config(ref msg) if msg.contains("Unsupported")));
    }

    #[test]
    #[serial]
    fn invalid_values_are_rejected_by_the_core_builder() {
        let data = tempdir().unwrap();
        let mut args = args_with_data_dir(data.path());
        args.set_values = vec!["canvas.radius-scale=-1".into()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    #[serial]
    fn palette_file_is_loaded() {
        let data = tempdir().unwrap();
        let palette_path = data.path().join("colors.toml");
        fs::write(&palette_path, "default-color = \"teal\"\n").unwrap();

        let mut args = args_with_data_dir(data.path());
        args.set_values = vec![format!("palette={}", palette_path.display())];
        let config = build_config(&args).unwrap();
        assert_eq!(config.palette.default_color, "teal");
    }
}
