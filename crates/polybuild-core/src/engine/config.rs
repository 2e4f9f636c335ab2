use super::render::Palette;
use crate::core::layout::LayoutOptions;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;
pub const DEFAULT_RADIUS_SCALE: f64 = 80.0;
pub const DEFAULT_ZOOM_STEP: f64 = 0.12;
pub const DEFAULT_GENERATOR_PROGRAM: &str = "polyply";
pub const DEFAULT_MOLECULE_NAME: &str = "polybuild";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub radius_scale: f64,
    pub zoom_step: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub data_dir: PathBuf,
    pub extra_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub program: String,
    pub molecule_name: String,
    pub verbosity: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub canvas: CanvasConfig,
    pub palette: Palette,
    pub layout: LayoutOptions,
    /// Seeds the session's own randomness (atactic assignment).
    pub seed: Option<u64>,
    pub library: LibraryConfig,
    pub generator: GeneratorConfig,
}

#[derive(Default)]
pub struct SessionConfigBuilder {
    canvas_width: Option<f64>,
    canvas_height: Option<f64>,
    radius_scale: Option<f64>,
    zoom_step: Option<f64>,
    palette: Option<Palette>,
    layout: Option<LayoutOptions>,
    seed: Option<u64>,
    data_dir: Option<PathBuf>,
    extra_library_paths: Vec<PathBuf>,
    generator_program: Option<String>,
    molecule_name: Option<String>,
    generator_verbosity: Option<u8>,
}

impl SessionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas_size(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = Some(width);
        self.canvas_height = Some(height);
        self
    }
    pub fn radius_scale(mut self, scale: f64) -> Self {
        self.radius_scale = Some(scale);
        self
    }
    pub fn zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = Some(step);
        self
    }
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }
    pub fn layout(mut self, options: LayoutOptions) -> Self {
        self.layout = Some(options);
        self
    }
    /// Seeds both the layout jitter and the session's tacticity draws.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn data_dir(mut self, path: PathBuf) -> Self {
        self.data_dir = Some(path);
        self
    }
    pub fn extra_library_path(mut self, path: PathBuf) -> Self {
        self.extra_library_paths.push(path);
        self
    }
    pub fn generator_program(mut self, program: &str) -> Self {
        self.generator_program = Some(program.to_string());
        self
    }
    pub fn molecule_name(mut self, name: &str) -> Self {
        self.molecule_name = Some(name.to_string());
        self
    }
    pub fn generator_verbosity(mut self, verbosity: u8) -> Self {
        self.generator_verbosity = Some(verbosity);
        self
    }

    pub fn build(self) -> Result<SessionConfig, ConfigError> {
        let canvas = CanvasConfig {
            width: positive("canvas_width", self.canvas_width.unwrap_or(DEFAULT_CANVAS_WIDTH))?,
            height: positive(
                "canvas_height",
                self.canvas_height.unwrap_or(DEFAULT_CANVAS_HEIGHT),
            )?,
            radius_scale: positive(
                "radius_scale",
                self.radius_scale.unwrap_or(DEFAULT_RADIUS_SCALE),
            )?,
            zoom_step: positive("zoom_step", self.zoom_step.unwrap_or(DEFAULT_ZOOM_STEP))?,
        };

        let mut layout = self.layout.unwrap_or_default();
        if self.seed.is_some() {
            layout.seed = self.seed;
        }
        if layout.max_iterations == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        positive("tolerance", layout.tolerance)?;

        Ok(SessionConfig {
            canvas,
            palette: self.palette.unwrap_or_default(),
            layout,
            seed: self.seed,
            library: LibraryConfig {
                data_dir: self
                    .data_dir
                    .ok_or(ConfigError::MissingParameter("data_dir"))?,
                extra_paths: self.extra_library_paths,
            },
            generator: GeneratorConfig {
                program: self
                    .generator_program
                    .unwrap_or_else(|| DEFAULT_GENERATOR_PROGRAM.to_string()),
                molecule_name: self
                    .molecule_name
                    .unwrap_or_else(|| DEFAULT_MOLECULE_NAME.to_string()),
                verbosity: self.generator_verbosity.unwrap_or(0),
            },
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_canvas() {
        let config = SessionConfigBuilder::new()
            .data_dir(PathBuf::from("/data"))
            .build()
            .unwrap();
        assert_eq!(config.canvas.width, 800.0);
        assert_eq!(config.canvas.height, 600.0);
        assert_eq!(config.canvas.radius_scale, 80.0);
        assert_eq!(config.canvas.zoom_step, 0.12);
        assert_eq!(config.generator.program, "polyply");
        assert_eq!(config.layout, LayoutOptions::default());
    }

    #[test]
    fn data_dir_is_required() {
        assert_eq!(
            SessionConfigBuilder::new().build().unwrap_err(),
            ConfigError::MissingParameter("data_dir")
        );
    }

    #[test]
    fn seed_reaches_the_layout_options() {
        let config = SessionConfigBuilder::new()
            .data_dir(PathBuf::from("/data"))
            .seed(42)
            .build()
            .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.layout.seed, Some(42));
    }

    #[test]
    fn non_positive_sizes_are_rejected() {
        let err = SessionConfigBuilder::new()
            .data_dir(PathBuf::from("/data"))
            .canvas_size(0.0, 600.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "canvas_width",
                ..
            }
        ));
    }
}
