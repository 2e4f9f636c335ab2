use polybuild::core::layout::LayoutOptions;
use polybuild::engine::config as core_config;

pub struct DefaultsConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub radius_scale: f64,
    pub zoom_step: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub generator_program: String,
    pub molecule_name: String,
    pub generator_verbosity: u8,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let layout = LayoutOptions::default();
        Self {
            canvas_width: core_config::DEFAULT_CANVAS_WIDTH,
            canvas_height: core_config::DEFAULT_CANVAS_HEIGHT,
            radius_scale: core_config::DEFAULT_RADIUS_SCALE,
            zoom_step: core_config::DEFAULT_ZOOM_STEP,
            max_iterations: layout.max_iterations,
            tolerance: layout.tolerance,
            generator_program: core_config::DEFAULT_GENERATOR_PROGRAM.to_string(),
            molecule_name: core_config::DEFAULT_MOLECULE_NAME.to_string(),
            generator_verbosity: 0,
        }
    }
}
