use crate::cli::RenderArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use nalgebra::Vector2;
use polybuild::core::io::registry::read_fragment;
use polybuild::core::layout::{Viewport, compute_layout};
use polybuild::engine::config::SessionConfig;
use polybuild::engine::error::EngineError;
use polybuild::engine::render::Scene;
use polybuild::engine::svg::SvgCanvas;
use std::path::Path;
use tracing::info;

pub fn run(args: RenderArgs) -> Result<()> {
    if args.zoom >= 1.0 {
        return Err(CliError::Argument(format!(
            "--zoom must be below 1, got {}",
            args.zoom
        )));
    }
    let config = build_config(&args.session)?;

    info!("Loading residue graph from {:?}", &args.input);
    let fragment = read_fragment(&args.input)
        .map_err(|e| CliError::Core(EngineError::from_fragment(&args.input, e)))?;

    let cache = compute_layout(&fragment.graph, None, &config.layout).map_err(EngineError::from)?;
    let viewport = Viewport::for_canvas(config.canvas.width, config.canvas.height)
        .with_view(args.zoom, Vector2::new(args.pan_x, args.pan_y));
    let scene = Scene::build(
        &fragment.graph,
        &cache,
        &viewport,
        &config.palette,
        config.canvas.radius_scale,
    )
    .map_err(EngineError::from)?;

    write_svg(&scene, &config, &args.output)?;
    println!(
        "✓ Drew {} residue(s) of '{}' to: {}",
        scene.nodes.len(),
        fragment.name,
        args.output.display()
    );
    Ok(())
}

/// Draws `scene` on a canvas the size of the configured one and saves it.
pub fn write_svg(scene: &Scene, config: &SessionConfig, path: &Path) -> Result<()> {
    let mut canvas = SvgCanvas::new(config.canvas.width, config.canvas.height);
    scene.draw(&mut canvas);
    info!(
        "Writing {} SVG element(s) to {:?}",
        canvas.element_count(),
        path
    );
    std::fs::write(path, canvas.to_document())?;
    Ok(())
}
