use super::render::write_svg;
use crate::cli::RunArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use polybuild::core::io::node_link::{NodeLinkFile, NodeLinkMetadata};
use polybuild::core::io::traits::GraphWriter;
use polybuild::engine::error::EngineError;
use polybuild::engine::events::Event;
use polybuild::engine::progress::ProgressReporter;
use polybuild::engine::session::Session;
use polybuild::workflows;
use tracing::{info, warn};

pub fn run(args: RunArgs) -> Result<()> {
    let config = build_config(&args.session)?;
    let mut session = Session::new(config);

    if let Some(force_field) = &args.force_field {
        info!("Selecting force field '{}'", force_field);
        let outcome = session.handle(Event::SetForceField(force_field.clone()));
        for line in &outcome.log {
            println!("  {}", line);
        }
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Replaying {}...", args.script.display());
    let summary = workflows::replay::run_path(&mut session, &args.script, &reporter)?;
    info!(
        "Replay finished: {} event(s), {} failure(s)",
        summary.events, summary.failures
    );

    if session.blocks().is_empty() {
        println!("No blocks in the session.");
    } else {
        println!("Blocks:");
        for label in session.blocks().labels() {
            println!("  {}", label);
        }
    }

    if let Some(path) = &args.graph {
        NodeLinkFile::write_to_path(session.graph(), &NodeLinkMetadata::default(), path).map_err(
            |e| EngineError::Write {
                path: path.to_string_lossy().to_string(),
                source: e,
            },
        )?;
        println!("✓ Residue graph written to: {}", path.display());
    }

    if let Some(path) = &args.svg {
        let scene = session.scene()?;
        write_svg(&scene, session.config(), path)?;
        println!("✓ Final frame drawn to: {}", path.display());
    }

    if !summary.is_clean() {
        warn!(
            "{} of {} event(s) failed; see the log above.",
            summary.failures, summary.events
        );
        if args.strict {
            return Err(CliError::ScriptFailed {
                events: summary.events,
                failures: summary.failures,
            });
        }
    }
    Ok(())
}
