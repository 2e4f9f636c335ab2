use crate::engine::events::Event;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::session::Session;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read script '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Event lines handled, including the ones that failed.
    pub events: usize,
    /// Lines that could not be parsed or whose event failed.
    pub failures: usize,
}

impl ReplaySummary {
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

/// Replays a script of events against `session`.
///
/// Blank lines and lines starting with `#` are skipped. A line that does not
/// parse is reported in the session log like any failing event, and replay
/// carries on with the next line.
#[instrument(skip_all, name = "replay_workflow")]
pub fn run(
    session: &mut Session,
    script: &mut impl BufRead,
    reporter: &ProgressReporter,
) -> Result<ReplaySummary, std::io::Error> {
    let mut lines = Vec::new();
    for (index, line) in script.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push((index + 1, trimmed.to_string()));
    }

    reporter.report(Progress::ScriptStart {
        total_events: lines.len() as u64,
    });
    let mut summary = ReplaySummary::default();

    for (line_number, line) in lines {
        summary.events += 1;
        match Event::parse(&line) {
            Ok(event) => {
                reporter.report(Progress::EventStart {
                    line: line_number,
                    kind: event.kind(),
                });
                let outcome = session.handle(event);
                if !outcome.succeeded {
                    summary.failures += 1;
                }
                for entry in &outcome.log {
                    reporter.report(Progress::Message(entry.clone()));
                }
                reporter.report(Progress::EventFinish {
                    succeeded: outcome.succeeded,
                });
            }
            Err(e) => {
                debug!("Unparseable script line {}: {:?}", line_number, line);
                summary.failures += 1;
                session.report(&format!("line {line_number}: {e}"));
                reporter.report(Progress::Message(format!(
                    "Error: line {line_number}: {e}"
                )));
            }
        }
    }

    reporter.report(Progress::ScriptFinish);
    info!(
        "Replayed {} event(s), {} failure(s)",
        summary.events, summary.failures
    );
    Ok(summary)
}

/// Replays the script stored at `path`.
pub fn run_path(
    session: &mut Session,
    path: &Path,
    reporter: &ProgressReporter,
) -> Result<ReplaySummary, ReplayError> {
    let io_error = |e: std::io::Error| ReplayError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    };
    let file = File::open(path).map_err(io_error)?;
    run(session, &mut BufReader::new(file), reporter).map_err(io_error)
}
