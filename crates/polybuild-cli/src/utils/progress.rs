use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use polybuild::engine::progress::{Progress, ProgressCallback};
use std::time::Duration;

const SPINNER_TICK_MS: u64 = 80;

/// Mirrors replay progress on a bar and prints the log panel above it.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: ProgressBar,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0).with_style(Self::bar_style());
        pb.set_draw_target(ProgressDrawTarget::stderr());
        Self { pb }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();

        Box::new(move |progress: Progress| match progress {
            Progress::ScriptStart { total_events } => {
                pb.reset();
                pb.set_length(total_events);
                pb.set_position(0);
            }
            Progress::EventStart { line, kind } => {
                pb.set_message(format!("line {line}: {kind}"));
            }
            Progress::EventFinish { .. } => pb.inc(1),
            Progress::ScriptFinish => pb.finish_and_clear(),
            Progress::Message(msg) => pb.println(format!("  {}", msg)),
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<32} [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("Failed to create bar style template")
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// A steady spinner for one blocking step, such as running the generator.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Failed to create spinner style template"),
    );
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
    pb.set_message(message.to_string());
    pb
}
