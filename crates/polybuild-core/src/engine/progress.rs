use super::events::EventKind;

#[derive(Debug, Clone)]
pub enum Progress {
    ScriptStart { total_events: u64 },
    EventStart { line: usize, kind: EventKind },
    EventFinish { succeeded: bool },
    ScriptFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
