//! User-facing output sink.

use std::sync::Arc;

use parking_lot::Mutex;

/// Receives every user-visible outcome of a command.
pub trait Reporter: Send + Sync {
    fn error(&self, message: &str);
    fn success(&self, message: &str);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn error(&self, message: &str) {
        (**self).error(message)
    }

    fn success(&self, message: &str) {
        (**self).success(message)
    }
}

/// One recorded report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Error(String),
    Success(String),
}

/// Reporter that keeps everything in memory, for tests.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<Report>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.reports
            .lock()
            .iter()
            .filter_map(|r| match r {
                Report::Error(m) => Some(m.clone()),
                Report::Success(_) => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.reports
            .lock()
            .iter()
            .filter_map(|r| match r {
                Report::Success(m) => Some(m.clone()),
                Report::Error(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.reports.lock().clear();
    }
}

impl Reporter for RecordingReporter {
    fn error(&self, message: &str) {
        self.reports.lock().push(Report::Error(message.to_string()));
    }

    fn success(&self, message: &str) {
        self.reports.lock().push(Report::Success(message.to_string()));
    }
}
