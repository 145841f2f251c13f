//! The progress-reporting contract between the worker and the front end.
//!
//! Events flow one way, worker to observer. The observer must treat every
//! call as an asynchronous notification and never call back into the
//! worker's state. Events for image *i* always arrive strictly before those
//! for image *i+1*.

/// Terminal and intermediate states of a sorting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No run in progress
    Idle,
    /// Enumerating the source directory
    Scanning,
    /// Classifying and placing images
    Running,
    /// Run finished; per-item failures may have occurred but are visible
    /// only in the log
    Done,
    /// Run aborted before or during scanning
    Failed,
}

/// Mutable state of one run, owned exclusively by the background worker.
#[derive(Debug, Clone)]
pub struct RunState {
    /// Number of qualifying images found at scan time
    pub total: usize,
    /// Images processed so far, including per-item failures
    pub completed: usize,
    /// File currently being processed
    pub current_file: String,
    /// Current phase
    pub status: RunStatus,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            total: 0,
            completed: 0,
            current_file: String::new(),
            status: RunStatus::Idle,
        }
    }

    /// Fraction of the batch completed, in [0, 1]. Zero-total runs report 1.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer interface implemented by the front end.
///
/// Implementations are called from the background worker and must be
/// thread-safe. Default implementations ignore every event so observers can
/// pick what they care about.
pub trait ProgressReporter: Send + Sync {
    /// Total number of images found; emitted once, before processing.
    fn on_total(&self, _total: usize) {}

    /// Fraction of the batch completed, in [0, 1].
    fn on_progress(&self, _fraction: f32) {}

    /// One log line; `emphasized` marks notices (found-count, completion,
    /// failures) as distinct from routine per-image lines.
    fn on_log(&self, _line: &str, _emphasized: bool) {}

    /// Short status text describing the current activity.
    fn on_status(&self, _text: &str) {}

    /// The run reached `Done`.
    fn on_complete(&self) {}

    /// The run aborted with `Failed`.
    fn on_error(&self, _message: &str) {}
}

/// Reporter that drops every event. Useful for headless callers and tests.
pub struct NullReporter;

impl ProgressReporter for NullReporter {}
