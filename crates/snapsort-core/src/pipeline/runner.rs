//! Batch orchestration: scan, classify, place, report.
//!
//! One control context calls `start`; one background worker per run does all
//! blocking work (decode, inference, copy) strictly sequentially. At most
//! one worker is ever active, so `RunState` needs no locking beyond the
//! single-writer discipline: the worker mutates it, observers only see it
//! through `ProgressReporter` events.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::category::CategoryTable;
use crate::classify::Classifier;
use crate::config::ScanConfig;
use crate::error::{ItemError, RunError, StartError};

use super::decode::decode;
use super::discovery::{FileDiscovery, ImageRecord};
use super::progress::{ProgressReporter, RunState, RunStatus};
use super::sorter::FileSorter;

/// Orchestrates classification-and-sorting runs over a source directory.
pub struct BatchPipeline {
    classifier: Arc<dyn Classifier>,
    scan: ScanConfig,
    busy: Arc<AtomicBool>,
}

/// Handle to a running batch. Awaiting it yields the terminal status.
pub struct RunHandle {
    inner: tokio::task::JoinHandle<RunStatus>,
}

impl RunHandle {
    /// Wait for the background worker to finish.
    pub async fn wait(self) -> RunStatus {
        self.inner.await.unwrap_or(RunStatus::Failed)
    }
}

/// Clears the busy flag when the worker exits, on every path.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BatchPipeline {
    /// Create a pipeline around a classifier.
    pub fn new(classifier: Arc<dyn Classifier>, scan: ScanConfig) -> Self {
        Self {
            classifier,
            scan,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a run is currently active.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Start a sorting run over `source_dir`, placing copies under
    /// `dest_dir/<category id>/`.
    ///
    /// Validates both directories synchronously; on success spawns exactly
    /// one background worker and returns immediately. Rejected with
    /// `StartError::Busy` while a previous run is active — the active run is
    /// unaffected.
    pub fn start(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        table: CategoryTable,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<RunHandle, StartError> {
        if !source_dir.is_dir() {
            return Err(StartError::NotADirectory(source_dir.to_path_buf()));
        }
        if !dest_dir.is_dir() {
            return Err(StartError::NotADirectory(dest_dir.to_path_buf()));
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(StartError::Busy);
        }

        let worker = Worker {
            classifier: Arc::clone(&self.classifier),
            discovery: FileDiscovery::new(self.scan.clone()),
            table,
            source_dir: source_dir.to_path_buf(),
            dest_dir: dest_dir.to_path_buf(),
            reporter,
        };
        let guard = BusyGuard(Arc::clone(&self.busy));

        let inner = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            worker.run()
        });

        Ok(RunHandle { inner })
    }
}

/// Everything one background run owns.
struct Worker {
    classifier: Arc<dyn Classifier>,
    discovery: FileDiscovery,
    table: CategoryTable,
    source_dir: PathBuf,
    dest_dir: PathBuf,
    reporter: Arc<dyn ProgressReporter>,
}

impl Worker {
    /// Run the batch to its terminal state.
    fn run(self) -> RunStatus {
        let mut state = RunState::new();

        state.status = RunStatus::Scanning;
        self.reporter.on_status("Scanning source folder");

        let files = match self.discovery.scan(&self.source_dir) {
            Ok(files) => files,
            Err(e) => return self.abort(&mut state, &e),
        };

        // Category folders exist after every completed run, even an empty
        // one, so downstream consumers can rely on the layout.
        if let Err(e) = self.create_category_dirs() {
            return self.abort(&mut state, &e);
        }

        state.total = files.len();
        if files.is_empty() {
            tracing::info!("No images found in {:?}", self.source_dir);
            self.reporter.on_log("No images found", true);
            self.reporter.on_status("No images found");
            self.reporter.on_complete();
            state.status = RunStatus::Done;
            return state.status;
        }

        tracing::info!("Found {} images in {:?}", state.total, self.source_dir);
        self.reporter.on_total(state.total);
        self.reporter
            .on_log(&format!("Found {} images", state.total), true);

        state.status = RunStatus::Running;
        for record in &files {
            state.current_file = record.file_name.clone();

            match self.process_one(record) {
                Ok(line) => self.reporter.on_log(&line, false),
                Err(e) => {
                    tracing::warn!("Failed to sort {:?}: {}", record.path, e);
                    self.reporter
                        .on_log(&format!("{}: {}", record.file_name, e), true);
                }
            }

            state.completed += 1;
            self.reporter.on_progress(state.fraction());
            self.reporter
                .on_status(&format!("Classified: {}", state.current_file));
        }

        tracing::info!(
            "Run complete: {}/{} images processed",
            state.completed,
            state.total
        );
        self.reporter.on_progress(1.0);
        self.reporter.on_log("All images sorted", true);
        self.reporter.on_status("Classification complete");
        self.reporter.on_complete();
        state.status = RunStatus::Done;
        state.status
    }

    /// Classify one image and place it, returning the log line.
    fn process_one(&self, record: &ImageRecord) -> Result<String, ItemError> {
        let image = decode(&record.path)?;
        let result = self
            .classifier
            .classify(&image, &self.table, &record.path)?;
        FileSorter::place(record, &result.category_id, &self.dest_dir)?;

        tracing::debug!(
            "{} => {} ({:.4})",
            record.file_name,
            result.category_id,
            result.confidence
        );
        Ok(format!(
            "{} => {} ({:.2}%)",
            record.file_name,
            result.category_id,
            result.confidence * 100.0
        ))
    }

    /// Pre-create every category's destination subfolder.
    fn create_category_dirs(&self) -> Result<(), RunError> {
        for entry in self.table.entries() {
            let dir = self.dest_dir.join(&entry.id);
            std::fs::create_dir_all(&dir).map_err(|e| RunError::Prepare {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Transition to `Failed` and notify the observer.
    fn abort(&self, state: &mut RunState, error: &RunError) -> RunStatus {
        tracing::error!("Run aborted: {}", error);
        self.reporter.on_error(&error.to_string());
        state.status = RunStatus::Failed;
        state.status
    }
}
