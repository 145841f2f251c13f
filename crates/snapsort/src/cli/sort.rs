//! The `snapsort sort` command: classify a folder and sort it into
//! category subfolders, with a terminal progress bar.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use snapsort_core::{
    BatchPipeline, CategoryTable, ClipClassifier, Config, ProgressReporter, RunStatus,
};

/// Arguments for the `sort` command.
#[derive(Args, Debug)]
pub struct SortArgs {
    /// Source folder containing the images to classify
    pub source: PathBuf,

    /// Destination folder; one subfolder per category is created here
    pub dest: PathBuf,

    /// Override the model directory from the config file
    #[arg(long)]
    pub model_dir: Option<PathBuf>,
}

/// Execute the sort command.
pub async fn execute(args: SortArgs, config: Config) -> anyhow::Result<()> {
    let model_dir = args.model_dir.unwrap_or_else(|| config.model_dir());

    let classifier = ClipClassifier::load(&config.model, &model_dir)
        .context("Failed to load the CLIP model")?;
    let pipeline = BatchPipeline::new(Arc::new(classifier), config.scan.clone());

    let reporter = Arc::new(ConsoleReporter::new());
    let handle = pipeline
        .start(
            &args.source,
            &args.dest,
            CategoryTable::builtin(),
            reporter.clone(),
        )
        .context("Could not start the sorting run")?;

    let status = handle.wait().await;
    reporter.finish();

    match status {
        RunStatus::Done => Ok(()),
        _ => anyhow::bail!("Sorting run did not complete"),
    }
}

/// Terminal implementation of the pipeline's progress contract.
///
/// The bar exists only between `on_total` and the end of the run; scan-time
/// notices ("No images found", abort messages) arrive before any total is
/// known and go straight to stderr. Once the bar is live, lines are printed
/// through it so they do not tear the display.
struct ConsoleReporter {
    bar: Mutex<Option<ProgressBar>>,
    total: AtomicU64,
}

impl ConsoleReporter {
    fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            total: AtomicU64::new(0),
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }

    fn print(&self, line: String) {
        match &*self.bar.lock().unwrap() {
            Some(bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }
}

/// Decorate notices so they stand out from routine per-image lines.
fn format_line(line: &str, emphasized: bool) -> String {
    if emphasized {
        format!("==> {line}")
    } else {
        line.to_string()
    }
}

/// Create the batch progress bar on stderr.
fn create_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    bar
}

impl ProgressReporter for ConsoleReporter {
    fn on_total(&self, total: usize) {
        self.total.store(total as u64, Ordering::SeqCst);
        *self.bar.lock().unwrap() = Some(create_progress_bar(total as u64));
    }

    fn on_progress(&self, fraction: f32) {
        let total = self.total.load(Ordering::SeqCst);
        if let Some(bar) = &*self.bar.lock().unwrap() {
            bar.set_position((fraction * total as f32).round() as u64);
        }
    }

    fn on_log(&self, line: &str, emphasized: bool) {
        self.print(format_line(line, emphasized));
    }

    fn on_status(&self, text: &str) {
        if let Some(bar) = &*self.bar.lock().unwrap() {
            bar.set_message(text.to_string());
        }
    }

    fn on_complete(&self) {
        if let Some(bar) = &*self.bar.lock().unwrap() {
            bar.set_message("done");
        }
    }

    fn on_error(&self, message: &str) {
        self.print(format!("error: {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_emphasis() {
        assert_eq!(format_line("Found 3 images", true), "==> Found 3 images");
        assert_eq!(format_line("a.jpg => طعام (92.00%)", false), "a.jpg => طعام (92.00%)");
    }

    #[test]
    fn test_reporter_handles_events_before_any_total() {
        // A zero-image or aborted run never emits on_total; notices must
        // still be deliverable without a bar.
        let reporter = ConsoleReporter::new();
        reporter.on_log("No images found", true);
        reporter.on_status("No images found");
        reporter.on_error("source folder vanished");
        reporter.on_complete();
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_reporter_creates_bar_on_total() {
        let reporter = ConsoleReporter::new();
        reporter.on_total(4);

        let guard = reporter.bar.lock().unwrap();
        let bar = guard.as_ref().expect("bar should exist after on_total");
        assert_eq!(bar.length(), Some(4));
        drop(guard);

        reporter.on_progress(0.5);
        let guard = reporter.bar.lock().unwrap();
        assert_eq!(guard.as_ref().unwrap().position(), 2);
    }
}
