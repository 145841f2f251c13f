//! Snapsort Core - zero-shot photo classification and sorting.
//!
//! Snapsort takes a folder of images, scores every image against a fixed set
//! of natural-language category prompts with a local CLIP model, and copies
//! each image into the destination folder of its best-scoring category while
//! streaming progress to an observer.
//!
//! # Architecture
//!
//! ```text
//! Scan source dir → Decode → Classify (CLIP, one softmax over all prompts)
//!                 → Copy to dest/<category>/ → Progress events
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use snapsort_core::{BatchPipeline, CategoryTable, ClipClassifier, Config, NullReporter};
//!
//! #[tokio::main]
//! async fn main() -> snapsort_core::Result<()> {
//!     let config = Config::load()?;
//!     let classifier = ClipClassifier::load(&config.model, &config.model_dir())?;
//!     let pipeline = BatchPipeline::new(Arc::new(classifier), config.scan.clone());
//!
//!     let handle = pipeline.start(
//!         "./photos".as_ref(),
//!         "./sorted".as_ref(),
//!         CategoryTable::builtin(),
//!         Arc::new(NullReporter),
//!     )?;
//!     handle.wait().await;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod category;
pub mod classify;
pub mod config;
pub mod error;
pub mod math;
pub mod pipeline;

// Re-exports for convenient access
pub use category::{CategoryEntry, CategoryTable};
pub use classify::{Classification, Classifier, ClipClassifier};
pub use config::Config;
pub use error::{ConfigError, ItemError, Result, RunError, SnapsortError, StartError};
pub use pipeline::{
    BatchPipeline, NullReporter, ProgressReporter, RunHandle, RunState, RunStatus,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
