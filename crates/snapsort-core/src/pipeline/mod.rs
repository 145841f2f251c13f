//! The classification-and-sorting pipeline.
//!
//! Stages, in processing order:
//! - **discovery**: enumerate qualifying image files in the source folder
//! - **decode**: load and decode one image
//! - **sorter**: duplicate a classified image into its category folder
//! - **runner**: the batch state machine driving the above off-thread
//! - **progress**: the worker-to-observer event contract

pub mod decode;
pub mod discovery;
pub mod progress;
pub mod runner;
pub mod sorter;

// Re-exports for convenient access
pub use discovery::{FileDiscovery, ImageRecord};
pub use progress::{NullReporter, ProgressReporter, RunState, RunStatus};
pub use runner::{BatchPipeline, RunHandle};
pub use sorter::FileSorter;
