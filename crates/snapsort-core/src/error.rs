//! Error types for the snapsort classification-and-sorting pipeline.
//!
//! Errors are layered by blast radius: `ConfigError` is fatal at
//! construction, `StartError` rejects a run before any work is scheduled,
//! `ItemError` is confined to a single image inside a run, and `RunError`
//! aborts a run that is already underway.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for snapsort operations.
#[derive(Error, Debug)]
pub enum SnapsortError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Run admission errors
    #[error("Start error: {0}")]
    Start(#[from] StartError),

    /// Per-image processing errors
    #[error("Item error: {0}")]
    Item(#[from] ItemError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// A category table was constructed with no entries
    #[error("Category table must contain at least one entry")]
    EmptyCategoryTable,

    /// Two category entries share the same id
    #[error("Duplicate category id: {id}")]
    DuplicateCategory { id: String },
}

/// Errors that reject `start` synchronously, before a worker is spawned.
#[derive(Error, Debug)]
pub enum StartError {
    /// Source or destination is not an existing directory
    #[error("Not an existing directory: {0}")]
    NotADirectory(PathBuf),

    /// A sorting run is already in progress
    #[error("A sorting run is already in progress")]
    Busy,
}

/// Per-image errors, caught inside the worker loop.
///
/// These are logged against the offending file and never abort the batch.
#[derive(Error, Debug)]
pub enum ItemError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Model forward pass failed
    #[error("Inference error for {path}: {message}")]
    Inference { path: PathBuf, message: String },

    /// Copying the image to its category folder failed
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model or tokenizer could not be loaded
    #[error("Model error: {message}")]
    Model { message: String },
}

/// Run-aborting errors: the whole batch terminates in `Failed`.
#[derive(Error, Debug)]
pub enum RunError {
    /// Source directory became unreadable during scanning
    #[error("Failed to scan {path}: {message}")]
    Scan { path: PathBuf, message: String },

    /// Destination category folders could not be created
    #[error("Failed to prepare destination {path}: {source}")]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for snapsort results.
pub type Result<T> = std::result::Result<T, SnapsortError>;
