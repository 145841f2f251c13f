//! Logging initialization.
//!
//! One entry point shaped around snapsort's `LoggingConfig`: the config
//! file picks the baseline level and format, the CLI flags override it, and
//! `RUST_LOG` overrides everything. Logs go to stderr so stdout stays free
//! for the progress display.

use snapsort_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `verbose` forces DEBUG level regardless of the configured level;
/// `json_logs` forces structured JSON output.
pub fn init(config: &LoggingConfig, verbose: bool, json_logs: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json_logs || config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}
