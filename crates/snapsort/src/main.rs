//! Snapsort CLI - sort a folder of photos into semantic categories.
//!
//! Snapsort classifies every image in a source folder against a fixed set of
//! category prompts using a local CLIP model, then copies each image into a
//! per-category subfolder of the destination.
//!
//! # Usage
//!
//! ```bash
//! # Sort a folder of photos
//! snapsort sort ./photos ./sorted
//!
//! # View configuration
//! snapsort config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Snapsort - sort photos into semantic categories with a local CLIP model.
#[derive(Parser, Debug)]
#[command(name = "snapsort")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify and sort a folder of images into category folders
    Sort(cli::sort::SortArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match snapsort_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `snapsort config path`."
            );
            snapsort_core::Config::default()
        }
    };
    logging::init(&config.logging, cli.verbose, cli.json_logs);

    tracing::debug!("Snapsort v{}", snapsort_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Sort(args) => cli::sort::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args),
    }
}
