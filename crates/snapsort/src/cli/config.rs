//! The `snapsort config` command.
//!
//! Snapsort runs fine with no config file at all, so the surface is small:
//! inspect the effective configuration and find where a file would go.

use clap::{Args, Subcommand};
use snapsort_core::{ClipClassifier, Config};

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration inspection.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration and model status
    Show,

    /// Show where the config file is read from
    Path,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", config.to_toml()?);

            // The model is the one piece of external state a run depends
            // on; surface whether it is actually in place.
            let model_dir = config.model_dir();
            let status = if ClipClassifier::model_exists(&config.model, &model_dir) {
                "present"
            } else {
                "missing"
            };
            println!(
                "# model '{}' under {}: {}",
                config.model.model,
                model_dir.display(),
                status
            );
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            let status = if path.exists() { "" } else { " (not created; defaults in use)" };
            println!("{}{}", path.display(), status);
        }
    }

    Ok(())
}
