//! CLI argument parsing and command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// End-of-run status notifications published to an SNS topic
#[derive(Parser)]
#[command(
    name = "sns-report",
    version,
    about = "End-of-run status notifications published to an SNS topic",
    long_about = "Builds a short success/failure notification for a configuration run \
                  and publishes it to an SNS topic. Reads the run context as JSON from \
                  stdin unless --context is given."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Options shared by commands that process a run context.
#[derive(Args)]
pub struct RunArgs {
    /// Read the run context from this JSON file instead of stdin
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Override a notification parameter (name=value, repeatable)
    #[arg(long = "set", short = 's', value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Build and publish the run notification (alias: report)
    #[command(alias = "report")]
    Notify {
        /// Propagate failures instead of logging and ignoring them
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Print the notification that would be published
    Render {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Generate default configuration file
    Init {
        /// Path where to create the configuration file
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
    },
    /// Validate configuration file
    Check,
    /// Display version information
    Version,
}
