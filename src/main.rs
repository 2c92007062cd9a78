//! sns-report: end-of-run notifications for configuration management runs
//!
//! Builds a short success/failure message describing a configuration run and
//! publishes it to an SNS topic, optionally gated by the run's workflow activity.

mod cli;
mod config;
mod domain;
mod service;

use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::Parser;

use cli::{Cli, Commands, RunArgs};
use config::{Config, ConfigService, HostProbe};
use domain::{Diagnostics, ExecutionContext, PlaceholderEngine, TracingDiagnostics};
use service::{AwsCliTransport, DispatchOutcome, Dispatcher};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match ConfigService::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if is_safe_notify(&cli.command) => {
            let _ = domain::logger::init_stderr();
            TracingDiagnostics.error(&format!("Failed to send notification: {:#}", e));
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let logging = if cli.debug || config.debug {
        domain::logger::init(&config)
    } else {
        domain::logger::init_stderr()
    };
    if let Err(e) = logging {
        if !is_safe_notify(&cli.command) {
            return Err(e);
        }
        // Safe runs fall back to stderr and carry on
        let _ = domain::logger::init_stderr();
        TracingDiagnostics.warn(&format!("File logging unavailable: {:#}", e));
    }

    match cli.command {
        Commands::Notify { strict, run } => {
            let outcome = if strict {
                let (dispatcher, context) = prepare_run(&config, &run)?;
                dispatcher.run_unsafe(&context)?
            } else {
                match prepare_run(&config, &run) {
                    Ok((dispatcher, context)) => dispatcher.run_safe(&context),
                    Err(e) => {
                        TracingDiagnostics.error(&format!("Failed to send notification: {:#}", e));
                        DispatchOutcome::Suppressed
                    }
                }
            };
            report(&outcome, cli.quiet);
        }
        Commands::Render { run } => {
            let (dispatcher, context) = prepare_run(&config, &run)?;
            let (_, message) = dispatcher.prepare(&context)?;
            println!("Subject: {}", message.subject);
            println!();
            print!("{}", message.body);
        }
        Commands::Init { path } => {
            let config_path = if let Some(p) = path {
                ConfigService::generate_at(&p)?;
                p
            } else {
                ConfigService::generate_default()?;
                ConfigService::default_path()
            };
            if !cli.quiet {
                eprintln!("Configuration file created at: {}", config_path.display());
            }
        }
        Commands::Check => {
            if let Err(failed) = config.validate(&TracingDiagnostics) {
                for violation in failed.violations() {
                    eprintln!("  - {}", violation);
                }
                bail!("Configuration is invalid: {}", failed);
            }
            if !cli.quiet {
                eprintln!("Configuration is valid.");
            }
        }
        Commands::Version => {
            println!("sns-report {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Load the run context and build a dispatcher from file configuration plus overrides.
fn prepare_run(config: &Config, run: &RunArgs) -> Result<(Dispatcher, ExecutionContext)> {
    let diagnostics = TracingDiagnostics;

    let mut params = config.parameters(&diagnostics)?;
    for assignment in &run.overrides {
        if let Err(e) = params.apply_override(assignment) {
            bail!("Invalid --set value: {}", e);
        }
    }

    let context = read_context(run)?;
    let dispatcher = Dispatcher::new(
        params,
        Box::new(HostProbe::from_env()),
        Box::new(PlaceholderEngine),
        Box::new(AwsCliTransport::new(&config.aws_cli)),
        Box::new(diagnostics),
    );

    Ok((dispatcher, context))
}

fn read_context(run: &RunArgs) -> Result<ExecutionContext> {
    let input = match &run.context {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read run context: {}", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read run context from stdin")?;
            input
        }
    };

    if input.trim().is_empty() {
        bail!("No run context received");
    }

    ExecutionContext::from_json(&input).context("Failed to parse run context")
}

fn is_safe_notify(command: &Commands) -> bool {
    matches!(command, Commands::Notify { strict: false, .. })
}

fn report(outcome: &DispatchOutcome, quiet: bool) {
    if quiet {
        return;
    }
    match outcome {
        DispatchOutcome::Published => eprintln!("Notification published."),
        DispatchOutcome::Filtered => eprintln!("Notification skipped by activity filter."),
        // Already logged
        DispatchOutcome::Suppressed => {}
    }
}
