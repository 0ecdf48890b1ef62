//! Datagen CLI Binary
//!
//! Command-line interface for the datagen code generator.

use anyhow::Context;
use clap::Parser;
use datagen::cli::{Cli, RunContext};
use datagen::config::ConfigLoader;
use datagen::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Datagen CLI starting");

    if let Err(e) = run(&cli) {
        error!("Command failed: {:#}", e);
        match e.downcast_ref::<datagen::GenError>() {
            Some(err) => eprintln!("{}", datagen::cli::map_error(err)),
            None => eprintln!("error: {:#}", e),
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let context = RunContext::new(cli.workspace.clone(), cli.config.clone())
        .with_context(|| format!("initializing workspace {}", cli.workspace.display()))?;
    info!("CLI context initialized");

    let output = context.execute(&cli.command)?;
    info!("Command completed successfully");
    println!("{}", output);
    Ok(())
}

/// Build logging configuration from CLI args, environment, and config file
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let explicit_level = cli.log_level.is_some();

    let mut config = ConfigLoader::load_with(&cli.workspace, cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();

    // Without --verbose or an explicit level, only warnings and errors
    if !cli.verbose && !explicit_level {
        config.level = "warn".to_string();
    }

    // Override with CLI arguments (highest priority)
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }

    config
}
