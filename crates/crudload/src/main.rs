//! crudload - Load test runner for role/user CRUD REST APIs
//!
//! # Usage
//!
//! ```bash
//! # Run the load test (default)
//! crudload
//! crudload --config crudload.toml run --vus 50 --duration 5m
//!
//! # One iteration, print every check, non-zero exit on failure
//! crudload smoke --base-url http://staging:8080/api
//! ```

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crudload_config::{LogConfig, LogFormat, LogOutput};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// crudload - Load test runner for role/user CRUD REST APIs
#[derive(Parser, Debug)]
#[command(name = "crudload")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true, env = "CRUDLOAD_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true, env = "CRUDLOAD_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the load test
    Run(cmd::run::RunArgs),

    /// Run one iteration and report every check
    Smoke(cmd::smoke::SmokeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cmd::load_config(cli.config.as_deref())?;
    let log_level = resolve_log_level(cli.log_level.as_deref(), &config.log);
    init_logging(&log_level, &config.log)?;

    match cli.command {
        Some(Command::Run(args)) => cmd::run::run(config, args).await,
        Some(Command::Smoke(args)) => cmd::smoke::run(config, args).await,
        // No subcommand = run with config and environment only
        None => cmd::run::run(config, cmd::run::RunArgs::default()).await,
    }
}

/// Resolve log level: CLI flag > config file > default "info"
fn resolve_log_level(cli_level: Option<&str>, config: &LogConfig) -> String {
    match cli_level {
        Some(level) => level.to_string(),
        None => config.level.filter_directive(),
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let writer = match config.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    match config.format {
        LogFormat::Console => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(writer),
            )
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_target(true).with_writer(writer))
            .with(filter)
            .init(),
    }

    Ok(())
}
