//! Run command - the load test
//!
//! Spawns the configured virtual users against the API, reports progress
//! while they run, and prints the summary to stdout at the end. The exit code
//! does not reflect check results.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crudload_client::ApiClient;
use crudload_config::Config;
use crudload_loadgen::{LoadEngine, LoadOptions};
use crudload_metrics::{MetricsCollector, Reporter, SystemInfo, formatter_for};
use crudload_scenario::CrudJourney;

use super::{TargetArgs, parse_duration, wait_for_shutdown};

/// Run command arguments
///
/// Every flag also reads a `CRUDLOAD_*` environment variable and falls back to
/// the config file.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Number of concurrent virtual users
    #[arg(long, env = "CRUDLOAD_VUS")]
    pub vus: Option<usize>,

    /// Test duration, e.g. 30s or 5m
    #[arg(long, env = "CRUDLOAD_DURATION", value_parser = parse_duration)]
    pub duration: Option<Duration>,

    /// Total iterations shared by all virtual users
    #[arg(long, env = "CRUDLOAD_ITERATIONS")]
    pub iterations: Option<u64>,

    /// Seed for reproducible random role selection
    #[arg(long, env = "CRUDLOAD_SEED")]
    pub seed: Option<u64>,

    /// Write the final summary as JSON to this file
    #[arg(long, env = "CRUDLOAD_SUMMARY_EXPORT")]
    pub summary_export: Option<PathBuf>,
}

impl RunArgs {
    /// Overlay flags and environment onto the file configuration
    pub fn apply(&self, config: &mut Config) {
        self.target.apply(config);

        if let Some(vus) = self.vus {
            config.load.vus = vus;
        }
        if let Some(duration) = self.duration {
            config.load.duration = duration;
        }
        if self.iterations.is_some() {
            config.load.iterations = self.iterations;
        }
        if self.seed.is_some() {
            config.load.seed = self.seed;
        }
        if self.summary_export.is_some() {
            config.report.summary_export = self.summary_export.clone();
        }
    }
}

/// Run the load test
pub async fn run(mut config: Config, args: RunArgs) -> Result<()> {
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let client = ApiClient::from_config(&config).context("failed to create HTTP client")?;
    let journey = CrudJourney::from_config(client, &config);

    print_header(&config);

    let metrics = MetricsCollector::new();
    let reporter = Reporter::new(config.report.clone(), metrics.clone());
    let report_cancel = CancellationToken::new();
    let reporter_handle = tokio::spawn(reporter.run(report_cancel.clone()));

    let shutdown = CancellationToken::new();
    let signal_task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            wait_for_shutdown().await;
            shutdown.cancel();
        })
    };

    let engine = LoadEngine::new(LoadOptions::from(&config.load), metrics);
    let summary = engine.run(Arc::new(journey), shutdown).await;

    signal_task.abort();
    report_cancel.cancel();
    let _ = reporter_handle.await;

    let output = formatter_for(config.report.format).format_summary(&summary.snapshot);
    println!();
    println!("Finished  | {} ({})", timestamp(), summary.reason);
    println!();
    println!("{}", output);

    if let Some(path) = &config.report.summary_export {
        summary
            .snapshot
            .write_json(path)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        info!(path = %path.display(), "summary exported");
    }

    Ok(())
}

fn print_header(config: &Config) {
    let load = &config.load;
    let limit = match load.iterations {
        Some(iterations) => format!("{} iterations within {:?}", iterations, load.duration),
        None => format!("{:?}", load.duration),
    };

    println!(
        "Load Test | {} | {} vus | {} | think {:?}",
        config.target.base_url, load.vus, limit, load.think_time
    );
    println!("System    | {}", SystemInfo::collect().one_line());
    println!("Started   | {}", timestamp());
    println!();
}

/// Get current timestamp in ISO format
fn timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}
