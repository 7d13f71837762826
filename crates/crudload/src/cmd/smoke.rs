//! Smoke command - one iteration with every check printed
//!
//! Confirms the API and its response envelope before a load run: if login
//! yields no token, or any check fails, the command exits non-zero.
//!
//! # Usage
//!
//! ```bash
//! crudload smoke
//! crudload smoke --base-url http://staging:8080/api --username qa@test.com
//! ```

use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;

use crudload_client::ApiClient;
use crudload_config::Config;
use crudload_loadgen::{LoadEngine, LoadOptions};
use crudload_metrics::{MetricsCollector, MetricsSnapshot};
use crudload_scenario::{CrudJourney, checks};

use super::TargetArgs;

/// Requests in one iteration, used to bound the run
const REQUESTS_PER_ITERATION: u32 = 7;

#[derive(Args, Debug, Default)]
pub struct SmokeArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

pub async fn run(mut config: Config, args: SmokeArgs) -> Result<()> {
    args.target.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let client = ApiClient::from_config(&config).context("failed to create HTTP client")?;
    let journey = CrudJourney::from_config(client, &config).with_think_time(Duration::ZERO);

    println!("Smoke     | {} as {}", config.target.base_url, config.credentials.username);
    println!();

    let options = LoadOptions {
        vus: 1,
        duration: config.http.timeout * (REQUESTS_PER_ITERATION + 1),
        graceful_stop: Duration::ZERO,
        iterations: Some(1),
        seed: config.load.seed,
    };
    let engine = LoadEngine::new(options, MetricsCollector::new());
    let summary = engine.run(Arc::new(journey), CancellationToken::new()).await;

    let (report, failures) = render(&summary.snapshot);
    print!("{}", report);

    if failures > 0 {
        anyhow::bail!("smoke check failed: {} problem(s)", failures);
    }

    println!("\nall checks passed");
    Ok(())
}

/// Render checks and responses; returns the text and the number of problems
fn render(snapshot: &MetricsSnapshot) -> (String, u64) {
    let mut output = String::new();
    let mut failures = 0;

    output.push_str("Checks\n");
    for name in checks::ALL {
        let status = match snapshot.check(name) {
            Some(check) if check.fails > 0 => {
                failures += check.fails;
                "FAIL"
            }
            Some(_) => "PASS",
            None => "SKIP",
        };
        let _ = writeln!(output, "  {}  {}", status, name);
    }

    output.push_str("\nResponses\n");
    for endpoint in &snapshot.requests {
        let mut outcomes: Vec<String> = endpoint
            .statuses
            .keys()
            .map(|status| status.to_string())
            .collect();
        if endpoint.transport_errors > 0 {
            outcomes.push("transport error".to_string());
        }
        let _ = writeln!(
            output,
            "  {:<20} {:<16} {:.1}ms",
            endpoint.name,
            outcomes.join(", "),
            endpoint.latency.max_ms,
        );
    }

    let iterations = &snapshot.iterations;
    if iterations.aborted > 0 {
        failures += iterations.aborted;
        output.push_str("\nlogin returned no access token (checked accessToken and data.accessToken)\n");
    }
    if iterations.interrupted > 0 {
        failures += iterations.interrupted;
        output.push_str("\niteration did not finish before the time limit\n");
    }

    (output, failures)
}
