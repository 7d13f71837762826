//! Human-readable metrics formatter
//!
//! # Example Output
//!
//! ```text
//! [progress] 35s | vus 20 | iterations 640 (18/s) | requests 4.4K (126/s) | checks 99.95% (2 failed)
//! ```
//!
//! The final summary lists every check, then a latency table per endpoint.

use std::fmt::Write;
use std::time::Duration;

use super::{MetricsFormatter, format_count, format_latency, format_percent, format_rate};
use crate::{EndpointSnapshot, MetricsRates, MetricsSnapshot};

/// Human-readable metrics formatter
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter;

impl HumanFormatter {
    /// Create a new human formatter
    pub fn new() -> Self {
        Self
    }

    fn format_checks(&self, snapshot: &MetricsSnapshot, output: &mut String) {
        let Some(pass_rate) = snapshot.check_pass_rate() else {
            output.push_str("checks          none recorded\n");
            return;
        };

        let _ = writeln!(
            output,
            "checks          {} passed ({} passed, {} failed)",
            format_percent(pass_rate),
            snapshot.checks_passed(),
            snapshot.checks_failed(),
        );

        for check in &snapshot.checks {
            let mark = if check.fails == 0 { "ok  " } else { "FAIL" };
            let _ = write!(
                output,
                "  [{}] {:<32} {}/{}",
                mark,
                check.name,
                check.passes,
                check.total(),
            );
            if check.fails > 0 {
                let _ = write!(output, " ({} failed)", check.fails);
            }
            output.push('\n');
        }
    }

    fn format_endpoint(&self, endpoint: &EndpointSnapshot, output: &mut String) {
        let latency = &endpoint.latency;
        let _ = write!(
            output,
            "  {:<20} {:>7} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}  ",
            endpoint.name,
            format_count(endpoint.count),
            format_latency(latency.min_ms),
            format_latency(latency.mean_ms),
            format_latency(latency.p50_ms),
            format_latency(latency.p90_ms),
            format_latency(latency.p95_ms),
            format_latency(latency.p99_ms),
            format_latency(latency.max_ms),
        );

        let mut statuses: Vec<String> = endpoint
            .statuses
            .iter()
            .map(|(status, count)| format!("{}x{}", status, count))
            .collect();
        if endpoint.transport_errors > 0 {
            statuses.push(format!("errx{}", endpoint.transport_errors));
        }
        output.push_str(&statuses.join(" "));
        output.push('\n');
    }
}

impl MetricsFormatter for HumanFormatter {
    fn format_progress(&self, snapshot: &MetricsSnapshot, rates: Option<&MetricsRates>) -> String {
        // First report has no previous snapshot; fall back to run averages
        let (requests_per_sec, iterations_per_sec) = match rates {
            Some(rates) => (rates.requests_per_sec, rates.iterations_per_sec),
            None => (snapshot.requests_per_sec(), snapshot.iterations_per_sec()),
        };

        let mut output = format!(
            "[progress] {} | vus {} | iterations {} ({}) | requests {} ({})",
            format_duration(Duration::from_secs_f64(snapshot.elapsed_secs)),
            snapshot.vus_active,
            format_count(snapshot.iterations_finished()),
            format_rate(iterations_per_sec),
            format_count(snapshot.total_requests()),
            format_rate(requests_per_sec),
        );

        if let Some(pass_rate) = snapshot.check_pass_rate() {
            let _ = write!(
                output,
                " | checks {} ({} failed)",
                format_percent(pass_rate),
                snapshot.checks_failed(),
            );
        }

        output
    }

    fn format_summary(&self, snapshot: &MetricsSnapshot) -> String {
        let mut output = String::with_capacity(2048);
        let iterations = &snapshot.iterations;

        let _ = writeln!(
            output,
            "duration        {}",
            format_duration(Duration::from_secs_f64(snapshot.elapsed_secs)),
        );
        let _ = writeln!(output, "vus             {} max", snapshot.vus_max);
        let _ = writeln!(
            output,
            "iterations      {} completed, {} aborted, {} interrupted ({})",
            iterations.completed,
            iterations.aborted,
            iterations.interrupted,
            format_rate(snapshot.iterations_per_sec()),
        );
        let _ = writeln!(
            output,
            "requests        {} ({}), {} transport errors",
            snapshot.total_requests(),
            format_rate(snapshot.requests_per_sec()),
            snapshot.total_transport_errors(),
        );
        output.push('\n');

        self.format_checks(snapshot, &mut output);

        if !snapshot.requests.is_empty() {
            output.push('\n');
            let _ = writeln!(
                output,
                "  {:<20} {:>7} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}  statuses",
                "endpoint", "count", "min", "mean", "p50", "p90", "p95", "p99", "max",
            );
            for endpoint in &snapshot.requests {
                self.format_endpoint(endpoint, &mut output);
            }
        }

        output
    }
}

/// Format a duration for display
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}
