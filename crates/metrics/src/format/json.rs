//! JSON metrics formatter
//!
//! Progress reports are single-line JSON for log shipping; the summary is the
//! full snapshot, pretty-printed.
//!
//! # Example Output
//!
//! ```json
//! {"type":"progress","elapsed_secs":35.0,"vus":20,"iterations":640,"requests":4410,
//!  "iterations_per_sec":18.2,"requests_per_sec":126.0,"checks_passed":4408,"checks_failed":2}
//! ```

use serde::Serialize;

use super::MetricsFormatter;
use crate::{MetricsRates, MetricsSnapshot};

/// JSON metrics formatter
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct ProgressJson {
    #[serde(rename = "type")]
    report_type: &'static str,
    elapsed_secs: f64,
    vus: u64,
    iterations: u64,
    requests: u64,
    iterations_per_sec: f64,
    requests_per_sec: f64,
    checks_passed: u64,
    checks_failed: u64,
}

#[derive(Serialize)]
struct SummaryJson<'a> {
    #[serde(rename = "type")]
    report_type: &'static str,
    #[serde(flatten)]
    snapshot: &'a MetricsSnapshot,
}

impl MetricsFormatter for JsonFormatter {
    fn format_progress(&self, snapshot: &MetricsSnapshot, rates: Option<&MetricsRates>) -> String {
        let (requests_per_sec, iterations_per_sec) = match rates {
            Some(rates) => (rates.requests_per_sec, rates.iterations_per_sec),
            None => (snapshot.requests_per_sec(), snapshot.iterations_per_sec()),
        };

        let json = ProgressJson {
            report_type: "progress",
            elapsed_secs: snapshot.elapsed_secs,
            vus: snapshot.vus_active,
            iterations: snapshot.iterations_finished(),
            requests: snapshot.total_requests(),
            iterations_per_sec,
            requests_per_sec,
            checks_passed: snapshot.checks_passed(),
            checks_failed: snapshot.checks_failed(),
        };

        // Compact JSON (no pretty printing for log lines)
        serde_json::to_string(&json).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_summary(&self, snapshot: &MetricsSnapshot) -> String {
        let json = SummaryJson {
            report_type: "summary",
            snapshot,
        };

        serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string())
    }
}
