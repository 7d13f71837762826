//! Point-in-time metrics snapshots
//!
//! Snapshots are plain data: cloneable, serializable, and cheap to diff for
//! interval rates.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

/// Latency distribution in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatencyStats {
    pub min_ms: f64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

/// Iteration counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IterationSnapshot {
    pub started: u64,
    /// Ran every step that applied
    pub completed: u64,
    /// Stopped early because login yielded no token
    pub aborted: u64,
    /// Cut off by the engine after the graceful stop window
    pub interrupted: u64,
}

/// Request statistics for one endpoint
#[derive(Debug, Clone, Default, Serialize)]
pub struct EndpointSnapshot {
    /// Endpoint label, e.g. `GET /users/{id}`
    pub name: String,
    /// Requests issued, including those that failed in transport
    pub count: u64,
    /// Responses per HTTP status
    pub statuses: BTreeMap<u16, u64>,
    pub transport_errors: u64,
    pub latency: LatencyStats,
}

/// Pass/fail tally for one named check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckSnapshot {
    pub name: String,
    pub passes: u64,
    pub fails: u64,
}

impl CheckSnapshot {
    /// Total evaluations
    pub fn total(&self) -> u64 {
        self.passes + self.fails
    }

    /// Fraction of evaluations that passed (0.0 to 1.0)
    pub fn pass_rate(&self) -> f64 {
        ratio(self.passes, self.total())
    }
}

/// Everything the collector knows at one instant
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    /// Seconds since the collector was created
    pub elapsed_secs: f64,
    pub vus_active: u64,
    /// Highest concurrent VU count seen
    pub vus_max: u64,
    pub iterations: IterationSnapshot,
    /// Endpoints in first-seen order
    pub requests: Vec<EndpointSnapshot>,
    /// Checks in first-seen order
    pub checks: Vec<CheckSnapshot>,
}

/// Throughput between two snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricsRates {
    pub elapsed_secs: f64,
    pub requests_per_sec: f64,
    pub iterations_per_sec: f64,
    /// Check failures recorded during the interval
    pub checks_failed: u64,
}

impl MetricsSnapshot {
    /// Requests issued across all endpoints
    pub fn total_requests(&self) -> u64 {
        self.requests.iter().map(|e| e.count).sum()
    }

    /// Transport failures across all endpoints
    pub fn total_transport_errors(&self) -> u64 {
        self.requests.iter().map(|e| e.transport_errors).sum()
    }

    pub fn checks_passed(&self) -> u64 {
        self.checks.iter().map(|c| c.passes).sum()
    }

    pub fn checks_failed(&self) -> u64 {
        self.checks.iter().map(|c| c.fails).sum()
    }

    /// Fraction of all check evaluations that passed, `None` before any ran
    pub fn check_pass_rate(&self) -> Option<f64> {
        let total = self.checks_passed() + self.checks_failed();
        (total > 0).then(|| ratio(self.checks_passed(), total))
    }

    /// Iterations that finished, either completed or aborted
    pub fn iterations_finished(&self) -> u64 {
        self.iterations.completed + self.iterations.aborted
    }

    /// Average requests per second over the whole run
    pub fn requests_per_sec(&self) -> f64 {
        per_sec(self.total_requests(), self.elapsed_secs)
    }

    /// Average finished iterations per second over the whole run
    pub fn iterations_per_sec(&self) -> f64 {
        per_sec(self.iterations_finished(), self.elapsed_secs)
    }

    /// Look up an endpoint by label
    pub fn endpoint(&self, name: &str) -> Option<&EndpointSnapshot> {
        self.requests.iter().find(|e| e.name == name)
    }

    /// Look up a check by name
    pub fn check(&self, name: &str) -> Option<&CheckSnapshot> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// Rates since `previous`, `None` if no time has passed
    pub fn rates_since(&self, previous: &MetricsSnapshot) -> Option<MetricsRates> {
        let elapsed_secs = self.elapsed_secs - previous.elapsed_secs;
        if elapsed_secs <= 0.0 {
            return None;
        }

        Some(MetricsRates {
            elapsed_secs,
            requests_per_sec: per_sec(
                self.total_requests().saturating_sub(previous.total_requests()),
                elapsed_secs,
            ),
            iterations_per_sec: per_sec(
                self.iterations_finished()
                    .saturating_sub(previous.iterations_finished()),
                elapsed_secs,
            ),
            checks_failed: self.checks_failed().saturating_sub(previous.checks_failed()),
        })
    }

    /// Write the snapshot as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or written.
    pub fn write_json(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

fn per_sec(count: u64, secs: f64) -> f64 {
    if secs > 0.0 { count as f64 / secs } else { 0.0 }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 { 0.0 } else { part as f64 / total as f64 }
}
