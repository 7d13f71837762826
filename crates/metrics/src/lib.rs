//! crudload - Metrics
//!
//! Shared collection and reporting for a load run.
//!
//! # Overview
//!
//! - [`MetricsCollector`]: cloneable handle every virtual user records into;
//!   per-endpoint HDR latency histograms, status and transport error counts,
//!   named check tallies, iteration and VU counters
//! - [`MetricsSnapshot`]: serializable point-in-time copy with derived totals
//!   and interval rates
//! - [`Reporter`]: periodic progress lines through `tracing`
//! - Formatters for human and JSON output
//!
//! # Example
//!
//! ```ignore
//! let collector = MetricsCollector::new();
//! let cancel = CancellationToken::new();
//! tokio::spawn(Reporter::new(config.report.clone(), collector.clone()).run(cancel.clone()));
//!
//! collector.record_request("GET /roles", 200, elapsed);
//! collector.record_check("GET /roles status 200", true);
//!
//! cancel.cancel();
//! println!("{}", HumanFormatter::new().format_summary(&collector.snapshot()));
//! ```

mod collector;
pub mod format;
mod reporter;
mod snapshot;
mod system;

pub use collector::MetricsCollector;
pub use format::{HumanFormatter, JsonFormatter, MetricsFormatter, formatter_for};
pub use reporter::Reporter;
pub use snapshot::{
    CheckSnapshot, EndpointSnapshot, IterationSnapshot, LatencyStats, MetricsRates,
    MetricsSnapshot,
};
pub use system::SystemInfo;
