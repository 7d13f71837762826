//! Metrics output formatters
//!
//! Formats snapshots for human-readable or JSON output.

mod human;
mod json;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

use crudload_config::ReportFormat;

use crate::{MetricsRates, MetricsSnapshot};

/// Trait for metrics formatters
pub trait MetricsFormatter: Send + Sync {
    /// Format a periodic progress report
    ///
    /// `rates` is `None` for the first report of a run.
    fn format_progress(&self, snapshot: &MetricsSnapshot, rates: Option<&MetricsRates>) -> String;

    /// Format the end-of-run summary
    fn format_summary(&self, snapshot: &MetricsSnapshot) -> String;
}

/// Formatter for a configured report format
pub fn formatter_for(format: ReportFormat) -> Box<dyn MetricsFormatter> {
    match format {
        ReportFormat::Human => Box::new(HumanFormatter::new()),
        ReportFormat::Json => Box::new(JsonFormatter::new()),
    }
}

/// Format count with K/M suffix for readability
pub fn format_count(count: u64) -> String {
    const K: u64 = 1000;
    const M: u64 = 1_000_000;

    if count >= M {
        format!("{:.1}M", count as f64 / M as f64)
    } else if count >= K {
        format!("{:.1}K", count as f64 / K as f64)
    } else {
        count.to_string()
    }
}

/// Format rate per second with K suffix
pub fn format_rate(rate: f64) -> String {
    const K: f64 = 1000.0;

    if rate >= K {
        format!("{:.1}K/s", rate / K)
    } else if rate >= 10.0 {
        format!("{:.0}/s", rate)
    } else {
        format!("{:.1}/s", rate)
    }
}

/// Format a latency given in milliseconds
pub fn format_latency(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else if ms >= 1.0 {
        format!("{:.2}ms", ms)
    } else {
        format!("{:.0}µs", ms * 1000.0)
    }
}

/// Format a ratio as a percentage
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(500), "500");
        assert_eq!(format_count(1000), "1.0K");
        assert_eq!(format_count(1500), "1.5K");
        assert_eq!(format_count(1_000_000), "1.0M");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(2.5), "2.5/s");
        assert_eq!(format_rate(140.0), "140/s");
        assert_eq!(format_rate(1500.0), "1.5K/s");
    }

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency(0.25), "250µs");
        assert_eq!(format_latency(12.5), "12.50ms");
        assert_eq!(format_latency(1500.0), "1.50s");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.25), "25.00%");
        assert_eq!(format_percent(1.0), "100.00%");
    }

    #[test]
    fn test_formatter_for() {
        let snapshot = MetricsSnapshot::default();
        let json = formatter_for(ReportFormat::Json).format_summary(&snapshot);
        assert!(json.starts_with('{'));
        let human = formatter_for(ReportFormat::Human).format_summary(&snapshot);
        assert!(human.contains("iterations"));
    }
}
