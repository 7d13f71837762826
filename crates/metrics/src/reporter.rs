//! Periodic progress reporter
//!
//! Runs as an async task, takes a snapshot from the shared collector at the
//! configured interval and emits the formatted progress line via tracing.

use crudload_config::ReportConfig;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::format::{MetricsFormatter, formatter_for};
use crate::{MetricsCollector, MetricsSnapshot};

/// Progress reporter for a running load test
pub struct Reporter {
    config: ReportConfig,
    formatter: Box<dyn MetricsFormatter>,
    collector: MetricsCollector,
    previous: Option<MetricsSnapshot>,
}

impl Reporter {
    /// Create a reporter over `collector`
    pub fn new(config: ReportConfig, collector: MetricsCollector) -> Self {
        let formatter = formatter_for(config.format);
        Self {
            config,
            formatter,
            collector,
            previous: None,
        }
    }

    /// Run the reporter until cancellation
    ///
    /// Spawn this as a tokio task.
    pub async fn run(mut self, cancel: CancellationToken) {
        if !self.config.enabled {
            info!("progress reporting disabled");
            return;
        }

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // First tick completes immediately; nothing to report yet
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    break;
                }
                _ = ticker.tick() => {
                    for line in self.report().lines() {
                        info!("{}", line);
                    }
                }
            }
        }
    }

    /// Snapshot and format once
    fn report(&mut self) -> String {
        let snapshot = self.collector.snapshot();
        let rates = self
            .previous
            .as_ref()
            .and_then(|prev| snapshot.rates_since(prev));

        let output = self.formatter.format_progress(&snapshot, rates.as_ref());
        self.previous = Some(snapshot);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudload_config::ReportFormat;
    use std::time::Duration;

    #[test]
    fn test_report_tracks_previous() {
        let collector = MetricsCollector::new();
        let mut reporter = Reporter::new(ReportConfig::default(), collector.clone());

        collector.record_request("GET /roles", 200, Duration::from_millis(3));
        let first = reporter.report();
        assert!(first.starts_with("[progress]"));
        assert!(reporter.previous.is_some());

        collector.record_request("GET /roles", 200, Duration::from_millis(3));
        let second = reporter.report();
        assert!(second.contains("requests 2"));
    }

    #[test]
    fn test_json_format() {
        let config = ReportConfig {
            format: ReportFormat::Json,
            ..Default::default()
        };
        let mut reporter = Reporter::new(config, MetricsCollector::new());
        assert!(reporter.report().starts_with(r#"{"type":"progress""#));
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let config = ReportConfig {
            interval: Duration::from_millis(10),
            ..Default::default()
        };
        let reporter = Reporter::new(config, MetricsCollector::new());
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(reporter.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(35)).await;
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("reporter should stop")
            .expect("reporter task panicked");
    }

    #[tokio::test]
    async fn test_run_disabled_returns_immediately() {
        let config = ReportConfig {
            enabled: false,
            ..Default::default()
        };
        let reporter = Reporter::new(config, MetricsCollector::new());

        tokio::time::timeout(Duration::from_secs(1), reporter.run(CancellationToken::new()))
            .await
            .expect("disabled reporter should return");
    }
}
