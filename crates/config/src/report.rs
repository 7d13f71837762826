//! Progress and summary reporting configuration
//!
//! # Defaults
//!
//! - `enabled`: true
//! - `interval`: 5s
//! - `format`: human
//! - `summary_export`: none

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Report output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON structured output
    Json,
}

/// Report configuration
///
/// # Example
///
/// ```toml
/// [report]
/// enabled = true
/// interval = "5s"
/// format = "human"
/// summary_export = "summary.json"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Emit periodic progress lines while the test runs
    pub enabled: bool,

    /// Progress interval
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Output format for progress lines and the final summary
    pub format: ReportFormat,

    /// Write the final summary as JSON to this path
    pub summary_export: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(5),
            format: ReportFormat::Human,
            summary_export: None,
        }
    }
}
