//! HTTP client configuration

use serde::Deserialize;
use std::time::Duration;

/// HTTP client configuration
///
/// # Example
///
/// ```toml
/// [http]
/// timeout = "60s"
/// user_agent = "crudload/0.1"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout
    /// Default: 60s
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            user_agent: concat!("crudload/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
