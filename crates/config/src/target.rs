//! Target API configuration
//!
//! Where the load is sent.

use serde::Deserialize;

/// Target API configuration
///
/// # Example
///
/// ```toml
/// [target]
/// base_url = "http://localhost:8080/api"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL every endpoint path is appended to
    /// Default: "http://localhost:8080/api"
    pub base_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
        }
    }
}
