//! crudload Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! An empty file is a valid config: it targets `http://localhost:8080/api`
//! with 20 VUs for one minute.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use crudload_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[load]\nvus = 5").unwrap();
//! assert_eq!(config.load.vus, 5);
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [target]
//! base_url = "http://localhost:8080/api"
//!
//! [credentials]
//! username = "admin@email.com"
//! password = "s3cr3t"
//!
//! [load]
//! vus = 20
//! duration = "1m"
//! think_time = "1s"
//!
//! [http]
//! timeout = "60s"
//!
//! [log]
//! level = "info"
//!
//! [report]
//! interval = "5s"
//! summary_export = "summary.json"
//! ```

mod credentials;
mod error;
mod http;
mod load;
mod logging;
mod report;
mod target;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use credentials::CredentialsConfig;
pub use error::{ConfigError, Result};
pub use http::HttpConfig;
pub use load::LoadConfig;
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use report::{ReportConfig, ReportFormat};
pub use target::TargetConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API under test
    pub target: TargetConfig,

    /// Test account used for login
    pub credentials: CredentialsConfig,

    /// Virtual users, duration and pacing
    pub load: LoadConfig,

    /// HTTP client settings
    pub http: HttpConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Progress and summary reporting
    pub report: ReportConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(ConfigError::ParseError)
    }

    /// Validate the configuration
    ///
    /// Parsing does not validate, so flags and environment variables can
    /// still fix a value from the file. Call this once overrides are applied.
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
