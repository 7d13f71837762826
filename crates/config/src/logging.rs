//! Logging configuration
//!
//! Controls crudload's own diagnostic output. The final summary always goes to
//! stdout; logs default to stderr so the two can be separated, e.g.
//! `crudload run 2>run.log`.

use serde::Deserialize;

/// Crates that log every connection at debug level
const NOISY_DEPENDENCIES: [&str; 3] = ["hyper_util", "reqwest", "h2"];

/// Verbosity of crudload's logs
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Response bodies of every request
    Trace,
    /// Failed checks and transport errors
    Debug,
    /// Run lifecycle and progress lines
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `EnvFilter` directive for this level
    ///
    /// At debug and trace, the HTTP stack is held at info so per-request
    /// detail from the journey is not buried under connection pool logs.
    pub fn filter_directive(&self) -> String {
        match self {
            Self::Trace | Self::Debug => NOISY_DEPENDENCIES
                .iter()
                .fold(self.as_str().to_string(), |mut directive, krate| {
                    directive.push_str(&format!(",{}=info", krate));
                    directive
                }),
            _ => self.as_str().to_string(),
        }
    }
}

/// Line format of log records
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Console,
    /// One JSON object per line, for log shippers
    Json,
}

/// Stream log records are written to
///
/// Only the standard streams are supported; redirect to capture a file.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
}

/// `[log]` section
///
/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// output = "stderr"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
}
