//! Load shape configuration
//!
//! How many virtual users run, for how long, and how they pace themselves.
//!
//! # Defaults
//!
//! - `vus`: 20
//! - `duration`: 1m
//! - `think_time`: 1s
//! - `graceful_stop`: 30s
//! - `iterations`: unlimited
//! - `seed`: none (OS entropy)

use serde::Deserialize;
use std::time::Duration;

/// Load configuration
///
/// # Example
///
/// ```toml
/// [load]
/// vus = 20
/// duration = "1m"
/// think_time = "1s"
/// graceful_stop = "30s"
/// iterations = 5000
/// seed = 42
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Number of concurrent virtual users
    pub vus: usize,

    /// Wall-clock test duration
    #[serde(with = "humantime_serde")]
    pub duration: Duration,

    /// Pause at the end of every iteration
    #[serde(with = "humantime_serde")]
    pub think_time: Duration,

    /// How long in-flight iterations may run after the duration elapses
    #[serde(with = "humantime_serde")]
    pub graceful_stop: Duration,

    /// Total iteration cap shared by all VUs (None = until duration elapses)
    pub iterations: Option<u64>,

    /// RNG seed; each VU derives its own stream from `seed + vu_id`
    pub seed: Option<u64>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            vus: 20,
            duration: Duration::from_secs(60),
            think_time: Duration::from_secs(1),
            graceful_stop: Duration::from_secs(30),
            iterations: None,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoadConfig::default();
        assert_eq!(config.vus, 20);
        assert_eq!(config.duration, Duration::from_secs(60));
        assert_eq!(config.think_time, Duration::from_secs(1));
        assert_eq!(config.graceful_stop, Duration::from_secs(30));
        assert!(config.iterations.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
vus = 50
duration = "5m"
think_time = "250ms"
graceful_stop = "10s"
iterations = 1000
seed = 7
"#;
        let config: LoadConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.vus, 50);
        assert_eq!(config.duration, Duration::from_secs(300));
        assert_eq!(config.think_time, Duration::from_millis(250));
        assert_eq!(config.graceful_stop, Duration::from_secs(10));
        assert_eq!(config.iterations, Some(1000));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_deserialize_duration_variants() {
        for (s, expected) in [
            ("30s", Duration::from_secs(30)),
            ("1m", Duration::from_secs(60)),
            ("1h", Duration::from_secs(3600)),
            ("1m 30s", Duration::from_secs(90)),
        ] {
            let toml = format!("duration = \"{}\"", s);
            let config: LoadConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config.duration, expected, "Failed for {}", s);
        }
    }

    #[test]
    fn test_zero_think_time() {
        let config: LoadConfig = toml::from_str("think_time = \"0s\"").unwrap();
        assert_eq!(config.think_time, Duration::ZERO);
    }
}
