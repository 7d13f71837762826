//! Configuration validation
//!
//! Rejects configs that cannot produce a meaningful run:
//! - Target URL missing or not http(s)
//! - Empty login username
//! - Zero VUs, zero duration or a zero iteration cap
//! - Zero progress interval while reporting is enabled

use crate::Config;
use crate::error::{ConfigError, Result};

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_target(config)?;
    validate_credentials(config)?;
    validate_load(config)?;
    validate_report(config)?;
    Ok(())
}

fn validate_target(config: &Config) -> Result<()> {
    let url = config.target.base_url.trim();
    if url.is_empty() {
        return Err(ConfigError::missing_field("target", "base_url"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::invalid_value(
            "target",
            "base_url",
            format!("'{}' must start with http:// or https://", url),
        ));
    }
    Ok(())
}

fn validate_credentials(config: &Config) -> Result<()> {
    if config.credentials.username.trim().is_empty() {
        return Err(ConfigError::missing_field("credentials", "username"));
    }
    Ok(())
}

fn validate_load(config: &Config) -> Result<()> {
    let load = &config.load;
    if load.vus == 0 {
        return Err(ConfigError::invalid_value("load", "vus", "must be at least 1"));
    }
    if load.duration.is_zero() {
        return Err(ConfigError::invalid_value(
            "load",
            "duration",
            "must be greater than zero",
        ));
    }
    if load.iterations == Some(0) {
        return Err(ConfigError::invalid_value(
            "load",
            "iterations",
            "must be at least 1 when set",
        ));
    }
    Ok(())
}

fn validate_report(config: &Config) -> Result<()> {
    if config.report.enabled && config.report.interval.is_zero() {
        return Err(ConfigError::invalid_value(
            "report",
            "interval",
            "must be greater than zero when reporting is enabled",
        ));
    }
    Ok(())
}
