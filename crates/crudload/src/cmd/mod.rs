//! Command implementations for the crudload CLI

pub mod run;
pub mod smoke;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use crudload_config::Config;
use tokio::signal;
use tracing::{info, warn};

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_PATHS: [&str; 2] = ["crudload.toml", "configs/crudload.toml"];

/// Target and account overrides shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Base URL of the API, e.g. http://localhost:8080/api
    #[arg(long, env = "CRUDLOAD_BASE_URL")]
    pub base_url: Option<String>,

    /// Login username
    #[arg(long, env = "CRUDLOAD_USERNAME")]
    pub username: Option<String>,

    /// Login password
    #[arg(long, env = "CRUDLOAD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl TargetArgs {
    /// Overlay flags and environment onto the file configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.target.base_url = base_url.clone();
        }
        if let Some(username) = &self.username {
            config.credentials.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.credentials.password = password.clone();
        }
    }
}

/// Load configuration
///
/// An explicit path must exist. Without one, the default paths are tried in
/// order and built-in defaults are used if none exists.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            Config::from_file(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))
        }
        None => {
            for candidate in DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from) {
                if candidate.exists() {
                    return Config::from_file(&candidate).with_context(|| {
                        format!("failed to load configuration from {}", candidate.display())
                    });
                }
            }
            Ok(Config::default())
        }
    }
}

/// Parse a human duration such as `30s` or `1m30s`
pub fn parse_duration(s: &str) -> Result<std::time::Duration, String> {
    humantime_serde::re::humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Wait for SIGINT or SIGTERM
pub async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, stopping load test");
}
