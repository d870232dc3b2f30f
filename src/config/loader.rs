//! Load client config from the environment (after `.env`) or from a JSON file.

use crate::config::{validate, ClientConfig};
use crate::error::{AppError, ConfigError};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_BASE_URL: &str = "API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "API_TIMEOUT_SECS";
pub const ENV_STALE_SECS: &str = "QUERY_STALE_SECS";
pub const ENV_RETRIES: &str = "QUERY_RETRIES";
pub const ENV_STATE_DIR: &str = "STATE_DIR";

impl ClientConfig {
    /// Defaults overridden by environment variables. Loads `.env` when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ClientConfig::default();
        if let Some(url) = lookup(ENV_BASE_URL).filter(|s| !s.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = parse_env(ENV_TIMEOUT_SECS, &v)?;
        }
        if let Some(v) = lookup(ENV_STALE_SECS) {
            let secs: u64 = parse_env(ENV_STALE_SECS, &v)?;
            config.query.list_stale_ms = secs * 1000;
        }
        if let Some(v) = lookup(ENV_RETRIES) {
            config.query.retries = parse_env(ENV_RETRIES, &v)?;
        }
        if let Some(dir) = lookup(ENV_STATE_DIR).filter(|s| !s.trim().is_empty()) {
            config.state_dir = Some(PathBuf::from(dir));
        }
        validate(&config)?;
        Ok(config)
    }

    /// Read a JSON config file; missing fields take their defaults.
    pub async fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let config: ClientConfig = serde_json::from_str(&raw)?;
        validate(&config)?;
        Ok(config)
    }
}

fn parse_env<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}
