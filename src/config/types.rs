//! Client configuration types. Every field has a default so a partial file or
//! environment is enough.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend root; resource paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub query: QueryConfig,
    /// Directory for persisted client state. `None` keeps state in memory.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            query: QueryConfig::default(),
            state_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Query cache behavior.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Freshness window for list queries.
    #[serde(default = "default_list_stale_ms")]
    pub list_stale_ms: u64,
    /// Freshness window for single-item queries.
    #[serde(default = "default_item_stale_ms")]
    pub item_stale_ms: u64,
    /// Automatic retries for a failed fetch. Mutations are never retried.
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            list_stale_ms: default_list_stale_ms(),
            item_stale_ms: default_item_stale_ms(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl QueryConfig {
    pub fn list_stale_time(&self) -> Duration {
        Duration::from_millis(self.list_stale_ms)
    }

    pub fn item_stale_time(&self) -> Duration {
        Duration::from_millis(self.item_stale_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_list_stale_ms() -> u64 {
    30_000
}

fn default_item_stale_ms() -> u64 {
    60_000
}

fn default_retries() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    1_000
}
