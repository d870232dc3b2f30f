use crate::endpoints::Database;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self.status.to_lowercase().as_str(), "ok" | "up" | "healthy")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatus {
    #[serde(rename = "type")]
    pub database: Database,
    pub connected: bool,
    /// Milliseconds.
    #[serde(default)]
    pub response_time: u64,
    #[serde(default)]
    pub last_checked: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
