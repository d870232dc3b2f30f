//! Wire records for the four stores. Plain data: identifiers, business
//! attributes and optional server-computed timestamps.

mod cache;
mod documento;
mod graph;
mod health;
mod usuario;

pub use cache::*;
pub use documento::*;
pub use graph::*;
pub use health::*;
pub use usuario::*;

use crate::http::QueryPairs;
use serde::{Deserialize, Deserializer};

/// Typed filter set of one resource. Absent or blank values never reach the
/// query string.
pub trait QueryFilters: Clone + Default + Send + Sync + 'static {
    fn to_query(&self) -> QueryPairs;
}

/// Ids are strings client-side; relational backends may send numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected string or number id, got {}", other))),
    }
}
