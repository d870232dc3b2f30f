use super::QueryFilters;
use crate::error::ValidationErrors;
use crate::http::{push_query, QueryPairs};
use crate::validation::{is_present, is_valid_cache_key, RangeRule, TextRule, Validate};
use serde::{Deserialize, Serialize};

/// Entry of the key-value store. The key is the identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
    /// Seconds to live; -1 means no expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl CacheEntry {
    pub fn expires(&self) -> bool {
        matches!(self.ttl, Some(t) if t >= 0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntryForm {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheFilters {
    /// Glob pattern, e.g. `session:*`.
    pub pattern: Option<String>,
}

impl QueryFilters for CacheFilters {
    fn to_query(&self) -> QueryPairs {
        let mut q = QueryPairs::new();
        push_query(&mut q, "pattern", self.pattern.as_deref());
        q
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    #[serde(default)]
    pub total_keys: u64,
    #[serde(default)]
    pub used_memory: String,
    #[serde(default)]
    pub uptime: u64,
    #[serde(default)]
    pub version: String,
}

const KEY: TextRule = TextRule {
    min: 1,
    max: 255,
    too_short: "Key é obrigatória",
    too_long: "Key muito longa",
};

/// Up to 30 days, or -1 for no expiry.
const TTL: RangeRule = RangeRule {
    min: -1,
    max: 2_592_000,
    too_small: "TTL deve ser -1 (sem expiração) ou positivo",
    too_large: "TTL máximo de 30 dias",
};

impl Validate for CacheEntryForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        KEY.check(&mut errors, "key", &self.key);
        if is_present(&self.key) && !is_valid_cache_key(self.key.trim()) {
            errors.add("key", "Key contém caracteres inválidos");
        }
        if !is_present(&self.value) {
            errors.add("value", "Value é obrigatório");
        }
        if let Some(ttl) = self.ttl {
            TTL.check(&mut errors, "ttl", ttl);
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_field_maps_to_kind() {
        let e: CacheEntry = serde_json::from_value(json!({ "key": "k", "value": "v", "ttl": -1, "type": "string" })).unwrap();
        assert_eq!(e.kind.as_deref(), Some("string"));
        assert!(!e.expires());
    }

    #[test]
    fn form_bounds() {
        let ok = CacheEntryForm { key: "user:1".into(), value: "Ana".into(), ttl: Some(60) };
        assert!(ok.validate().is_ok());
        let bad = CacheEntryForm { key: String::new(), value: " ".into(), ttl: Some(-5) };
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.fields().count(), 3);
        assert_eq!(errors.field("key"), ["Key é obrigatória".to_string()]);

        let spaced = CacheEntryForm { key: "minha chave".into(), value: "v".into(), ttl: None };
        assert_eq!(spaced.validate().unwrap_err().field("key"), ["Key contém caracteres inválidos".to_string()]);
    }
}
