//! Config validation: base url shape and query limits.

use crate::config::ClientConfig;
use crate::error::ConfigError;
use reqwest::Url;

/// Parse the configured base url; only absolute http(s) urls are accepted.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(url)
}

pub fn validate(config: &ClientConfig) -> Result<(), ConfigError> {
    parse_base_url(&config.base_url)?;
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation("timeout_secs must be at least 1".into()));
    }
    if config.query.retries > 10 {
        return Err(ConfigError::Validation("query.retries must be at most 10".into()));
    }
    Ok(())
}
