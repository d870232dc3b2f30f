//! Base HTTP client. Transport failures are caught here, once, and turned into
//! [`ApiError`]; callers above this module only ever see the normalized shape.

use crate::config::{parse_base_url, ClientConfig};
use crate::endpoints::ApiPath;
use crate::error::{ApiError, ConfigError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Query parameters in send order.
pub type QueryPairs = Vec<(String, String)>;

#[derive(Clone)]
pub struct HttpClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&config.base_url)?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(HttpClient { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute url for `path`; each segment is percent-encoded on its own.
    pub fn url(&self, path: &ApiPath) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::request(format!("base url cannot take a path: {}", self.base_url)))?;
            segments.pop_if_empty();
            segments.extend(path.segments());
        }
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &ApiPath, query: &[(String, String)]) -> Result<T, ApiError> {
        let body = self.send::<()>(Method::GET, path, query, None).await?;
        decode(&body)
    }

    pub async fn post<B, T>(&self, path: &ApiPath, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(Method::POST, path, &[], body).await?;
        decode(&body)
    }

    pub async fn put<B, T>(&self, path: &ApiPath, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(Method::PUT, path, &[], Some(body)).await?;
        decode(&body)
    }

    /// Response body is ignored; a 404 is still reported as an error.
    pub async fn delete(&self, path: &ApiPath) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &ApiPath,
        query: &[(String, String)],
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(method = %method, url = %url, query = ?query, "request");
        let mut req = self.client.request(method.clone(), url.clone());
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(ApiError::request)?;
            req = req.body(bytes);
        }
        let response = req.send().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, error = %e, "request failed without response");
            if e.is_builder() {
                ApiError::request(e)
            } else {
                ApiError::network(e)
            }
        })?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(ApiError::network)?;
        if !(200..300).contains(&status) {
            let payload: Option<serde_json::Value> = serde_json::from_slice(&bytes).ok();
            tracing::warn!(method = %method, url = %url, status, "request failed");
            return Err(ApiError::from_response(status, payload.as_ref()));
        }
        Ok(Response {
            status,
            body: bytes.to_vec(),
        })
    }
}

struct Response {
    status: u16,
    body: Vec<u8>,
}

/// Empty bodies decode as JSON `null`, so `()` and `Option<T>` accept 204s.
fn decode<T: DeserializeOwned>(response: &Response) -> Result<T, ApiError> {
    let raw: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };
    serde_json::from_slice(raw).map_err(|e| ApiError::decode(response.status, e))
}

/// Append `(key, value)` pairs, skipping absent and blank values so the
/// backend sees "no filter" rather than an empty one.
pub fn push_query(pairs: &mut QueryPairs, key: &str, value: Option<impl ToString>) {
    if let Some(v) = value {
        let v = v.to_string();
        if !v.trim().is_empty() {
            pairs.push((key.to_string(), v));
        }
    }
}

/// `a=1&b=2` rendering of query pairs, used for cache keys and logs. Not
/// percent-encoded.
pub fn query_string(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
