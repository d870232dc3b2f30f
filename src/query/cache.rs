//! Shared query cache.
//!
//! Entries hold the last successful result as JSON. Each key has at most one
//! fetch in flight; readers of the same key attach to it. Fetches run as
//! spawned tasks and write their result into the cache themselves, so a
//! caller that goes away neither cancels the fetch nor observes its result.
//!
//! Generations come from one cache-wide counter and are never reused.
//! Invalidation moves the entry to a new generation. A fetch started before
//! that still stores its data when nothing newer exists, but cannot mark the
//! entry fresh again. A fetch started before the entry was removed and
//! recreated is discarded.

use super::QueryKey;
use crate::config::QueryConfig;
use crate::error::ApiError;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

type InFlight = Shared<BoxFuture<'static, Result<Value, ApiError>>>;
type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, Result<Value, ApiError>> + Send + Sync>;

struct Entry {
    data: Option<Value>,
    updated_at: Option<Instant>,
    stale_time: Duration,
    invalidated: bool,
    error: Option<ApiError>,
    /// Generation the entry was created at.
    born: u64,
    generation: u64,
    in_flight: Option<(u64, InFlight)>,
}

impl Entry {
    fn new(stale_time: Duration, generation: u64) -> Self {
        Entry {
            data: None,
            updated_at: None,
            stale_time,
            invalidated: false,
            error: None,
            born: generation,
            generation,
            in_flight: None,
        }
    }

    fn is_time_stale(&self, now: Instant) -> bool {
        match self.updated_at {
            Some(at) => now.duration_since(at) >= self.stale_time,
            None => true,
        }
    }

    fn invalidate(&mut self, generation: u64) {
        self.generation = generation;
        self.invalidated = true;
        // Readers after this point must not attach to a pre-invalidation fetch.
        self.in_flight = None;
    }
}

/// Read-only view of one entry for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct QuerySnapshot<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub is_stale: bool,
    pub is_fetching: bool,
    pub updated_at: Option<Instant>,
}

enum Plan {
    Cached(Value),
    Wait { fetch: InFlight, fallback: Option<Value> },
}

#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    generations: AtomicU64,
    config: QueryConfig,
}

impl QueryCache {
    pub fn new(config: QueryConfig) -> Self {
        QueryCache {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                generations: AtomicU64::new(0),
                config,
            }),
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.inner.config
    }

    /// Read `key`, fetching when needed.
    ///
    /// - fresh entry: returned as is;
    /// - entry past its freshness window: returned immediately, one
    ///   background refetch started;
    /// - missing or invalidated entry: waits for a fetch. When that fetch
    ///   fails and older data exists, the older data is returned and the
    ///   error is kept on the entry.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, stale_time: Duration, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let fetcher: Fetcher = Arc::new(move || {
            let fut = fetch();
            async move {
                let item = fut.await?;
                serde_json::to_value(item).map_err(|e| ApiError::decode(200, e))
            }
            .boxed()
        });

        let plan = {
            let mut entries = self.lock();
            let now = Instant::now();
            let entry = entries.entry(key.clone()).or_insert_with(|| Entry::new(stale_time, self.next_generation()));
            entry.stale_time = stale_time;
            match entry.data.clone() {
                Some(data) if !entry.invalidated => {
                    if entry.is_time_stale(now) && entry.in_flight.is_none() {
                        tracing::debug!(key = %key, "stale, revalidating in background");
                        self.start_fetch(&key, entry, fetcher);
                    }
                    Plan::Cached(data)
                }
                fallback => Plan::Wait {
                    fetch: self.start_fetch(&key, entry, fetcher),
                    fallback,
                },
            }
        };

        let value = match plan {
            Plan::Cached(v) => v,
            Plan::Wait { fetch, fallback } => match fetch.await {
                Ok(v) => v,
                Err(e) => match fallback {
                    Some(v) => {
                        tracing::warn!(key = %key, error = %e, "refetch failed, serving cached data");
                        v
                    }
                    None => return Err(e),
                },
            },
        };
        serde_json::from_value(value).map_err(|e| ApiError::decode(200, e))
    }

    /// Join the entry's current fetch, or spawn one.
    fn start_fetch(&self, key: &QueryKey, entry: &mut Entry, fetcher: Fetcher) -> InFlight {
        if let Some((_, fetch)) = &entry.in_flight {
            return fetch.clone();
        }
        let generation = entry.generation;
        let cache = self.clone();
        let task_key = key.clone();
        let retries = self.inner.config.retries;
        let delay = self.inner.config.retry_delay();
        let handle = tokio::spawn(async move {
            let result = fetch_with_retry(&fetcher, retries, delay, &task_key).await;
            cache.complete(&task_key, generation, &result);
            result
        });
        let fetch = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(ApiError::network(e)),
            }
        }
        .boxed()
        .shared();
        entry.in_flight = Some((generation, fetch.clone()));
        fetch
    }

    fn complete(&self, key: &QueryKey, generation: u64, result: &Result<Value, ApiError>) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            tracing::debug!(key = %key, "fetch finished for removed entry, discarded");
            return;
        };
        if generation < entry.born {
            tracing::debug!(key = %key, "fetch predates entry, discarded");
            return;
        }
        let current = entry.generation == generation;
        if current {
            entry.in_flight = None;
        }
        match result {
            Ok(v) => {
                if current {
                    entry.data = Some(v.clone());
                    entry.updated_at = Some(Instant::now());
                    entry.invalidated = false;
                    entry.error = None;
                } else if entry.data.is_none() {
                    entry.data = Some(v.clone());
                    entry.updated_at = Some(Instant::now());
                }
            }
            Err(e) => {
                if current {
                    entry.error = Some(e.clone());
                }
            }
        }
    }

    /// Mark every key in `scope` invalidated; the next read of each refetches.
    pub fn invalidate_scope(&self, scope: &str) {
        let mut entries = self.lock();
        let mut n = 0;
        for (_, entry) in entries.iter_mut().filter(|(k, _)| k.scope() == scope) {
            entry.invalidate(self.next_generation());
            n += 1;
        }
        tracing::debug!(scope, entries = n, "invalidated");
    }

    pub fn invalidate_key(&self, key: &QueryKey) {
        if let Some(entry) = self.lock().get_mut(key) {
            entry.invalidate(self.next_generation());
        }
    }

    fn next_generation(&self) -> u64 {
        self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Drop `key`; a fetch still running for it is discarded on completion.
    pub fn remove_key(&self, key: &QueryKey) {
        self.lock().remove(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.lock().get(key).map(|e| e.in_flight.is_some()).unwrap_or(false)
    }

    pub fn snapshot<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<QuerySnapshot<T>> {
        let entries = self.lock();
        let entry = entries.get(key)?;
        let data = entry.data.clone().and_then(|v| match serde_json::from_value(v) {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cached data does not match requested type");
                None
            }
        });
        Some(QuerySnapshot {
            data,
            error: entry.error.clone(),
            is_stale: entry.invalidated || entry.is_time_stale(Instant::now()),
            is_fetching: entry.in_flight.is_some(),
            updated_at: entry.updated_at,
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        // Poisoning only follows a panic while holding the guard; the map is
        // still structurally valid.
        self.inner.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn fetch_with_retry(fetcher: &Fetcher, retries: u32, delay: Duration, key: &QueryKey) -> Result<Value, ApiError> {
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < retries => {
                attempt += 1;
                tracing::debug!(key = %key, attempt, error = %e, "fetch failed, retrying");
                tokio::time::sleep(delay * attempt).await;
            }
            Err(e) => return Err(e),
        }
    }
}
