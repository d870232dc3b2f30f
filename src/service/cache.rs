use super::{OpMessages, Resource, ResourceService, Updatable};
use crate::config::QueryConfig;
use crate::endpoints::{redis_flush, redis_stats, ResourceKind};
use crate::error::ApiError;
use crate::model::{CacheEntry, CacheEntryForm, CacheFilters, CacheStats};
use serde_json::Value;
use std::time::Duration;

/// Entries of the key-value store. The key doubles as the id.
pub struct CacheResource;

/// Key-value entries churn faster than the other stores.
const CACHE_STALE_TIME: Duration = Duration::from_secs(10);

impl Resource for CacheResource {
    type Item = CacheEntry;
    type Create = CacheEntryForm;
    type Filters = CacheFilters;

    const KIND: ResourceKind = ResourceKind::CacheEntries;
    const SCOPE: &'static str = "cache-entries";

    fn stale_time(config: &QueryConfig) -> Duration {
        config.list_stale_time().min(CACHE_STALE_TIME)
    }

    fn id_of(item: &CacheEntry) -> &str {
        &item.key
    }

    fn label_of(item: &CacheEntry) -> &str {
        &item.key
    }

    const CREATED: OpMessages = OpMessages {
        success: "Chave criada com sucesso!",
        failure_title: "Erro ao criar chave",
    };
    const DELETED: OpMessages = OpMessages {
        success: "Chave excluída com sucesso!",
        failure_title: "Erro ao excluir chave",
    };

    fn created(label: &str) -> String {
        format!("Chave criada: {}", label)
    }

    fn deleted(id: &str) -> String {
        format!("Chave excluída: {}", id)
    }
}

impl Updatable for CacheResource {
    type Update = CacheEntryForm;

    const UPDATED: OpMessages = OpMessages {
        success: "Chave atualizada com sucesso!",
        failure_title: "Erro ao atualizar chave",
    };

    fn updated(label: &str) -> String {
        format!("Chave atualizada: {}", label)
    }
}

impl ResourceService<CacheResource> {
    pub async fn stats(&self) -> Result<CacheStats, ApiError> {
        self.http.get(&redis_stats(), &[]).await
    }

    /// Drops every key in the store.
    pub async fn flush(&self) -> Result<(), ApiError> {
        let _: Value = self.http.post::<(), _>(&redis_flush(), None).await?;
        Ok(())
    }
}
