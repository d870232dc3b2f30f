//! Facade owning the HTTP client, query cache, toast queue and persisted
//! stores, and handing out per-resource handles that share them.

use crate::config::{validate, ClientConfig};
use crate::error::{ApiError, AppError};
use crate::http::HttpClient;
use crate::list::ListController;
use crate::model::{CacheStats, CypherQuery, CypherResult, Documento, GraphData};
use crate::mutation::{MutationEffects, MutationGuard};
use crate::notify::NotificationCenter;
use crate::query::{QueryCache, QueryKey, QuerySnapshot};
use crate::response::{Page, PageParams};
use crate::service::{
    item_key, list_key, CacheResource, DocumentoResource, GraphService, HealthService, NodeResource,
    RelationshipResource, Resource, ResourceService, Updatable, UsuarioResource,
};
use crate::store::{AppStore, FileStorage, MemoryStorage, Storage, ThemeStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardClient {
    config: ClientConfig,
    http: HttpClient,
    cache: QueryCache,
    notifications: NotificationCenter,
    app: AppStore,
    theme: ThemeStore,
}

impl DashboardClient {
    /// Persisted state lives under `config.state_dir` when set, in memory
    /// otherwise.
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let storage: Arc<dyn Storage> = match &config.state_dir {
            Some(dir) => Arc::new(FileStorage::new(dir)),
            None => Arc::new(MemoryStorage::new()),
        };
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: ClientConfig, storage: Arc<dyn Storage>) -> Result<Self, AppError> {
        validate(&config)?;
        let http = HttpClient::new(&config)?;
        tracing::info!(base_url = %http.base_url(), "dashboard client ready");
        Ok(DashboardClient {
            cache: QueryCache::new(config.query.clone()),
            notifications: NotificationCenter::new(),
            app: AppStore::load(storage.clone()),
            theme: ThemeStore::load(storage),
            http,
            config,
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn app(&self) -> &AppStore {
        &self.app
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    /// Each handle carries its own submit guard.
    pub fn usuarios(&self) -> ResourceClient<UsuarioResource> {
        self.resource()
    }

    pub fn documentos(&self) -> ResourceClient<DocumentoResource> {
        self.resource()
    }

    pub fn cache_entries(&self) -> ResourceClient<CacheResource> {
        self.resource()
    }

    pub fn nodes(&self) -> ResourceClient<NodeResource> {
        self.resource()
    }

    pub fn relationships(&self) -> ResourceClient<RelationshipResource> {
        self.resource()
    }

    pub fn graph(&self) -> GraphClient {
        GraphClient {
            service: GraphService::new(self.http.clone()),
            cache: self.cache.clone(),
            effects: self.effects(),
            guard: MutationGuard::new(),
        }
    }

    pub fn health(&self) -> HealthService {
        HealthService::new(self.http.clone())
    }

    fn resource<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient {
            service: ResourceService::new(self.http.clone()),
            cache: self.cache.clone(),
            effects: self.effects(),
            guard: MutationGuard::new(),
        }
    }

    fn effects(&self) -> MutationEffects {
        MutationEffects::new(self.cache.clone(), self.notifications.clone(), self.app.clone())
    }
}

/// Cached reads and side-effecting writes for one resource family.
pub struct ResourceClient<R> {
    service: ResourceService<R>,
    cache: QueryCache,
    effects: MutationEffects,
    guard: MutationGuard,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        ResourceClient {
            service: self.service.clone(),
            cache: self.cache.clone(),
            effects: self.effects.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<R: Resource> ResourceClient<R> {
    /// Uncached access to the endpoints.
    pub fn service(&self) -> &ResourceService<R> {
        &self.service
    }

    pub fn guard(&self) -> &MutationGuard {
        &self.guard
    }

    pub fn list_controller(&self, page_size: u32) -> ListController<R> {
        ListController::new(self.clone(), page_size)
    }

    pub async fn list(&self, params: PageParams, filters: &R::Filters) -> Result<Page<R::Item>, ApiError> {
        let service = self.service.clone();
        let filters_owned = filters.clone();
        self.cache
            .query(list_key::<R>(params, filters), R::stale_time(self.cache.config()), move || {
                let service = service.clone();
                let filters = filters_owned.clone();
                async move { service.list(params, &filters).await }
            })
            .await
    }

    pub async fn get(&self, id: &str) -> Result<R::Item, ApiError> {
        let service = self.service.clone();
        let id_owned = id.to_string();
        self.cache
            .query(item_key::<R>(id), self.cache.config().item_stale_time(), move || {
                let service = service.clone();
                let id = id_owned.clone();
                async move { service.get(&id).await }
            })
            .await
    }

    /// Cached state of a list page without fetching.
    pub fn list_snapshot(&self, params: PageParams, filters: &R::Filters) -> Option<QuerySnapshot<Page<R::Item>>> {
        self.cache.snapshot(&list_key::<R>(params, filters))
    }

    pub async fn create(&self, form: &R::Create) -> Result<R::Item, AppError> {
        self.effects.create(&self.service, &self.guard, form).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.effects.delete(&self.service, &self.guard, id).await
    }

    /// Cached parameterless read in this resource's scope.
    async fn named<T, Fut>(&self, name: &str, fetch: impl Fn(ResourceService<R>) -> Fut + Send + Sync + 'static) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let service = self.service.clone();
        let key = QueryKey::named(R::SCOPE, R::KIND.name(), name);
        self.cache
            .query(key, R::stale_time(self.cache.config()), move || fetch(service.clone()))
            .await
    }
}

impl<R: Updatable> ResourceClient<R> {
    pub async fn update(&self, id: &str, form: &R::Update) -> Result<R::Item, AppError> {
        self.effects.update(&self.service, &self.guard, id, form).await
    }
}

impl ResourceClient<UsuarioResource> {
    pub async fn email_exists(&self, email: &str, exclude_id: Option<&str>) -> bool {
        self.service.email_exists(email, exclude_id).await
    }
}

impl ResourceClient<DocumentoResource> {
    pub async fn search(&self, text: &str) -> Result<Vec<Documento>, ApiError> {
        let text_owned = text.to_string();
        self.named(&format!("search?q={}", text), move |service| {
            let text = text_owned.clone();
            async move { service.search(&text).await }
        })
        .await
    }

    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.named("categories", |service| async move { service.categories().await }).await
    }

    pub async fn tags(&self) -> Result<Vec<String>, ApiError> {
        self.named("tags", |service| async move { service.tags().await }).await
    }

    pub async fn stats(&self) -> Result<serde_json::Value, ApiError> {
        self.named("stats", |service| async move { service.stats().await }).await
    }
}

impl ResourceClient<CacheResource> {
    pub async fn stats(&self) -> Result<CacheStats, ApiError> {
        self.named("stats", |service| async move { service.stats().await }).await
    }

    pub async fn flush(&self) -> Result<(), AppError> {
        self.effects.flush_cache(&self.service, &self.guard).await
    }
}

/// Whole-graph view and Cypher console.
#[derive(Clone)]
pub struct GraphClient {
    service: GraphService,
    cache: QueryCache,
    effects: MutationEffects,
    guard: MutationGuard,
}

impl GraphClient {
    /// Shares the scope node and relationship mutations invalidate.
    pub async fn graph(&self) -> Result<GraphData, ApiError> {
        let service = self.service.clone();
        let key = QueryKey::named(GraphService::SCOPE, "graph", "all");
        self.cache
            .query(key, self.cache.config().list_stale_time(), move || {
                let service = service.clone();
                async move { service.graph().await }
            })
            .await
    }

    pub async fn query(&self, cypher: &CypherQuery) -> Result<CypherResult, AppError> {
        self.effects.run_cypher(&self.service, &self.guard, cypher).await
    }

    pub fn guard(&self) -> &MutationGuard {
        &self.guard
    }
}
