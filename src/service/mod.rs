//! Typed resource services: one generic CRUD service over the HTTP client,
//! specialized per resource through [`Resource`].

mod cache;
mod documentos;
mod graph;
mod health;
mod usuarios;

pub use cache::CacheResource;
pub use documentos::DocumentoResource;
pub use graph::{GraphService, NodeResource, RelationshipResource};
pub use health::HealthService;
pub use usuarios::UsuarioResource;

use crate::config::QueryConfig;
use crate::endpoints::ResourceKind;
use crate::error::ApiError;
use crate::http::{HttpClient, QueryPairs};
use crate::model::QueryFilters;
use crate::query::QueryKey;
use crate::response::{Page, PageParams, RawPage};
use crate::validation::Validate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::time::Duration;

/// User-facing texts of one mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpMessages {
    pub success: &'static str,
    /// Title of the error toast; the body is the backend message.
    pub failure_title: &'static str,
}

/// A resource family with list/get/create/delete endpoints.
pub trait Resource: Send + Sync + 'static {
    type Item: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;
    type Create: Serialize + Validate + Send + Sync;
    type Filters: QueryFilters;

    const KIND: ResourceKind;
    /// Cache invalidation scope. Resources of one store may share it.
    const SCOPE: &'static str;

    fn stale_time(config: &QueryConfig) -> Duration {
        config.list_stale_time()
    }

    fn id_of(item: &Self::Item) -> &str;

    /// Human name used in activity descriptions.
    fn label_of(item: &Self::Item) -> &str;

    const CREATED: OpMessages;
    const DELETED: OpMessages;

    /// Activity description of a create, given the new item's label.
    fn created(label: &str) -> String;

    fn deleted(id: &str) -> String;
}

/// Resources whose registry has an update endpoint.
pub trait Updatable: Resource {
    type Update: Serialize + Validate + Send + Sync;

    const UPDATED: OpMessages;

    fn updated(label: &str) -> String;
}

/// Cache key of one list page. Filters are part of the key.
pub fn list_key<R: Resource>(params: PageParams, filters: &R::Filters) -> QueryKey {
    QueryKey::list(R::SCOPE, R::KIND.name(), params, &filters.to_query())
}

/// Cache key of one record; lives in the resource scope so scope
/// invalidation reaches it.
pub fn item_key<R: Resource>(id: &str) -> QueryKey {
    QueryKey::item(R::SCOPE, R::KIND.name(), id)
}

/// List endpoint query: pagination first, then non-empty filters.
pub(crate) fn list_query<F: QueryFilters>(params: PageParams, filters: &F) -> QueryPairs {
    let mut query = vec![
        ("page".to_string(), params.page.to_string()),
        ("limit".to_string(), params.limit.to_string()),
    ];
    query.extend(filters.to_query());
    query
}

/// No retries here; that belongs to the query cache.
pub struct ResourceService<R> {
    http: HttpClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        ResourceService {
            http: self.http.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(http: HttpClient) -> Self {
        ResourceService {
            http,
            _resource: PhantomData,
        }
    }

    pub async fn list(&self, params: PageParams, filters: &R::Filters) -> Result<Page<R::Item>, ApiError> {
        let raw: RawPage<R::Item> = self
            .http
            .get(&R::KIND.collection(), &list_query(params, filters))
            .await?;
        Ok(raw.into_page(params))
    }

    pub async fn get(&self, id: &str) -> Result<R::Item, ApiError> {
        self.http.get(&R::KIND.item(id), &[]).await
    }

    pub async fn create(&self, form: &R::Create) -> Result<R::Item, ApiError> {
        self.http.post(&R::KIND.collection(), Some(form)).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.http.delete(&R::KIND.item(id)).await
    }
}

impl<R: Updatable> ResourceService<R> {
    pub async fn update(&self, id: &str, form: &R::Update) -> Result<R::Item, ApiError> {
        self.http.put(&R::KIND.item(id), form).await
    }
}
