//! Mutations and their side effects.
//!
//! Order for every mutation: client-side validation, double-submit guard,
//! request. On success the resource scope is invalidated, one success toast
//! is queued and one activity is logged. On failure exactly one error toast
//! is queued and the error is returned. Validation failures raise no toast;
//! they belong next to the offending fields.

use crate::endpoints::Database;
use crate::error::{ApiError, AppError, ValidationErrors};
use crate::model::{CypherQuery, CypherResult};
use crate::notify::NotificationCenter;
use crate::query::QueryCache;
use crate::service::{item_key, CacheResource, GraphService, OpMessages, Resource, ResourceService, Updatable};
use crate::store::{ActivityKind, AppStore, NewActivity};
use crate::validation::Validate;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutationOp {
    Create,
    Update,
    Delete,
}

impl MutationOp {
    pub fn activity_kind(self) -> ActivityKind {
        match self {
            MutationOp::Create => ActivityKind::Create,
            MutationOp::Update => ActivityKind::Update,
            MutationOp::Delete => ActivityKind::Delete,
        }
    }
}

/// Pending flag of one form. While a submit is in flight a second one is
/// rejected without reaching the network.
#[derive(Clone, Debug, Default)]
pub struct MutationGuard {
    pending: Arc<AtomicBool>,
}

impl MutationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<Pending, AppError> {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Pending(self.pending.clone()))
            .map_err(|_| AppError::MutationPending)
    }
}

/// Clears the pending flag when the mutation settles or is dropped.
struct Pending(Arc<AtomicBool>);

impl Drop for Pending {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

const FLUSH_MESSAGES: OpMessages = OpMessages {
    success: "Cache limpo com sucesso!",
    failure_title: "Erro ao limpar cache",
};

const CYPHER_MESSAGES: OpMessages = OpMessages {
    success: "Consulta executada com sucesso!",
    failure_title: "Erro ao executar consulta",
};

/// Cache, toast queue and activity log a mutation reports to.
#[derive(Clone)]
pub struct MutationEffects {
    cache: QueryCache,
    notifications: NotificationCenter,
    app: AppStore,
}

impl MutationEffects {
    pub fn new(cache: QueryCache, notifications: NotificationCenter, app: AppStore) -> Self {
        MutationEffects {
            cache,
            notifications,
            app,
        }
    }

    pub async fn create<R: Resource>(
        &self,
        service: &ResourceService<R>,
        guard: &MutationGuard,
        form: &R::Create,
    ) -> Result<R::Item, AppError> {
        let item = self
            .execute(guard, form.validate(), R::CREATED, service.create(form))
            .await?;
        self.applied::<R>(MutationOp::Create, R::id_of(&item), R::CREATED, R::created(R::label_of(&item)));
        Ok(item)
    }

    pub async fn update<R: Updatable>(
        &self,
        service: &ResourceService<R>,
        guard: &MutationGuard,
        id: &str,
        form: &R::Update,
    ) -> Result<R::Item, AppError> {
        let item = self
            .execute(guard, form.validate(), R::UPDATED, service.update(id, form))
            .await?;
        self.applied::<R>(MutationOp::Update, id, R::UPDATED, R::updated(R::label_of(&item)));
        Ok(item)
    }

    pub async fn delete<R: Resource>(
        &self,
        service: &ResourceService<R>,
        guard: &MutationGuard,
        id: &str,
    ) -> Result<(), AppError> {
        self.execute(guard, Ok(()), R::DELETED, service.delete(id)).await?;
        self.applied::<R>(MutationOp::Delete, id, R::DELETED, R::deleted(id));
        Ok(())
    }

    /// Empties the key-value store.
    pub async fn flush_cache(&self, service: &ResourceService<CacheResource>, guard: &MutationGuard) -> Result<(), AppError> {
        self.execute(guard, Ok(()), FLUSH_MESSAGES, service.flush()).await?;
        self.cache.invalidate_scope(CacheResource::SCOPE);
        self.notifications.success(FLUSH_MESSAGES.success);
        self.app.add_activity(NewActivity::new(
            ActivityKind::Delete,
            Database::Redis,
            "Todas as chaves excluídas",
        ));
        Ok(())
    }

    /// Raw Cypher may write, so the graph scope is invalidated afterwards.
    pub async fn run_cypher(
        &self,
        service: &GraphService,
        guard: &MutationGuard,
        cypher: &CypherQuery,
    ) -> Result<CypherResult, AppError> {
        let result = self
            .execute(guard, cypher.validate(), CYPHER_MESSAGES, service.query(cypher))
            .await?;
        self.cache.invalidate_scope(GraphService::SCOPE);
        self.notifications.success(CYPHER_MESSAGES.success);
        self.app.add_activity(NewActivity::new(
            ActivityKind::Query,
            Database::Neo4j,
            format!("Consulta executada: {}", summarize(&cypher.query)),
        ));
        Ok(result)
    }

    async fn execute<T, Fut>(
        &self,
        guard: &MutationGuard,
        validation: Result<(), ValidationErrors>,
        messages: OpMessages,
        request: Fut,
    ) -> Result<T, AppError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        validation?;
        let _pending = guard.acquire()?;
        request.await.map_err(|e| {
            tracing::warn!(title = messages.failure_title, status = e.status_code, error = %e.error, "mutation failed");
            self.notifications.error(e.message.clone(), Some(messages.failure_title));
            AppError::Api(e)
        })
    }

    fn applied<R: Resource>(&self, op: MutationOp, id: &str, messages: OpMessages, description: String) {
        if op == MutationOp::Delete {
            self.cache.remove_key(&item_key::<R>(id));
        }
        self.cache.invalidate_scope(R::SCOPE);
        self.notifications.success(messages.success);
        self.app.add_activity(NewActivity::new(
            op.activity_kind(),
            R::KIND.database(),
            description,
        ));
        tracing::info!(resource = R::KIND.name(), op = ?op, id, "mutation applied");
    }
}

/// First line of a query, shortened for the activity log.
fn summarize(query: &str) -> String {
    const MAX: usize = 60;
    let line = query.trim().lines().next().unwrap_or_default().trim();
    if line.chars().count() > MAX {
        let cut: String = line.chars().take(MAX).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfig;
    use crate::error::CONNECTION_ERROR_MESSAGE;
    use crate::notify::NotificationKind;

    fn effects() -> MutationEffects {
        MutationEffects::new(QueryCache::new(QueryConfig::default()), NotificationCenter::new(), AppStore::in_memory())
    }

    const MESSAGES: OpMessages = OpMessages {
        success: "ok",
        failure_title: "Erro ao criar usuário",
    };

    #[tokio::test]
    async fn failure_queues_one_error_toast() {
        let fx = effects();
        let guard = MutationGuard::new();
        let err = fx
            .execute::<(), _>(&guard, Ok(()), MESSAGES, async { Err(ApiError::network("refused")) })
            .await
            .unwrap_err();
        assert!(err.api().is_some_and(ApiError::is_network));
        let toasts = fx.notifications.notifications();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, NotificationKind::Error);
        assert_eq!(toasts[0].message, CONNECTION_ERROR_MESSAGE);
        assert_eq!(toasts[0].title.as_deref(), Some("Erro ao criar usuário"));
        assert!(!guard.is_pending());
    }

    #[tokio::test]
    async fn validation_failure_sends_nothing_and_stays_quiet() {
        let fx = effects();
        let sent = Arc::new(AtomicBool::new(false));
        let mut errors = ValidationErrors::new();
        errors.add("nome", "Nome deve ter no mínimo 2 caracteres");
        let request = {
            let sent = sent.clone();
            async move {
                sent.store(true, Ordering::SeqCst);
                Ok(())
            }
        };
        let err = fx
            .execute::<(), _>(&MutationGuard::new(), Err(errors), MESSAGES, request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(!sent.load(Ordering::SeqCst));
        assert!(fx.notifications.is_empty());
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_rejected() {
        let fx = effects();
        let guard = MutationGuard::new();
        let (release, wait) = tokio::sync::oneshot::channel::<()>();
        let first = {
            let fx = fx.clone();
            let guard = guard.clone();
            tokio::spawn(async move {
                fx.execute(&guard, Ok(()), MESSAGES, async move {
                    let _ = wait.await;
                    Ok(1u32)
                })
                .await
            })
        };
        while !guard.is_pending() {
            tokio::task::yield_now().await;
        }
        let second = fx.execute(&guard, Ok(()), MESSAGES, async { Ok(2u32) }).await;
        assert!(matches!(second, Err(AppError::MutationPending)));
        release.send(()).unwrap();
        assert_eq!(first.await.unwrap().unwrap(), 1);
        assert!(!guard.is_pending());
        assert!(fx.notifications.is_empty());
    }

    #[test]
    fn cypher_summary_is_short_single_line() {
        assert_eq!(summarize("  MATCH (n)\nRETURN n"), "MATCH (n)");
        let long = format!("MATCH {}", "x".repeat(100));
        assert_eq!(summarize(&long).chars().count(), 61);
    }
}
