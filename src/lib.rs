//! Multistore SDK: typed client for the multi-store dashboard backend.
//!
//! One [`DashboardClient`] owns the HTTP client, the query cache, the toast
//! queue and the persisted client stores; resource handles borrow them.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod export;
pub mod http;
pub mod list;
pub mod model;
pub mod mutation;
pub mod notify;
pub mod pagination;
pub mod query;
pub mod response;
pub mod service;
pub mod store;
pub mod validation;

pub use client::{DashboardClient, GraphClient, ResourceClient};
pub use config::{ClientConfig, QueryConfig};
pub use error::{ApiError, AppError, ConfigError, ValidationErrors};
pub use list::ListController;
pub use mutation::{MutationGuard, MutationOp};
pub use notify::{Notification, NotificationCenter, NotificationKind};
pub use pagination::Pagination;
pub use query::{QueryCache, QueryKey, QuerySnapshot};
pub use response::{Page, PageParams};
pub use service::{Resource, ResourceService, Updatable};

/// Install a `tracing` subscriber filtered by `RUST_LOG`, defaulting to
/// `multistore_sdk=info`. For binaries; call once.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("multistore_sdk=info"));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
