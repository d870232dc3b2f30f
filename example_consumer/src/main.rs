//! Example consumer: walks the list/create/delete cycle against a running
//! dashboard backend.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Backend url comes from `API_BASE_URL` (default `http://localhost:8080/api`).

use multistore_sdk::export::write_csv;
use multistore_sdk::model::{CreateUsuario, UsuarioFilters};
use multistore_sdk::{init_tracing, DashboardClient, PageParams};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let client = DashboardClient::from_env()?;
    match client.health().databases().await {
        Ok(dbs) => {
            for db in dbs {
                tracing::info!(
                    "{}: {} ({} ms)",
                    db.database.display_name(),
                    if db.connected { "conectado" } else { "desconectado" },
                    db.response_time
                );
            }
        }
        Err(e) => tracing::warn!("health check failed: {}", e),
    }

    let usuarios = client.usuarios();
    let mut list = usuarios.list_controller(client.app().preferences().default_page_size);
    let page = list.load().await?;
    tracing::info!("{} usuarios, page {}/{}", page.total, page.page, page.total_pages);

    let ana = usuarios.create(&CreateUsuario::new("Ana", "ana.demo@example.com", 30)).await?;
    let search = UsuarioFilters {
        search: Some("Ana".into()),
        ..Default::default()
    };
    let found = usuarios.list(PageParams::default(), &search).await?;
    tracing::info!("search 'Ana' -> {} result(s)", found.total);

    if let Some(path) = write_csv(&found.items, Path::new("exports"), "usuarios").await? {
        tracing::info!("exported to {}", path.display());
    }

    usuarios.delete(&ana.id).await?;

    for toast in client.notifications().notifications() {
        tracing::info!("[{:?}] {}", toast.kind, toast.message);
    }
    for activity in client.app().activities() {
        tracing::info!("{} {:?}: {}", activity.timestamp, activity.kind, activity.description);
    }
    Ok(())
}
