use std::sync::Arc;

use blog_api::api::{self, AppState};
use blog_api::config::{AppConfig, StorageKind};
use blog_api::infrastructure::database;
use blog_api::infrastructure::repositories::InMemoryStore;
use blog_api::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Refusing to start");
        e
    })?;

    let state = match config.storage {
        StorageKind::Postgres => {
            let pool = database::connect(&config.database).await?;
            database::migrate(&pool).await?;
            AppState::postgres(pool, config.auth.clone())
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            AppState::in_memory(Arc::new(InMemoryStore::seeded()), config.auth.clone())
        }
    };

    let app = api::router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
