mod dto;
mod error;
mod handlers;
mod router;
mod services;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use voxgate_config::Settings;
use voxgate_store::MySqlAssistantRepository;
use voxgate_voice::ElevenLabsBroker;

use crate::state::ServerState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let settings = Settings::from_env().context("failed to load settings")?;
    let addr = settings.bind_addr()?;

    let repository = MySqlAssistantRepository::connect_lazy(&settings.database);
    info!("Database: {}", settings.database_summary());
    spawn_database_check(repository.clone());

    if settings.voice.api_key.is_none() {
        warn!("XI_API_KEY not configured: signed-url requests will fail");
    }
    let broker = ElevenLabsBroker::new(&settings.voice);

    let state = Arc::new(ServerState::new(
        Arc::new(repository.clone()),
        Arc::new(broker),
    ));

    info!("Serving frontend from {}", settings.server.static_dir.display());
    let app = router::app(state, &settings.server.static_dir);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repository.close().await;
    info!("Database pool closed, server stopped");

    Ok(())
}

/// Checks connectivity once in the background so startup never waits on
/// MySQL.
fn spawn_database_check(repository: MySqlAssistantRepository) {
    tokio::spawn(async move {
        match repository.health_check().await {
            Ok(()) => info!("Database reachable"),
            Err(e) => warn!("Database not reachable yet: {}", e),
        }
    });
}

/// Waits for CTRL+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received CTRL+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
