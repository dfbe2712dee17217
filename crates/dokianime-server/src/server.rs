//! HTTP server startup.

use std::sync::Arc;

use crate::api::create_router;
use crate::config::ServerConfig;
use crate::state::AppState;

/// Validate the configuration, bind the listener and serve until Ctrl-C.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.addr()?;
    let state = Arc::new(AppState::new(config)?);

    if !state.config.documents_dir.is_dir() {
        tracing::warn!(
            "Documents directory {} does not exist; every page will fail",
            state.config.documents_dir.display()
        );
    }
    if !state.config.public_dir.is_dir() {
        tracing::warn!(
            "Public directory {} does not exist; static assets will 404",
            state.config.public_dir.display()
        );
    }

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("DokiAnime server is running on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
