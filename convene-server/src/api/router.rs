use crate::api::{AppState, config_handler, health_handler};
use crate::config::ServerConfig;
use crate::signaling::ws_handler;
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/api/config", get(config_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Binds `config.addr()` and serves until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let addr = config.addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    serve_on(listener, Arc::new(AppState::new(config))).await
}

pub async fn serve_on(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Signaling server listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .await
        .context("Signaling server stopped")?;
    Ok(())
}
