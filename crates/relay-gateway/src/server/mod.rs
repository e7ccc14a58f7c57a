//! Relay server setup
//!
//! Thin HTTP/WebSocket wrapper around the hub: route composition, state
//! wiring, and the serve loop.

mod handler;
mod pages;
mod state;

pub use handler::{p2p_handler, relay_handler};
pub use state::AppState;

use crate::broadcast::Hub;
use crate::connection::Registry;
use axum::{routing::get, Router};
use relay_common::{AppConfig, AppError, AppResult};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the relay router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(relay_handler))
        .route("/p2p", get(p2p_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: AppState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire up the registry and hub and create `AppState`
#[must_use]
pub fn create_state(config: AppConfig) -> AppState {
    let registry = Registry::new_shared();
    let hub = Hub::new_shared(registry.clone());

    AppState::new(registry, hub, config)
}

/// Run the relay server on an already-resolved address
pub async fn run_server(app: Router, addr: SocketAddr) -> AppResult<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::server(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("relay listening on ws://{addr}/");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::server(format!("serve loop ended: {e}")))?;

    Ok(())
}

/// Run the complete relay server with configuration
pub async fn run(config: AppConfig) -> AppResult<()> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::config(format!("invalid listen address {}: {e}", config.server.address())))?;

    let state = create_state(config);
    let app = create_app(state);

    run_server(app, addr).await
}
