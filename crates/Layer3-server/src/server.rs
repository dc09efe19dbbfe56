//! HTTP server wiring

use crate::handlers;
use axum::{routing::get, Router};
use relay_foundation::Result;
use relay_task::SubmissionGateway;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Shared application state
pub struct AppState {
    pub gateway: SubmissionGateway,
}

/// Build the task router over shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/task/{device_token}", get(handlers::trigger_task))
        .route("/task/status/{task_id}", get(handlers::task_status))
        .layer(cors)
        .with_state(state)
}

/// Serve until a shutdown signal arrives
pub async fn serve(config: ServerConfig, state: Arc<AppState>) -> Result<()> {
    let app = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = TcpListener::bind(addr).await?;
    info!("Relay listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
