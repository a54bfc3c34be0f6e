//! HTTP API for the scoring service
//!
//! Serves the scoring operations under `/api`, plus health and Prometheus
//! metrics endpoints, using Axum.

pub mod error;
pub mod handlers;

pub use error::{status_for, ApiError};

use crate::service::AppState;
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_import_bytes = state.config().competition.max_import_bytes;

    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/ready", get(handlers::ready_handler))
        .route("/alive", get(handlers::alive_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/modes", get(handlers::list_modes))
        .route("/api/events", get(handlers::list_events))
        .route(
            "/api/competitors",
            get(handlers::list_competitors).post(handlers::add_competitor),
        )
        .route("/api/competitors/{id}", get(handlers::get_competitor))
        .route("/api/score", post(handlers::record_score))
        .route("/api/standings", get(handlers::standings))
        .route("/api/export.csv", get(handlers::export_csv))
        .route("/api/import", post(handlers::import_csv))
        .layer(DefaultBodyLimit::max(max_import_bytes))
        .with_state(state)
}

/// Serve the API until `shutdown` resolves
pub async fn serve<F>(state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config().bind_address()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;

    info!("HTTP API listening on http://{}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}
