//! Minimal HTTP endpoint so a hosting platform can probe the process.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tracing::info;

#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Serve the health router on `0.0.0.0:port` until the task is dropped.
///
/// # Errors
///
/// Returns an error if the port cannot be bound.
pub async fn serve(port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Health check server started on port {}", port);
    axum::serve(listener, router()).await
}
