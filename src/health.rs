//! Liveness HTTP endpoint.
//!
//! Hosting platforms and uptime monitors probe the service over HTTP while
//! the real work happens on long-polled bot updates. Both `/` and `/health`
//! answer, since probes are configured with either.

use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

pub fn router() -> Router {
    Router::new()
        .route("/", get(status))
        .route("/health", get(status))
        .layer(TraceLayer::new_for_http())
}

async fn status() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "running" }))
}

/// Binds the liveness server and serves it until the process exits.
pub async fn serve(port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(port, "health server listening");
    axum::serve(listener, router()).await
}
