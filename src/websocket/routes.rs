use axum::extract::State;
use axum::routing::get;
use axum::Json;
use std::sync::Arc;

use crate::metrics::MetricsSnapshot;
use crate::server::RelayServer;

use super::handler::websocket_handler;

/// Create the Axum router with WebSocket support
pub fn create_router(cors_origins: &str) -> axum::Router<Arc<RelayServer>> {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let cors = if cors_origins == "*" {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("No valid CORS origins configured, using permissive CORS");
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    axum::Router::new()
        .route("/ws", get(websocket_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint. The relay holds no external resources, so a
/// responding process is a healthy process.
async fn health_check() -> &'static str {
    "OK"
}

/// JSON snapshot of server counters
pub async fn metrics_handler(State(server): State<Arc<RelayServer>>) -> Json<MetricsSnapshot> {
    Json(server.metrics().snapshot())
}
