use crate::server::SignalingServer;
use axum::routing::get;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handler::websocket_handler;
use super::metrics::{ice_servers_handler, metrics_handler};

/// Create the Axum router: signaling socket, operational endpoints and the
/// client bundle for every other path.
pub fn create_router(
    cors_origins: &str,
    static_dir: Option<&str>,
) -> axum::Router<Arc<SignalingServer>> {
    let router = axum::Router::new()
        .route("/ws", get(websocket_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/ice-servers", get(ice_servers_handler));

    let router = match static_dir {
        Some(dir) => {
            tracing::debug!(static_dir = %dir, "Serving client bundle");
            router.fallback_service(ServeDir::new(dir))
        }
        None => router,
    };

    router
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(cors_origins: &str) -> CorsLayer {
    if cors_origins.trim() == "*" {
        return CorsLayer::permissive();
    }

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
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
