//! Router configuration for the relay.

use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::middleware::create_cors_layer;
use super::ws::{relay_ws_handler, RelayWsState};

/// Create the relay router: `GET /ws` plus the health check.
pub fn create_router(state: Arc<RelayWsState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/ws", get(relay_ws_handler))
        .with_state(state)
        .merge(create_health_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a router serving the browser client from `static_path`.
///
/// Returns `None` when the directory does not exist.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    if !Path::new(static_path).is_dir() {
        tracing::warn!(
            "Static directory {} not found; browser client disabled",
            static_path
        );
        return None;
    }

    Some(Router::new().fallback_service(ServeDir::new(static_path)))
}
