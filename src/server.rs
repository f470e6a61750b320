//! HTTP server wiring the filter pipeline in front of the application

use axum::{
    http::{Method, Uri},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::filter::Pipeline;
use crate::middleware::filter_middleware;

/// Create HTTP server router
///
/// `/health` bypasses the filters; every other request goes through `pipeline` first.
pub fn build_router(pipeline: Arc<Pipeline>) -> Router {
    let guarded = Router::new()
        .fallback(echo_handler)
        .layer(axum::middleware::from_fn_with_state(pipeline, filter_middleware));

    Router::new()
        .route("/health", get(health_handler))
        .merge(guarded)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Liveness probe
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "service": "security-checker",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "alive"
    }))
}

/// Reports the request as it looks after filtering
async fn echo_handler(method: Method, uri: Uri) -> Json<serde_json::Value> {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    Json(json!({
        "method": method.as_str(),
        "path": path,
    }))
}

/// Start HTTP server
pub async fn start_server<F>(
    addr: &str,
    pipeline: Arc<Pipeline>,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = build_router(pipeline);

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
