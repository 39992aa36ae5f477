//! HTTP transport.
//!
//! # Endpoints
//!
//! - `POST /api/products`: body `{ "filter": { sort, color, size, price } }`,
//!   responds with the ranked matches as a JSON array
//! - `GET /health`: liveness probe
//!
//! Errors are returned as `{ "error": <kind>, "message": <text> }`:
//! `422` for invalid filter input (including bodies that are not JSON),
//! `502` when the index fails.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use shelf_core::SearchError;
use tower_http::trace::TraceLayer;

use crate::service::SearchService;

/// Build the router around a shared service.
pub fn router(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/api/products", post(handle_products))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the API on `listener` until ctrl-c.
pub async fn serve(listener: tokio::net::TcpListener, service: Arc<SearchService>) -> anyhow::Result<()> {
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;
    Ok(())
}

/// Resolve when `signal` fires. If the handler could not be installed the
/// server keeps running until killed.
async fn shutdown_on<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "failed to install shutdown signal handler");
            std::future::pending::<()>().await;
        }
    }
}

/// Error payload body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

struct ApiError(SearchError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SearchError::InvalidFilterInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SearchError::UpstreamQueryFailure { .. } => {
                tracing::error!(error = %self.0, "index query failed");
                StatusCode::BAD_GATEWAY
            }
        };
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handle POST /api/products
async fn handle_products(State(service): State<Arc<SearchService>>, body: Bytes) -> Response {
    let body: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return ApiError(SearchError::InvalidFilterInput(format!("body: {e}"))).into_response()
        }
    };

    match service.search_body(&body).await {
        Ok(hits) => (StatusCode::OK, Json(hits)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Handle GET /health
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
