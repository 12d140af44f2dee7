//! Route handlers.
//!
//! Two handlers answer from local state; two forward a single GET to the
//! upstream and relay the outcome.

use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::http::request::request_id;
use crate::http::response::{
    BackendHealth, DataEnvelope, DataFailure, HealthStatus, NotFound, ServiceInfo,
};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::{DATA_PATH, HEALTH_PATH};

/// `GET /health`: liveness of this proxy, independent of the upstream.
pub async fn health() -> Response {
    let start = Instant::now();
    metrics::record_request("/health", StatusCode::OK.as_u16(), start);
    (StatusCode::OK, Json(HealthStatus::now())).into_response()
}

/// `GET /`: service descriptor.
pub async fn info(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let body = ServiceInfo::new(state.config.upstream.base_url.clone());
    metrics::record_request("/", StatusCode::OK.as_u16(), start);
    (StatusCode::OK, Json(body)).into_response()
}

/// `GET /api/data`: relay upstream data inside an envelope.
pub async fn data(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let response = match state.upstream.get_json(DATA_PATH, request_id).await {
        Ok(backend_data) => {
            (StatusCode::OK, Json(DataEnvelope::new(backend_data))).into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = request_id.unwrap_or("unknown"),
                upstream_url = e.url(),
                error = %e,
                "Failed to fetch data from backend"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DataFailure::new(e.to_string())),
            )
                .into_response()
        }
    };

    metrics::record_request("/api/data", response.status().as_u16(), start);
    response
}

/// `GET /api/backend-health`: report upstream health alongside our own.
pub async fn backend_health(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let (status, body) = match state.upstream.get_json(HEALTH_PATH, request_id).await {
        Ok(backend) => (StatusCode::OK, BackendHealth::reachable(backend)),
        Err(e) => {
            tracing::warn!(
                request_id = request_id.unwrap_or("unknown"),
                upstream_url = e.url(),
                error = %e,
                "Backend unreachable"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                BackendHealth::unreachable(e.to_string()),
            )
        }
    };

    metrics::record_request("/api/backend-health", status.as_u16(), start);
    (status, Json(body)).into_response()
}

/// Fallback for anything not routed above.
pub async fn not_found(uri: Uri) -> Response {
    let start = Instant::now();
    tracing::debug!(path = %uri.path(), "No route matched");
    metrics::record_request("unmatched", StatusCode::NOT_FOUND.as_u16(), start);
    (StatusCode::NOT_FOUND, Json(NotFound::new(uri.path()))).into_response()
}
