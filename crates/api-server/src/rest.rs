//! Shared REST state, response envelopes, and operational endpoints.

use axum::http::StatusCode;
use axum::Json;
use member_audience::AudienceStore;
use member_blast::{BlastJobStore, TemplateStore};
use member_core::config::BlastConfig;
use member_core::MemberError;
use member_registry::MemberRegistry;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<MemberRegistry>,
    pub audiences: Arc<AudienceStore>,
    pub templates: Arc<TemplateStore>,
    pub jobs: Arc<BlastJobStore>,
    pub blast: BlastConfig,
    pub node_id: String,
    pub start_time: Instant,
}

/// Standard `{ data: ... }` envelope used by report and blast responses.
#[derive(Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a core error onto an HTTP response. Store failures propagate as 500
/// untranslated; the permissive input contract means 4xx only appears for
/// workflow violations.
pub fn map_error(err: MemberError) -> ApiError {
    let (status, code) = match &err {
        MemberError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        MemberError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    (
        status,
        Json(ErrorResponse {
            error: code.to_string(),
            message: err.to_string(),
        }),
    )
}

pub fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "invalid_request".to_string(),
            message: message.to_string(),
        }),
    )
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}

/// GET /health — Health check endpoint.
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — Readiness probe.
pub async fn readiness(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> StatusCode {
    if state.start_time.elapsed().as_secs() > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — Liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
