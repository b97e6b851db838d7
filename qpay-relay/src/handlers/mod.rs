//! HTTP handlers for qpay-relay.

pub mod callback;
pub mod session;
pub mod status;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use service_core::observability::render_metrics;

use crate::dtos::{iso_timestamp, HealthResponse};
use crate::AppState;

/// Liveness probe. Never touches QPay.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: iso_timestamp(Utc::now()),
        environment: state.settings.common.environment.clone(),
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        render_metrics(),
    )
}
