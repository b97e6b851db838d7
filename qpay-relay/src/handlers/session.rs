use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};

use crate::{
    dtos::{SessionRequest, SessionResponse},
    error::RelayError,
    services::metrics::record_session,
    AppState,
};

/// Create a QPay payment session for an order.
///
/// Accepts JSON or form-encoded bodies. Validation failures are answered
/// before QPay is contacted.
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SessionResponse>, RelayError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let payload = SessionRequest::parse(content_type, &body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected malformed session request");
        RelayError::MalformedBody(e.to_string())
    })?;

    let session = payload.validate().map_err(|missing| {
        tracing::warn!(missing = ?missing, "Session request missing required fields");
        record_session("invalid");
        RelayError::Validation { missing }
    })?;

    tracing::info!(
        order_number = %session.order_number,
        amount = %session.amount,
        currency = %session.currency,
        "Creating QPay session"
    );

    let result = state.qpay.create_session(&session).await.map_err(|e| {
        record_session("failed");
        RelayError::from_session_failure(e)
    })?;

    record_session("created");

    Ok(Json(SessionResponse::from(result)))
}
