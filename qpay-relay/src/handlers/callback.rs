//! QPay return/callback handler.
//!
//! The caller is QPay itself, and QPay redelivers anything that is not a
//! 200. The reply therefore only acknowledges receipt: a declined payment
//! or an unverified signature is still answered with `OK`.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
};

use crate::{
    models::CallbackPayload,
    services::{metrics::record_callback, verifier::verify_callback, Verification},
    AppState,
};

pub const ACK_BODY: &str = "OK";
pub const ERROR_BODY: &str = "ERROR";

pub async fn handle_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let payload = match CallbackPayload::parse(content_type, &body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(error = %e, "Error processing QPay callback");
            return (StatusCode::INTERNAL_SERVER_ERROR, ERROR_BODY);
        }
    };

    tracing::info!(fields = ?payload.fields, "Received callback from QPay");

    let verification = verify_callback(state.verifier.as_deref(), &payload).await;
    if verification == Verification::Rejected {
        tracing::warn!(
            order_number = payload.order_number.as_deref().unwrap_or("-"),
            "QPay callback signature did not verify"
        );
    }

    let order_number = payload.order_number.as_deref().unwrap_or("-");
    let outcome = if payload.is_successful() {
        tracing::info!(
            order_number = %order_number,
            transaction_id = payload.transaction_id.as_deref().unwrap_or("-"),
            verification = verification.as_str(),
            "Payment successful"
        );
        "success"
    } else {
        tracing::info!(
            order_number = %order_number,
            response_code = payload.response_code.as_deref().unwrap_or("-"),
            reason = payload.response_msg.as_deref().unwrap_or("-"),
            verification = verification.as_str(),
            "Payment failed"
        );
        "failure"
    };

    record_callback(outcome, verification.as_str());

    (StatusCode::OK, ACK_BODY)
}
