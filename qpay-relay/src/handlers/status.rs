use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    dtos::StatusResponse, error::RelayError, services::metrics::record_status_query, AppState,
};

/// Relay a transaction status query for an order to QPay.
pub async fn query_status(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<StatusResponse>, RelayError> {
    tracing::info!(order_number = %order_number, "Querying QPay transaction status");

    let status = state.qpay.query_status(&order_number).await.map_err(|e| {
        tracing::error!(order_number = %order_number, error = %e, "Error querying status");
        record_status_query("failed");
        RelayError::from_status_failure(e)
    })?;

    record_status_query("ok");

    Ok(Json(StatusResponse {
        success: true,
        order_number,
        status,
    }))
}
