use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::dtos::REQUIRED_SESSION_FIELDS;
use crate::services::QpayError;

/// Errors returned by the JSON endpoints. Every variant renders as
/// `{success: false, error, ...}`.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    /// QPay was reached and turned the request down.
    #[error("{error}")]
    Gateway {
        status: StatusCode,
        error: &'static str,
        details: Value,
    },

    /// QPay could not be reached, or the exchange failed outright.
    #[error("{error}: {message}")]
    Upstream { error: &'static str, message: String },
}

impl RelayError {
    /// Map a failed session token request.
    ///
    /// A non-success answer mirrors QPay's status, a success without a token
    /// is a 400, and anything that never got an answer is a 500.
    pub fn from_session_failure(err: QpayError) -> Self {
        match err {
            QpayError::Rejected { status, body } => RelayError::Gateway {
                status,
                error: "QPay API Error",
                details: body,
            },
            QpayError::MissingToken { body } => RelayError::Gateway {
                status: StatusCode::BAD_REQUEST,
                error: "QPay session token creation failed",
                details: body,
            },
            err @ (QpayError::Timeout(_) | QpayError::Transport(_)) => RelayError::Upstream {
                error: "Internal server error",
                message: err.to_string(),
            },
        }
    }

    /// Map a failed status query. Every failure is a 500.
    pub fn from_status_failure(err: QpayError) -> Self {
        RelayError::Upstream {
            error: "Failed to query transaction status",
            message: err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation { .. } | RelayError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            RelayError::Gateway { status, .. } => *status,
            RelayError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<[&'static str; 4]>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            RelayError::Validation { missing } => ErrorResponse {
                success: false,
                error: "Missing required fields".to_string(),
                details: None,
                message: None,
                missing: Some(missing),
                required: Some(REQUIRED_SESSION_FIELDS),
            },
            RelayError::MalformedBody(message) => ErrorResponse {
                success: false,
                error: "Invalid request body".to_string(),
                details: None,
                message: Some(message),
                missing: None,
                required: None,
            },
            RelayError::Gateway { error, details, .. } => ErrorResponse {
                success: false,
                error: error.to_string(),
                details: Some(details),
                message: None,
                missing: None,
                required: None,
            },
            RelayError::Upstream { error, message } => ErrorResponse {
                success: false,
                error: error.to_string(),
                details: None,
                message: Some(message),
                missing: None,
                required: None,
            },
        };

        (status, Json(body)).into_response()
    }
}
