//! Request and response bodies of the public HTTP API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{NewSession, SessionResult};

pub const DEFAULT_CURRENCY: &str = "TRY";

/// Fields a session request must carry, in the order they are reported.
pub const REQUIRED_SESSION_FIELDS: [&str; 4] =
    ["amount", "orderNumber", "customerEmail", "returnUrl"];

#[derive(Debug, Error)]
pub enum SessionBodyError {
    #[error("Failed to parse the request body as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse the request body as a form: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    #[error("JSON request body must be an object")]
    NotAnObject,

    #[error(
        "Expected request with `Content-Type: application/json` \
         or `application/x-www-form-urlencoded`"
    )]
    UnsupportedContentType,
}

/// Body of `POST /qpay/session`.
///
/// Fields are kept loosely typed so that a client sending `"amount": "150"`,
/// a numeric order number or a form post is treated the same as the
/// canonical shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub amount: Option<Value>,
    pub currency: Option<Value>,
    pub order_number: Option<Value>,
    pub customer_email: Option<Value>,
    pub return_url: Option<Value>,
}

impl SessionRequest {
    /// Decode a body sent as JSON or as a urlencoded form. An empty body is
    /// an empty request, so it fails validation rather than parsing.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, SessionBodyError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let content_type = content_type.map(str::to_ascii_lowercase).unwrap_or_default();

        let fields = if content_type.contains("json") {
            match serde_json::from_slice::<Value>(body)? {
                Value::Object(map) => map,
                _ => return Err(SessionBodyError::NotAnObject),
            }
        } else if content_type.contains("application/x-www-form-urlencoded") {
            serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)?
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect::<Map<String, Value>>()
        } else {
            return Err(SessionBodyError::UnsupportedContentType);
        };

        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Check the required fields. On failure returns the names of every
    /// missing field, not just the first.
    pub fn validate(self) -> Result<NewSession, Vec<&'static str>> {
        let amount = present(self.amount);
        let order_number = present(self.order_number);
        let customer_email = present(self.customer_email);
        let return_url = present(self.return_url);

        match (amount, order_number, customer_email, return_url) {
            (Some(amount), Some(order_number), Some(customer_email), Some(return_url)) => {
                Ok(NewSession {
                    amount,
                    currency: present(self.currency)
                        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                    order_number,
                    customer_email,
                    return_url,
                })
            }
            (amount, order_number, customer_email, return_url) => {
                let presence = [
                    amount.is_some(),
                    order_number.is_some(),
                    customer_email.is_some(),
                    return_url.is_some(),
                ];
                Err(REQUIRED_SESSION_FIELDS
                    .iter()
                    .zip(presence)
                    .filter(|(_, is_present)| !is_present)
                    .map(|(name, _)| *name)
                    .collect())
            }
        }
    }
}

/// Render a loosely typed field as form text. Absent, `null`, `false`,
/// empty strings and numeric zero count as not provided.
fn present(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub success: bool,
    pub session_token: String,
    pub payment_url: String,
    pub expires_at: String,
    pub order_number: String,
}

impl From<SessionResult> for SessionResponse {
    fn from(result: SessionResult) -> Self {
        Self {
            success: true,
            session_token: result.session_token,
            payment_url: result.payment_url,
            expires_at: iso_timestamp(result.expires_at),
            order_number: result.order_number,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub order_number: String,
    /// Upstream body, verbatim.
    pub status: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub environment: String,
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2026-10-16T08:00:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
