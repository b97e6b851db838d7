//! Payment notifications QPay posts back to the relay.
//!
//! QPay may deliver the notification either form-encoded or as JSON, so the
//! payload is decoded into a flat field map first and the known fields are
//! read out of it. Every field is passed through untouched; only
//! `responseCode` is interpreted.

use serde_json::{Map, Value};
use thiserror::Error;

/// Response code QPay uses for an approved transaction.
pub const APPROVED_RESPONSE_CODE: &str = "00";

#[derive(Debug, Error)]
pub enum CallbackParseError {
    #[error("invalid JSON callback body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid form callback body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    #[error("callback body must be a JSON object")]
    NotAnObject,
}

#[derive(Debug, Clone, Default)]
pub struct CallbackPayload {
    pub response_code: Option<String>,
    pub response_msg: Option<String>,
    pub order_number: Option<String>,
    pub transaction_id: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    /// `sdSha512` signature over the notification.
    pub signature: Option<String>,
    /// `random` nonce mixed into the signature.
    pub random: Option<String>,
    pub auth_code: Option<String>,
    pub rrn: Option<String>,
    pub batch_number: Option<String>,
    /// Everything QPay sent, including fields not listed above.
    pub fields: Map<String, Value>,
}

impl CallbackPayload {
    /// Decode a body according to its content type. JSON is used when the
    /// content type says so; anything else is read as a urlencoded form.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, CallbackParseError> {
        let is_json = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);

        let fields = if is_json {
            if body.iter().all(u8::is_ascii_whitespace) {
                Map::new()
            } else {
                match serde_json::from_slice::<Value>(body)? {
                    Value::Object(map) => map,
                    _ => return Err(CallbackParseError::NotAnObject),
                }
            }
        } else {
            serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)?
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect()
        };

        Ok(Self::from_fields(fields))
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        let get = |key: &str| fields.get(key).and_then(field_text);

        Self {
            response_code: get("responseCode"),
            response_msg: get("responseMsg"),
            order_number: get("orderNumber"),
            transaction_id: get("transactionId"),
            amount: get("amount"),
            currency: get("currency"),
            signature: get("sdSha512"),
            random: get("random"),
            auth_code: get("authCode"),
            rrn: get("rrn"),
            batch_number: get("batchNumber"),
            fields,
        }
    }

    /// Exact string match on the response code; `0`, `"0"` or `" 00"` are
    /// not approvals.
    pub fn is_successful(&self) -> bool {
        self.response_code.as_deref() == Some(APPROVED_RESPONSE_CODE)
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
