//! QPay gateway client.
//!
//! QPay exposes a single form-encoded endpoint; the `ACTION` field selects
//! the operation. Responses are JSON.

use crate::config::QpaySettings;
use crate::models::{NewSession, SessionResult};
use chrono::Utc;
use reqwest::{header, Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const ACTION_SESSION_TOKEN: &str = "SESSIONTOKEN";
pub const ACTION_QUERY_STATUS: &str = "QUERYSTATUS";
pub const SESSION_TYPE_PAYMENT: &str = "PAYMENTSESSION";

/// How a call to QPay failed.
#[derive(Debug, Error)]
pub enum QpayError {
    /// QPay answered, with a non-success status.
    #[error("Request failed with status code {}", .status.as_u16())]
    Rejected { status: StatusCode, body: Value },

    /// QPay answered successfully but issued no session token.
    #[error("QPay response did not contain a session token")]
    MissingToken { body: Value },

    /// No answer within the configured timeout.
    #[error("timeout of {0}s exceeded")]
    Timeout(u64),

    /// Connection, TLS or body transfer failure.
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
}

/// Form body for `ACTION=SESSIONTOKEN`. Absent values are left out of the
/// form entirely.
#[derive(Debug, Serialize)]
pub struct SessionTokenForm<'a> {
    #[serde(rename = "ACTION")]
    pub action: &'static str,
    #[serde(rename = "SESSIONTYPE")]
    pub session_type: &'static str,
    #[serde(rename = "MERCHANTUSER", skip_serializing_if = "Option::is_none")]
    pub merchant_user: Option<&'a str>,
    #[serde(rename = "MERCHANTPASSWORD", skip_serializing_if = "Option::is_none")]
    pub merchant_password: Option<&'a str>,
    #[serde(rename = "MERCHANT", skip_serializing_if = "Option::is_none")]
    pub merchant: Option<&'a str>,
    #[serde(rename = "MERCHANTPAYMENTID")]
    pub merchant_payment_id: &'a str,
    #[serde(rename = "AMOUNT")]
    pub amount: &'a str,
    #[serde(rename = "CURRENCY")]
    pub currency: &'a str,
    #[serde(rename = "RETURNURL")]
    pub return_url: &'a str,
}

/// Form body for `ACTION=QUERYSTATUS`.
#[derive(Debug, Serialize)]
pub struct QueryStatusForm<'a> {
    #[serde(rename = "ACTION")]
    pub action: &'static str,
    #[serde(rename = "MERCHANTUSER", skip_serializing_if = "Option::is_none")]
    pub merchant_user: Option<&'a str>,
    #[serde(rename = "MERCHANTPASSWORD", skip_serializing_if = "Option::is_none")]
    pub merchant_password: Option<&'a str>,
    #[serde(rename = "MERCHANT", skip_serializing_if = "Option::is_none")]
    pub merchant: Option<&'a str>,
    #[serde(rename = "ORDERNUMBER")]
    pub order_number: &'a str,
}

/// Client for the QPay API. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct QpayClient {
    client: Client,
    settings: QpaySettings,
}

impl QpayClient {
    pub fn new(settings: QpaySettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self { client, settings })
    }

    pub fn session_form<'a>(&'a self, session: &'a NewSession) -> SessionTokenForm<'a> {
        SessionTokenForm {
            action: ACTION_SESSION_TOKEN,
            session_type: SESSION_TYPE_PAYMENT,
            merchant_user: self.settings.merchant_user.as_deref(),
            merchant_password: self
                .settings
                .merchant_password
                .as_ref()
                .map(|p| p.expose_secret().as_str()),
            merchant: self.settings.merchant.as_deref(),
            merchant_payment_id: &session.order_number,
            amount: &session.amount,
            currency: &session.currency,
            return_url: &session.return_url,
        }
    }

    pub fn status_form<'a>(&'a self, order_number: &'a str) -> QueryStatusForm<'a> {
        QueryStatusForm {
            action: ACTION_QUERY_STATUS,
            merchant_user: self.settings.merchant_user.as_deref(),
            merchant_password: self
                .settings
                .merchant_password
                .as_ref()
                .map(|p| p.expose_secret().as_str()),
            merchant: self.settings.merchant.as_deref(),
            order_number,
        }
    }

    /// Request a payment session token for an order.
    pub async fn create_session(&self, session: &NewSession) -> Result<SessionResult, QpayError> {
        let body = self.post_form(&self.session_form(session)).await?;

        let token = session_token(&body).ok_or_else(|| {
            tracing::error!(
                order_number = %session.order_number,
                body = %body,
                "QPay session token creation failed"
            );
            QpayError::MissingToken { body: body.clone() }
        })?;

        tracing::info!(
            order_number = %session.order_number,
            "QPay session token created"
        );

        Ok(SessionResult::issue(
            &self.settings.api_url,
            token,
            session.order_number.clone(),
            Utc::now(),
        ))
    }

    /// Ask QPay for the state of an order. The answer is returned as-is.
    pub async fn query_status(&self, order_number: &str) -> Result<Value, QpayError> {
        self.post_form(&self.status_form(order_number)).await
    }

    async fn post_form<T: Serialize + ?Sized>(&self, form: &T) -> Result<Value, QpayError> {
        let response = self
            .client
            .post(&self.settings.api_url)
            .header(header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        let body = decode_body(&bytes);

        tracing::debug!(status = %status, "QPay response received");

        if status.is_success() {
            Ok(body)
        } else {
            tracing::error!(status = %status, body = %body, "QPay API error response");
            Err(QpayError::Rejected { status, body })
        }
    }

    fn classify(&self, err: reqwest::Error) -> QpayError {
        if err.is_timeout() {
            tracing::error!(timeout_secs = self.settings.timeout_secs, "QPay request timed out");
            QpayError::Timeout(self.settings.timeout_secs)
        } else {
            tracing::error!(error = %err, "QPay request failed");
            QpayError::Transport(err)
        }
    }
}

/// Non-JSON bodies are kept as a JSON string so they can still be echoed.
fn decode_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn session_token(body: &Value) -> Option<String> {
    match body.get("SESSIONTOKEN")? {
        Value::String(token) if !token.is_empty() => Some(token.clone()),
        Value::Number(token) if token.as_f64() != Some(0.0) => Some(token.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_QPAY_API_URL;
    use secrecy::Secret;
    use serde_json::json;

    fn test_settings() -> QpaySettings {
        QpaySettings {
            merchant_user: Some("merchant@example.com".to_string()),
            merchant_password: Some(Secret::new("s3cret".to_string())),
            merchant: Some("378855".to_string()),
            secret_key: None,
            api_url: DEFAULT_QPAY_API_URL.to_string(),
            timeout_secs: 30,
            user_agent: "qpay-relay/test".to_string(),
        }
    }

    fn test_session() -> NewSession {
        NewSession {
            amount: "150.75".to_string(),
            currency: "TRY".to_string(),
            order_number: "ORD-1".to_string(),
            customer_email: "buyer@example.com".to_string(),
            return_url: "https://app.example/return?x=1".to_string(),
        }
    }

    #[test]
    fn session_form_uses_gateway_field_names() {
        let client = QpayClient::new(test_settings()).unwrap();
        let session = test_session();
        let encoded = serde_urlencoded::to_string(client.session_form(&session)).unwrap();

        assert_eq!(
            encoded,
            "ACTION=SESSIONTOKEN&SESSIONTYPE=PAYMENTSESSION\
             &MERCHANTUSER=merchant%40example.com&MERCHANTPASSWORD=s3cret&MERCHANT=378855\
             &MERCHANTPAYMENTID=ORD-1&AMOUNT=150.75&CURRENCY=TRY\
             &RETURNURL=https%3A%2F%2Fapp.example%2Freturn%3Fx%3D1"
        );
        assert!(!encoded.contains("buyer"));
    }

    #[test]
    fn missing_credentials_are_left_out_of_the_form() {
        let mut settings = test_settings();
        settings.merchant_password = None;
        settings.merchant = None;
        let client = QpayClient::new(settings).unwrap();

        let encoded = serde_urlencoded::to_string(client.status_form("ORD-9")).unwrap();
        assert_eq!(
            encoded,
            "ACTION=QUERYSTATUS&MERCHANTUSER=merchant%40example.com&ORDERNUMBER=ORD-9"
        );
    }

    #[test]
    fn session_token_requires_non_empty_value() {
        assert_eq!(
            session_token(&json!({ "SESSIONTOKEN": "abc" })),
            Some("abc".to_string())
        );
        assert_eq!(session_token(&json!({ "SESSIONTOKEN": "" })), None);
        assert_eq!(session_token(&json!({ "SESSIONTOKEN": null })), None);
        assert_eq!(session_token(&json!({ "SESSIONTOKEN": 0 })), None);
        assert_eq!(
            session_token(&json!({ "SESSIONTOKEN": 918273 })),
            Some("918273".to_string())
        );
        assert_eq!(session_token(&json!({ "responseCode": "99" })), None);
        assert_eq!(session_token(&json!("plain text")), None);
    }

    #[test]
    fn non_json_bodies_are_kept_as_text() {
        assert_eq!(decode_body(br#"{"a":1}"#), json!({ "a": 1 }));
        assert_eq!(decode_body(b"<html>oops</html>"), json!("<html>oops</html>"));
    }

    #[test]
    fn rejected_message_names_the_status() {
        let err = QpayError::Rejected {
            status: StatusCode::NOT_FOUND,
            body: Value::Null,
        };
        assert_eq!(err.to_string(), "Request failed with status code 404");
        assert_eq!(QpayError::Timeout(30).to_string(), "timeout of 30s exceeded");
    }
}
