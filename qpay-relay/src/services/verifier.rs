//! Callback signature verification.
//!
//! QPay signs notifications with an `sdSha512` field and a `random` nonce,
//! but the exact signing input has not been confirmed with QPay. The relay
//! therefore ships only [`NoopVerifier`], which records that verification
//! was skipped. A real implementation plugs in through [`CallbackVerifier`].

use crate::config::QpaySettings;
use crate::models::CallbackPayload;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Rejected,
    /// No check was performed.
    Skipped,
}

impl Verification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verification::Verified => "verified",
            Verification::Rejected => "rejected",
            Verification::Skipped => "skipped",
        }
    }
}

#[async_trait]
pub trait CallbackVerifier: Send + Sync {
    /// Check `signature` against the notification. Called only when a shared
    /// secret is configured and the notification carries a signature.
    async fn verify(&self, payload: &CallbackPayload, signature: &str) -> Verification;
}

/// Placeholder verifier: accepts nothing, rejects nothing.
pub struct NoopVerifier;

#[async_trait]
impl CallbackVerifier for NoopVerifier {
    async fn verify(&self, payload: &CallbackPayload, _signature: &str) -> Verification {
        tracing::info!(
            order_number = payload.order_number.as_deref().unwrap_or("-"),
            "Callback signature present but verification is not implemented"
        );
        Verification::Skipped
    }
}

/// Verifier for the configured secret, or `None` when no secret is set.
pub fn verifier_for(settings: &QpaySettings) -> Option<Arc<dyn CallbackVerifier>> {
    settings
        .secret_key
        .as_ref()
        .map(|_| Arc::new(NoopVerifier) as Arc<dyn CallbackVerifier>)
}

/// Run the verifier when one is configured and a signature was sent.
pub async fn verify_callback(
    verifier: Option<&dyn CallbackVerifier>,
    payload: &CallbackPayload,
) -> Verification {
    match (verifier, payload.signature.as_deref()) {
        (Some(verifier), Some(signature)) => verifier.verify(payload, signature).await,
        _ => Verification::Skipped,
    }
}
