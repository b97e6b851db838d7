pub mod metrics;
pub mod qpay;
pub mod verifier;

pub use qpay::{QpayClient, QpayError};
pub use verifier::{CallbackVerifier, NoopVerifier, Verification};
