pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use std::sync::Arc;

use config::Settings;
use services::{CallbackVerifier, QpayClient};

/// Shared application state. Immutable after start-up.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub qpay: QpayClient,
    /// Present only when a callback secret is configured.
    pub verifier: Option<Arc<dyn CallbackVerifier>>,
}
