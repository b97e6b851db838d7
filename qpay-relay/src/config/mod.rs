use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

pub const DEFAULT_QPAY_API_URL: &str = "https://qpos-test.qpay.com.tr/qpay/api/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub common: core_config::Config,
    pub qpay: QpaySettings,
    pub http: HttpSettings,
}

/// Merchant credentials and upstream endpoint.
///
/// Credentials are optional: a relay started without them still serves
/// `/health` and forwards whatever it has, and the gateway rejects the rest.
#[derive(Debug, Clone)]
pub struct QpaySettings {
    pub merchant_user: Option<String>,
    pub merchant_password: Option<Secret<String>>,
    pub merchant: Option<String>,
    /// Shared secret for callback signatures. Enables the verification step.
    pub secret_key: Option<Secret<String>>,
    pub api_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl Settings {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            qpay: QpaySettings::from_env()?,
            http: HttpSettings::from_env(),
        })
    }

    /// Report what was configured without printing any credential.
    /// Missing credentials are logged, never fatal.
    pub fn log_summary(&self) {
        tracing::info!(
            environment = %self.common.environment,
            port = self.common.port,
            api_url = %self.qpay.api_url,
            merchant = self.qpay.merchant.as_deref().unwrap_or("-"),
            merchant_user_configured = self.qpay.merchant_user.is_some(),
            secret_key_configured = self.qpay.secret_key.is_some(),
            "QPay relay configuration loaded"
        );

        let missing = self.qpay.missing_credentials();
        if !missing.is_empty() {
            tracing::warn!(
                missing = ?missing,
                "Missing QPay merchant credentials, starting anyway"
            );
        }
    }
}

impl QpaySettings {
    pub fn from_env() -> Result<Self, AppError> {
        let timeout_secs = match non_empty_env("QPAY_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("QPAY_TIMEOUT_SECS is invalid: {}", e))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            merchant_user: non_empty_env("QPAY_MERCHANT_USER"),
            merchant_password: non_empty_env("QPAY_MERCHANT_PASSWORD").map(Secret::new),
            merchant: non_empty_env("QPAY_MERCHANT"),
            secret_key: non_empty_env("QPAY_SECRET_KEY").map(Secret::new),
            api_url: non_empty_env("QPAY_API_URL")
                .unwrap_or_else(|| DEFAULT_QPAY_API_URL.to_string()),
            timeout_secs,
            user_agent: non_empty_env("QPAY_USER_AGENT").unwrap_or_else(default_user_agent),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Names of the environment variables whose credential is absent.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.merchant_user.is_none() {
            missing.push("QPAY_MERCHANT_USER");
        }
        if self.merchant_password.is_none() {
            missing.push("QPAY_MERCHANT_PASSWORD");
        }
        if self.merchant.is_none() {
            missing.push("QPAY_MERCHANT");
        }
        missing
    }
}

impl HttpSettings {
    pub fn from_env() -> Self {
        let allowed_origins = non_empty_env("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_else(default_origins);

        Self { allowed_origins }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            allowed_origins: default_origins(),
        }
    }
}

fn default_user_agent() -> String {
    format!("qpay-relay/{}", env!("CARGO_PKG_VERSION"))
}

fn default_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "capacitor://localhost".to_string(),
        "ionic://localhost".to_string(),
    ]
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
