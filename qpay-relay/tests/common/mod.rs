#![allow(dead_code)]

use qpay_relay::config::{HttpSettings, QpaySettings, Settings};
use qpay_relay::startup::Application;
use secrecy::Secret;
use service_core::config::Config;
use wiremock::MockServer;

/// Path the mock gateway serves the API under.
pub const QPAY_API_PATH: &str = "/qpay/api/v2";

pub const TEST_MERCHANT_USER: &str = "merchant@example.com";
pub const TEST_MERCHANT_PASSWORD: &str = "test-password";
pub const TEST_MERCHANT: &str = "378855";
pub const TEST_USER_AGENT: &str = "qpay-relay-tests/1.0";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_url: String,
    pub client: reqwest::Client,
}

pub fn test_settings(api_url: &str) -> Settings {
    Settings {
        common: Config {
            port: 0, // Random port
            environment: "test".to_string(),
        },
        qpay: QpaySettings {
            merchant_user: Some(TEST_MERCHANT_USER.to_string()),
            merchant_password: Some(Secret::new(TEST_MERCHANT_PASSWORD.to_string())),
            merchant: Some(TEST_MERCHANT.to_string()),
            secret_key: None,
            api_url: api_url.to_string(),
            timeout_secs: 30,
            user_agent: TEST_USER_AGENT.to_string(),
        },
        http: HttpSettings::default(),
    }
}

impl TestApp {
    /// Spawn the relay in front of the given mock gateway.
    pub async fn spawn(upstream: &MockServer) -> Self {
        let api_url = format!("{}{}", upstream.uri(), QPAY_API_PATH);
        Self::spawn_with(test_settings(&api_url)).await
    }

    pub async fn spawn_with(settings: Settings) -> Self {
        let api_url = settings.qpay.api_url.clone();

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            api_url,
            client,
        }
    }

    pub async fn post_session(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/qpay/session", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_session_form(&self, body: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/qpay/session", self.address))
            .header("content-type", "application/x-www-form-urlencoded")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_status(&self, order_number: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/qpay/status/{}", self.address, order_number))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Decoded form fields of every request the mock gateway received.
pub async fn received_forms(upstream: &MockServer) -> Vec<Vec<(String, String)>> {
    upstream
        .received_requests()
        .await
        .expect("Request recording is enabled")
        .iter()
        .map(|request| {
            serde_urlencoded::from_bytes(&request.body).expect("Upstream body is form encoded")
        })
        .collect()
}

pub fn field<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
    form.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
