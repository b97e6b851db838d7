mod common;

use chrono::DateTime;
use common::{test_settings, TestApp};

#[tokio::test]
async fn health_check_works() {
    // Nothing listens on this port; health must not depend on the gateway.
    let app = TestApp::spawn_with(test_settings("http://127.0.0.1:9/qpay/api/v2")).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "OK");
    assert_eq!(body["environment"], "test");

    let timestamp = body["timestamp"].as_str().expect("timestamp is a string");
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert!(timestamp.ends_with('Z'));
}

#[tokio::test]
async fn metrics_endpoint_responds() {
    let app = TestApp::spawn_with(test_settings("http://127.0.0.1:9/qpay/api/v2")).await;

    let response = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn cors_allows_configured_origin_only() {
    let app = TestApp::spawn_with(test_settings("http://127.0.0.1:9/qpay/api/v2")).await;

    let allowed = app
        .client
        .get(format!("{}/health", app.address))
        .header("origin", "capacitor://localhost")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(
        allowed
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "capacitor://localhost"
    );

    let other = app
        .client
        .get(format!("{}/health", app.address))
        .header("origin", "https://evil.example")
        .send()
        .await
        .expect("Failed to execute request");
    assert!(other
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}
