//! Health and metrics endpoint integration tests

use axum::http::StatusCode;
use serde_json::Value;

use crate::common::{
    constants::{CLIENT_A, CLIENT_B},
    test_epoch, TestHarness,
};

#[tokio::test]
async fn test_liveness() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/health/live").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_health_reports_usage_for_current_epoch() {
    let harness = TestHarness::with_config(|config| config.daily_limit = 7).await;
    harness.openai.mock_reply("ok").await;

    harness.send_message(CLIENT_A, "one").await;
    harness.send_message(CLIENT_A, "two").await;
    harness.send_message(CLIENT_B, "three").await;

    let body = harness.server.get("/health").await.json::<Value>();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["usage"]["epoch"], test_epoch().to_string());
    assert_eq!(body["usage"]["tracked_clients"], 2);
    assert_eq!(body["usage"]["admitted_today"], 3);
    assert_eq!(body["usage"]["daily_limit"], 7);

    harness.clock.advance_days(1);

    let body = harness.server.get("/health").await.json::<Value>();
    assert_eq!(body["usage"]["tracked_clients"], 0);
    assert_eq!(body["usage"]["admitted_today"], 0);
}

#[tokio::test]
async fn test_metrics_endpoint_renders() {
    athena::routes::metrics::init_metrics();
    let harness = TestHarness::new().await;

    let response = harness.server.get("/metrics").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}
