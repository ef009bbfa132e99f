//! Daily quota integration tests
//!
//! - Per-client admission up to the daily limit
//! - 429 responses with rate limit headers
//! - Independent counters per client
//! - Reset on a new calendar day

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{
    constants::{CLIENT_A, CLIENT_B},
    TestHarness,
};

#[tokio::test]
async fn test_daily_limit_two_scenario() {
    let harness = TestHarness::with_config(|config| config.daily_limit = 2).await;
    harness.openai.mock_reply("ok").await;

    let statuses: Vec<StatusCode> = {
        let mut statuses = Vec::new();
        for _ in 0..3 {
            statuses.push(harness.send_message(CLIENT_A, "hello").await.status_code());
        }
        statuses
    };
    assert_eq!(
        statuses,
        vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
    );

    let response = harness.send_message(CLIENT_B, "hello").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_quota_response_body_and_headers() {
    let harness = TestHarness::with_config(|config| config.daily_limit = 1).await;
    harness.openai.mock_reply("ok").await;

    harness.send_message(CLIENT_A, "first").await;
    let response = harness.send_message(CLIENT_A, "second").await;

    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Daily message limit reached. Athena will be available again tomorrow." })
    );

    let headers = response.headers();
    assert_eq!(headers["x-ratelimit-limit"], "1");
    assert_eq!(headers["x-ratelimit-remaining"], "0");
    assert!(headers.contains_key(header::RETRY_AFTER));
}

#[tokio::test]
async fn test_rejected_requests_never_reach_provider_or_count() {
    let harness = TestHarness::with_config(|config| config.daily_limit = 1).await;
    harness.openai.mock_reply("ok").await;

    harness.send_message(CLIENT_A, "first").await;
    for _ in 0..3 {
        let response = harness.send_message(CLIENT_A, "again").await;
        assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    assert_eq!(harness.openai.received_bodies().await.len(), 1);
    assert_eq!(harness.tracker_usage(CLIENT_A).await, 1);
}

#[tokio::test]
async fn test_exhausted_client_is_admitted_after_day_change() {
    let harness = TestHarness::with_config(|config| config.daily_limit = 2).await;
    harness.openai.mock_reply("ok").await;

    harness.send_message(CLIENT_A, "one").await;
    harness.send_message(CLIENT_A, "two").await;
    assert_eq!(
        harness.send_message(CLIENT_A, "three").await.status_code(),
        StatusCode::TOO_MANY_REQUESTS
    );

    harness.clock.advance_days(1);

    let response = harness.send_message(CLIENT_A, "new day").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(harness.tracker_usage(CLIENT_A).await, 1);
}

#[tokio::test]
async fn test_upstream_failures_still_consume_quota() {
    let harness = TestHarness::with_config(|config| config.daily_limit = 1).await;
    harness
        .openai
        .mock_error(500, "The server had an error", "server_error", "internal_error")
        .await;

    let first = harness.send_message(CLIENT_A, "hello").await;
    assert_eq!(first.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let second = harness.send_message(CLIENT_A, "hello").await;
    assert_eq!(second.status_code(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_requests_without_forwarded_for_share_one_bucket() {
    let harness = TestHarness::with_config(|config| config.daily_limit = 1).await;
    harness.openai.mock_reply("ok").await;

    let first = harness.server.post("/api/chat").json(&json!({ "message": "hi" })).await;
    let second = harness.server.post("/api/chat").json(&json!({ "message": "hi" })).await;

    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(second.status_code(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(harness.tracker_snapshot_clients().await, 1);
}
