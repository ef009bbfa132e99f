//! Chat endpoint integration tests
//!
//! - POST /api/chat happy path and request shape sent upstream
//! - Input validation (missing, non-string, malformed body)
//! - Truncation of long messages
//! - Method routing

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{
    constants::{CLIENT_A, TEST_PERSONA},
    TestHarness,
};

#[tokio::test]
async fn test_chat_returns_reply() {
    let harness = TestHarness::new().await;
    harness.openai.mock_reply("Greetings, Program.").await;

    let response = harness.send_message(CLIENT_A, "Who are you?").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "reply": "Greetings, Program." }));
}

#[tokio::test]
async fn test_upstream_request_carries_persona_and_message() {
    let harness = TestHarness::new().await;
    harness.openai.mock_reply("ok").await;

    harness.send_message(CLIENT_A, "  Where is Flynn?  ").await;

    let bodies = harness.openai.received_bodies().await;
    assert_eq!(bodies.len(), 1);

    let body = &bodies[0];
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["max_tokens"], 128);
    assert_eq!(
        body["messages"],
        json!([
            { "role": "system", "content": TEST_PERSONA },
            { "role": "user", "content": "Where is Flynn?" }
        ])
    );
}

#[tokio::test]
async fn test_long_message_is_truncated_not_rejected() {
    let harness = TestHarness::with_config(|config| config.max_words = 3).await;
    harness.openai.mock_reply("ok").await;

    let response = harness
        .send_message(CLIENT_A, "the   grid is a digital frontier")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let bodies = harness.openai.received_bodies().await;
    assert_eq!(bodies[0]["messages"][1]["content"], "the grid is");
}

#[tokio::test]
async fn test_hello_world_single_word_limit() {
    let harness = TestHarness::with_config(|config| config.max_words = 1).await;
    harness.openai.mock_reply("ok").await;

    harness.send_message(CLIENT_A, "hello world").await;

    let bodies = harness.openai.received_bodies().await;
    assert_eq!(bodies[0]["messages"][1]["content"], "hello");
}

#[tokio::test]
async fn test_missing_message_is_bad_request_and_not_counted() {
    let harness = TestHarness::new().await;
    harness.openai.mock_reply("unused").await;

    let response = harness.chat_from(CLIENT_A).json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "No message provided." }));
    assert_eq!(harness.tracker_usage(CLIENT_A).await, 0);
    assert!(harness.openai.received_bodies().await.is_empty());
}

#[tokio::test]
async fn test_non_string_message_is_bad_request_and_not_counted() {
    let harness = TestHarness::new().await;

    for body in [json!({ "message": 42 }), json!({ "message": ["hi"] }), json!({ "message": null })] {
        let response = harness.chat_from(CLIENT_A).json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    assert_eq!(harness.tracker_usage(CLIENT_A).await, 0);
}

#[tokio::test]
async fn test_blank_message_is_bad_request() {
    let harness = TestHarness::new().await;

    let response = harness.send_message(CLIENT_A, "   \n ").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.tracker_usage(CLIENT_A).await, 0);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let harness = TestHarness::new().await;

    let response = harness.chat_from(CLIENT_A).text("message=hello").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Request body must be a JSON object." })
    );
}

#[tokio::test]
async fn test_non_post_methods_are_rejected() {
    let harness = TestHarness::new().await;

    for response in [
        harness.server.get("/api/chat").await,
        harness.server.put("/api/chat").await,
        harness.server.delete("/api/chat").await,
    ] {
        assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Only POST requests allowed." })
        );
    }

    let snapshot = harness.tracker_snapshot_clients().await;
    assert_eq!(snapshot, 0);
}

#[tokio::test]
async fn test_success_carries_rate_limit_headers() {
    let harness = TestHarness::with_config(|config| config.daily_limit = 3).await;
    harness.openai.mock_reply("ok").await;

    let response = harness.send_message(CLIENT_A, "hi").await;

    let headers = response.headers();
    assert_eq!(headers["x-ratelimit-limit"], "3");
    assert_eq!(headers["x-ratelimit-remaining"], "2");
    assert!(headers.contains_key("x-ratelimit-reset"));
}
