//! Chat endpoint
//!
//! `POST /api/chat` with `{ "message": string }`, answered with `{ "reply": string }`.
//! Validation runs before admission so malformed requests never consume quota.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{
    error::{AppError, ValidationError},
    message::{normalize, Normalized},
    middleware::client_ip::ClientId,
    routes::metrics::{record_quota_rejection, record_request, record_upstream_error},
    usage::{next_reset_at, Admission},
    AppState,
};

/// Successful chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Parse the request body and normalize its `message` field
pub fn parse_message(body: &[u8], max_words: usize) -> Result<Normalized, ValidationError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ValidationError::MalformedBody)?;
    let object = value.as_object().ok_or(ValidationError::MalformedBody)?;

    normalize(object.get("message"), max_words)
}

/// Handle chat requests
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(client): Extension<ClientId>,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let span = info_span!(
        "chat",
        request_id = %Uuid::new_v4(),
        client_id = %client.as_str()
    );

    async move {
        let normalized = match parse_message(&body, state.config.max_words) {
            Ok(normalized) => normalized,
            Err(e) => {
                debug!(reason = %e, "Rejected invalid chat request");
                return finish("invalid", start, AppError::from(e).into_response());
            }
        };

        let admission = state.usage_limiter.admit(client.as_str()).await;
        if !admission.allowed {
            warn!(
                limit = admission.limit,
                used = admission.used,
                "Daily quota exceeded"
            );
            record_quota_rejection();
            return finish("quota_exceeded", start, quota_exceeded_response(&admission));
        }

        info!(
            words = normalized.word_count,
            truncated = normalized.truncated,
            used = admission.used,
            limit = admission.limit,
            "Processing chat request"
        );

        match state.gateway.complete(&normalized.text).await {
            Ok(reply) => {
                let mut response = (StatusCode::OK, Json(ChatReply { reply })).into_response();
                insert_rate_limit_headers(&mut response, &admission);
                finish("success", start, response)
            }
            Err(e) => {
                error!(
                    kind = e.kind(),
                    status = e.status().as_u16(),
                    error = %e,
                    "Completion request failed"
                );
                record_upstream_error(e.kind(), e.status().as_u16());
                finish("upstream_error", start, AppError::from(e).into_response())
            }
        }
    }
    .instrument(span)
    .await
}

/// Fallback for non-POST methods on the chat route
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn finish(outcome: &str, start: Instant, response: Response) -> Response {
    let duration = start.elapsed().as_secs_f64();
    record_request(outcome, duration);
    info!(
        outcome,
        status = response.status().as_u16(),
        duration_ms = %format!("{:.2}", duration * 1000.0),
        "Chat request completed"
    );
    response
}

/// Build a 429 response carrying rate limit headers
pub fn quota_exceeded_response(admission: &Admission) -> Response {
    let mut response = AppError::QuotaExceeded {
        limit: admission.limit,
        used: admission.used,
    }
    .into_response();

    insert_rate_limit_headers(&mut response, admission);

    if let Some(reset_at) = next_reset_at(admission.epoch) {
        let retry_after = (reset_at.timestamp() - chrono::Utc::now().timestamp()).max(1);
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    }

    response
}

fn insert_rate_limit_headers(response: &mut Response, admission: &Admission) {
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-ratelimit-limit"),
        HeaderValue::from(admission.limit),
    );
    headers.insert(
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderValue::from(admission.remaining()),
    );
    if let Some(reset_at) = next_reset_at(admission.epoch) {
        headers.insert(
            HeaderName::from_static("x-ratelimit-reset"),
            HeaderValue::from(reset_at.timestamp()),
        );
    }
}
