//! OpenAI chat completions client
//!
//! Sends a single request to `{OPENAI_API_URL}/chat/completions` and
//! classifies every failure.

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::provider::CompletionProvider;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ProviderErrorResponse};
use crate::{config::Config, error::UpstreamError};

/// OpenAI completion provider
pub struct OpenAIProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    ///
    /// The client's timeout bounds every completion call.
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.openai_api_url.clone(),
            api_key: config.openai_api_key.clone(),
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip_all, fields(provider = "openai", model = %request.model))]
    async fn chat_completions(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, UpstreamError> {
        let url = self.chat_completions_url();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, timeout = e.is_timeout(), "Failed to send request to OpenAI");
                transport_error(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(status = %status, body_len = body.len(), "Received response from OpenAI");

        if !status.is_success() {
            return Err(classify_error_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| UpstreamError::Unclassified {
            reason: format!("Undecodable completion response: {}", e),
        })
    }
}

fn transport_error(e: reqwest::Error) -> UpstreamError {
    let reason = if e.is_timeout() {
        format!("Request to completion provider timed out: {}", e)
    } else {
        format!("Transport error: {}", e)
    };
    UpstreamError::Unclassified { reason }
}

/// Map a non-success provider response onto the error taxonomy
pub fn classify_error_response(status: u16, body: &str) -> UpstreamError {
    let status_code = StatusCode::from_u16(status).ok();

    match (status_code, serde_json::from_str::<ProviderErrorResponse>(body)) {
        (Some(status), Ok(parsed)) => UpstreamError::Classified {
            status,
            message: parsed.error.message,
            error_type: parsed.error.error_type,
            code: parsed.error.code.and_then(|code| match code {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            }),
        },
        _ => UpstreamError::Unclassified {
            reason: format!("HTTP {} with unstructured body: {}", status, truncate(body, 512)),
        },
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
