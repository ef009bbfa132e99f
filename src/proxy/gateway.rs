//! Completion gateway
//!
//! Wraps a user message in the persona instruction, calls the provider once,
//! and reduces the response to reply text.

use std::sync::Arc;

use tracing::{info, warn};

use super::provider::CompletionProvider;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::{config::Config, error::UpstreamError, routes::metrics::record_tokens};

/// Reply used when the provider succeeds but returns no text
pub const FALLBACK_REPLY: &str = "Athena is silent for now. Try again in a moment.";

/// Sends persona-framed messages to a completion provider
pub struct CompletionGateway {
    provider: Arc<dyn CompletionProvider>,
    persona: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl CompletionGateway {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &Config) -> Self {
        Self {
            provider,
            persona: config.persona.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Build the two-turn request for a message
    pub fn build_request(&self, message: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.persona.as_str()),
                ChatMessage::user(message),
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Generate a reply for a normalized message
    pub async fn complete(&self, message: &str) -> Result<String, UpstreamError> {
        let request = self.build_request(message);
        let response = self.provider.chat_completions(&request).await?;

        if let Some(usage) = &response.usage {
            record_tokens("prompt", u64::from(usage.prompt_tokens), &self.model);
            record_tokens("completion", u64::from(usage.completion_tokens), &self.model);
        }

        match response.first_content().map(str::trim) {
            Some(reply) if !reply.is_empty() => {
                info!(
                    provider = self.provider.name(),
                    model = %self.model,
                    reply_chars = reply.chars().count(),
                    "Completion received"
                );
                Ok(reply.to_string())
            }
            _ => {
                warn!(
                    provider = self.provider.name(),
                    model = %self.model,
                    choices = response.choices.len(),
                    "Completion carried no text, using fallback reply"
                );
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }
}
