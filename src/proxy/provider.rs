//! Completion provider abstraction
//!
//! Defines the trait interface for hosted completion APIs so the gateway and
//! its tests do not depend on a concrete HTTP client.

use async_trait::async_trait;

use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::error::UpstreamError;

/// Trait defining the interface for completion providers
///
/// Implementations make exactly one attempt per call and classify every
/// failure into an [`UpstreamError`]: `Classified` when the provider returned
/// a structured error, `Unclassified` for everything else.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Chat completions (non-streaming)
    async fn chat_completions(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, UpstreamError>;
}
