//! Proxy module
//!
//! Handles request forwarding to the upstream completion provider.

pub mod gateway;
pub mod openai;
pub mod provider;
pub mod types;

pub use gateway::{CompletionGateway, FALLBACK_REPLY};
pub use openai::OpenAIProvider;
pub use provider::CompletionProvider;
