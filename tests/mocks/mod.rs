//! Mock infrastructure for external services
//!
//! - OpenAI chat completions API


pub use openai::*;
