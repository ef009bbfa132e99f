//! Message normalizer
//!
//! Turns the raw `message` field of a request body into the text that is
//! forwarded to the completion provider. Over-long messages are truncated,
//! never rejected.

use serde_json::Value;

use crate::error::ValidationError;

/// A validated, possibly truncated message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Text to forward upstream
    pub text: String,
    /// Word count of the trimmed input, before truncation
    pub word_count: usize,
    /// Whether words were dropped
    pub truncated: bool,
}

/// Validate and normalize a raw message value
///
/// Leading and trailing whitespace is removed. Inputs with at most
/// `max_words` words are otherwise returned unchanged; longer inputs keep
/// only their first `max_words` words, joined by single spaces.
pub fn normalize(raw: Option<&Value>, max_words: usize) -> Result<Normalized, ValidationError> {
    let text = match raw {
        None | Some(Value::Null) => return Err(ValidationError::Missing),
        Some(Value::String(s)) => s,
        Some(_) => return Err(ValidationError::NotAString),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let word_count = trimmed.split_whitespace().count();
    if word_count <= max_words {
        return Ok(Normalized {
            text: trimmed.to_string(),
            word_count,
            truncated: false,
        });
    }

    let text = trimmed
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Normalized {
        text,
        word_count,
        truncated: true,
    })
}
