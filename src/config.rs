//! Configuration management for Athena
//!
//! Configuration is loaded from environment variables once at startup and is
//! immutable afterwards.

use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;

/// Persona used when `ATHENA_PERSONA_FILE` is not set
pub const DEFAULT_PERSONA: &str = include_str!("../assets/persona.txt");

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// OpenAI API URL
    pub openai_api_url: String,
    /// OpenAI API key
    pub openai_api_key: String,

    /// Model identifier sent with every completion request
    pub model: String,
    /// Messages longer than this are truncated to their first `max_words` words
    pub max_words: usize,
    /// Upper bound on generated tokens per reply
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Admitted requests per client per calendar day
    pub daily_limit: u32,
    /// Timeout for the outbound completion call (in seconds)
    pub upstream_timeout_seconds: u64,

    /// System instruction prepended to every conversation
    pub persona: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let persona = match lookup("ATHENA_PERSONA_FILE") {
            Some(path) => std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read ATHENA_PERSONA_FILE at {}", path))?,
            None => DEFAULT_PERSONA.to_string(),
        };

        let config = Self {
            host: lookup("ATHENA_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(
                lookup("ATHENA_PORT").or_else(|| lookup("PORT")),
                8080,
                "ATHENA_PORT",
            )?,

            openai_api_url: lookup("OPENAI_API_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            openai_api_key: lookup("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,

            model: lookup("ATHENA_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            max_words: parse_or(lookup("ATHENA_MAX_WORDS"), 200, "ATHENA_MAX_WORDS")?,
            max_tokens: parse_or(lookup("ATHENA_MAX_TOKENS"), 400, "ATHENA_MAX_TOKENS")?,
            temperature: parse_or(lookup("ATHENA_TEMPERATURE"), 0.7, "ATHENA_TEMPERATURE")?,
            daily_limit: parse_or(lookup("ATHENA_DAILY_LIMIT"), 50, "ATHENA_DAILY_LIMIT")?,
            upstream_timeout_seconds: parse_or(
                lookup("UPSTREAM_TIMEOUT_SECONDS"),
                30,
                "UPSTREAM_TIMEOUT_SECONDS",
            )?,

            persona: persona.trim().to_string(),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_words == 0 {
            bail!("ATHENA_MAX_WORDS must be at least 1");
        }
        if self.max_tokens == 0 {
            bail!("ATHENA_MAX_TOKENS must be at least 1");
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            bail!("ATHENA_TEMPERATURE must be between 0 and 2");
        }
        if self.upstream_timeout_seconds == 0 {
            bail!("UPSTREAM_TIMEOUT_SECONDS must be at least 1");
        }
        if self.persona.is_empty() {
            bail!("Persona instruction must not be empty");
        }
        Ok(())
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T, name: &str) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid {}: {:?}", name, raw)),
        None => Ok(default),
    }
}
