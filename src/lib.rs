//! Athena - persona chat relay with per-client daily quotas
//!
//! This library provides the core of the Athena relay: message
//! normalization, daily usage accounting, and the completion gateway in
//! front of a hosted LLM API.

pub mod config;
pub mod error;
pub mod message;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod usage;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

pub use crate::config::Config;
pub use crate::proxy::{CompletionGateway, CompletionProvider, OpenAIProvider};
pub use crate::usage::{DailyUsageTracker, UsageLimiter};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Admission control, injected so the counter store can be replaced
    pub usage_limiter: Arc<dyn UsageLimiter>,
    /// Gateway to the completion provider
    pub gateway: Arc<CompletionGateway>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // The client timeout is the only bound on the upstream call
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(16)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.upstream_timeout_seconds))
            .build()?;

        let provider: Arc<dyn CompletionProvider> =
            Arc::new(OpenAIProvider::new(http_client, &config));
        let usage_limiter: Arc<dyn UsageLimiter> =
            Arc::new(DailyUsageTracker::new(config.daily_limit));

        Ok(Self::with_components(config, usage_limiter, provider))
    }

    /// Create application state from explicit components
    pub fn with_components(
        config: Config,
        usage_limiter: Arc<dyn UsageLimiter>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        let gateway = Arc::new(CompletionGateway::new(provider, &config));

        Self {
            config,
            start_time: Instant::now(),
            usage_limiter,
            gateway,
        }
    }
}
