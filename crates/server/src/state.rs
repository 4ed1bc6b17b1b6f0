use std::sync::Arc;
use summariser_common::AppConfig;
use summariser_llm::LlmClient;

use crate::rate_limit::RateLimiter;

/// Shared application state, built once at startup
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Per-endpoint fixed window
    pub limiter: RateLimiter,

    /// Generation backend
    pub client: Arc<dyn LlmClient>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig, client: Arc<dyn LlmClient>) -> Self {
        let limiter = RateLimiter::from_settings(&config.rate_limit);

        Self {
            config,
            limiter,
            client,
        }
    }
}
