use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::rate_limit::RateLimiter;

/// Shared application state injected into route handlers via Axum extractors.
/// Nothing here is per-request: each generation request builds its own
/// provider config, prompt, and documents on the stack.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: LlmClient,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            llm: LlmClient::new(),
            rate_limiter: Arc::new(RateLimiter::new()),
        }
    }
}
