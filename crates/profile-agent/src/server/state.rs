use crate::config::ProfileConfig;
use crate::error::Result;
use crate::gateway::provider_from_config;
use agent_llm::LLMProvider;
use std::sync::Arc;

/// Shared state for all handlers
pub struct AppState {
    /// `None` when no API key is configured; endpoints then answer 503
    pub provider: Option<Arc<dyn LLMProvider>>,
    pub config: ProfileConfig,
}

impl AppState {
    pub fn new(provider: Option<Arc<dyn LLMProvider>>, config: ProfileConfig) -> Arc<Self> {
        Arc::new(Self { provider, config })
    }

    /// Build state from configuration, starting unconfigured without a key
    pub fn from_config(config: ProfileConfig) -> Result<Arc<Self>> {
        let provider = if config.api_key.is_some() {
            Some(provider_from_config(&config)?)
        } else {
            tracing::warn!(
                "GEMINI_API_KEY is not set. Requests to the model API will fail."
            );
            None
        };

        Ok(Self::new(provider, config))
    }
}
