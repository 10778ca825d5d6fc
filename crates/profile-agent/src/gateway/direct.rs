//! In-process gateway calling the model API directly

use super::{ChatGateway, ChatOptions, ChatReply, ProfileGateway};
use crate::config::ProfileConfig;
use crate::error::{ProfileError, Result};
use crate::extract::{extract_citations, interpret_profile_response};
use crate::model::AgentResult;
use crate::prompts::{build_chat_request, build_profile_request};
use agent_llm::LLMProvider;
use agent_llm::providers::{GeminiConfig, GeminiProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Build the model provider described by the configuration
///
/// `GEMINI_API_BASE` overrides the API endpoint when set.
pub fn provider_from_config(config: &ProfileConfig) -> Result<Arc<dyn LLMProvider>> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        ProfileError::UnconfiguredService("GEMINI_API_KEY is not configured.".to_string())
    })?;

    let mut gemini = GeminiConfig::new(api_key).with_timeout(config.request_timeout.as_secs());
    if let Some(api_base) = agent_utils::env_var("GEMINI_API_BASE") {
        gemini = gemini.with_api_base(api_base);
    }

    Ok(Arc::new(GeminiProvider::with_config(gemini)?))
}

/// Gateway that owns a model provider
pub struct DirectGateway {
    provider: Arc<dyn LLMProvider>,
    config: ProfileConfig,
}

impl DirectGateway {
    /// Wrap an existing provider
    pub fn new(provider: Arc<dyn LLMProvider>, config: ProfileConfig) -> Self {
        Self { provider, config }
    }

    /// Build a Gemini-backed gateway from the configuration
    pub fn from_config(config: &ProfileConfig) -> Result<Self> {
        Ok(Self::new(provider_from_config(config)?, config.clone()))
    }
}

impl std::fmt::Debug for DirectGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProfileGateway for DirectGateway {
    #[instrument(skip(self), fields(model = %self.config.model))]
    async fn fetch_profile(&self, query: &str) -> Result<AgentResult> {
        let request = build_profile_request(query, &self.config.model)?;
        let response = self.provider.generate(request).await?;

        debug!(
            candidates = response.candidates.len(),
            "Received profile response"
        );

        interpret_profile_response(&response, &self.config.verification)
    }
}

#[async_trait]
impl ChatGateway for DirectGateway {
    #[instrument(skip(self, message), fields(web_search = options.web_search, tier = ?options.tier))]
    async fn send_message(
        &self,
        message: &str,
        options: ChatOptions,
        company_context: Option<&str>,
    ) -> Result<ChatReply> {
        let request = build_chat_request(message, company_context, &options, &self.config);
        let response = self.provider.generate(request).await?;

        let text = response
            .non_empty_text()
            .ok_or(ProfileError::EmptyResponse)?
            .to_string();

        let sources = options.web_search.then(|| extract_citations(&response));

        Ok(ChatReply { text, sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ReasoningTier;
    use crate::model::Scalar;
    use agent_llm::{
        Candidate, GenerateRequest, GenerateResponse, GroundingChunk, GroundingMetadata, LLMError,
    };
    use mockall::mock;
    use mockall::predicate::function;
    use tokio_test::{assert_err, assert_ok};

    mock! {
        Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn generate(&self, request: GenerateRequest) -> agent_llm::Result<GenerateResponse>;
            fn name(&self) -> &'static str;
        }
    }

    fn grounded(text: &str, uris: &[&str]) -> GenerateResponse {
        GenerateResponse {
            text: Some(text.to_string()),
            candidates: vec![Candidate {
                finish_reason: Some("STOP".to_string()),
                grounding_metadata: Some(GroundingMetadata {
                    grounding_chunks: uris
                        .iter()
                        .map(|uri| GroundingChunk::web(*uri, None))
                        .collect(),
                    web_search_queries: Vec::new(),
                }),
            }],
            usage: None,
        }
    }

    fn gateway(provider: MockProvider) -> DirectGateway {
        DirectGateway::new(Arc::new(provider), ProfileConfig::default())
    }

    #[tokio::test]
    async fn test_fetch_profile_tesla() {
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .with(function(|req: &GenerateRequest| {
                req.uses_web_search() && req.contents.contains("\"Tesla\"")
            }))
            .times(1)
            .returning(|_| {
                Ok(grounded(
                    "```json\n{\"company_data\": {\"company_name\": \"Tesla\", \"revenue\": \"96B\", \"last_updated\": \"2020\"}, \"agent_steps\": [\"Step 1: searched\"]}\n```",
                    &["https://ir.tesla.com"],
                ))
            });

        let result = assert_ok!(gateway(provider).fetch_profile("Tesla").await);
        assert_eq!(result.company_data.revenue, Scalar::from("96B"));
        assert_eq!(result.company_data.last_updated, "");
        assert_eq!(result.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_profile_uncited() {
        let mut provider = MockProvider::new();
        provider.expect_generate().returning(|_| {
            Ok(grounded(
                r#"{"company_data": {"company_name": "Tesla", "revenue": "96B"}, "agent_steps": []}"#,
                &[],
            ))
        });

        let err = assert_err!(gateway(provider).fetch_profile("Tesla").await);
        assert!(matches!(err, ProfileError::UnverifiedData));
    }

    #[tokio::test]
    async fn test_fetch_profile_provider_error() {
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .returning(|_| Err(LLMError::RateLimitExceeded("quota".to_string())));

        let err = assert_err!(gateway(provider).fetch_profile("Tesla").await);
        assert!(err.is_unreachable());
    }

    #[tokio::test]
    async fn test_send_message_without_search_has_no_sources() {
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .with(function(|req: &GenerateRequest| {
                !req.uses_web_search() && req.thinking_budget.is_none()
            }))
            .returning(|_| Ok(grounded("Elon Musk.", &["https://ignored"])));

        let reply = assert_ok!(
            gateway(provider)
                .send_message("Who is the CEO?", ChatOptions::default(), Some("Tesla"))
                .await
        );
        assert_eq!(reply.text, "Elon Musk.");
        assert_eq!(reply.sources, None);
    }

    #[tokio::test]
    async fn test_send_message_with_search_and_extended() {
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .with(function(|req: &GenerateRequest| {
                req.uses_web_search()
                    && req.model == "gemini-2.5-pro"
                    && req.thinking_budget == Some(32_768)
            }))
            .returning(|_| Ok(grounded("Deliveries rose.", &[])));

        let options = ChatOptions {
            web_search: true,
            tier: ReasoningTier::Extended,
        };
        let reply = assert_ok!(gateway(provider).send_message("News?", options, None).await);
        assert_eq!(reply.sources, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_send_message_empty_text() {
        let mut provider = MockProvider::new();
        provider
            .expect_generate()
            .returning(|_| Ok(GenerateResponse::default()));

        let err = assert_err!(
            gateway(provider)
                .send_message("hi", ChatOptions::default(), None)
                .await
        );
        assert!(matches!(err, ProfileError::EmptyResponse));
    }

    #[test]
    fn test_provider_requires_key() {
        let Err(err) = provider_from_config(&ProfileConfig::default()) else {
            panic!("expected an error without an API key");
        };
        assert!(matches!(err, ProfileError::UnconfiguredService(_)));
    }
}
