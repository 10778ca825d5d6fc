//! Gemini provider implementation
//!
//! This module implements the LLMProvider trait against the Generative
//! Language REST API (`models/{model}:generateContent`). Web search maps to
//! the `googleSearch` tool and reasoning budgets to `thinkingConfig`.
//!
//! # Example
//!
//! ```no_run
//! use agent_llm::{GenerateRequest, LLMProvider};
//! use agent_llm::providers::GeminiProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GeminiProvider::new(std::env::var("GEMINI_API_KEY")?)?;
//!
//!     let request = GenerateRequest::builder("gemini-2.5-flash")
//!         .contents("Who founded Tesla?")
//!         .web_search()
//!         .build();
//!
//!     let response = provider.generate(request).await?;
//!     println!("{}", response.text.unwrap_or_default());
//!     Ok(())
//! }
//! ```

use crate::{
    Candidate, GenerateRequest, GenerateResponse, GroundingMetadata, LLMError, LLMProvider,
    Result, TokenUsage, Tool,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variables checked for the API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Configuration for the Gemini provider
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL (default: "https://generativelanguage.googleapis.com/v1beta")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set custom API base URL (proxies, regional endpoints, test servers)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Gemini provider
///
/// Supports Gemini 2.x models including:
/// - gemini-2.5-flash
/// - gemini-2.5-pro (extended thinking)
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "Gemini API key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new Gemini provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %request.model, web_search = request.uses_web_search()))]
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        debug!("Sending request to Gemini API at {}", self.config.api_base);

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base, request.model
        );
        let model = request.model.clone();
        let gemini_request = build_gemini_request(request);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await?;

        // Handle errors
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 | 403 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(model),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let response = parse_gemini_response(gemini_response);

        debug!(
            "Received response - candidates: {}, text: {} bytes, grounding chunks: {}",
            response.candidates.len(),
            response.text.as_deref().map_or(0, str::len),
            response
                .grounding()
                .map_or(0, |grounding| grounding.grounding_chunks.len())
        );

        Ok(response)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ============================================================================
// Gemini-specific request types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Set on reasoning summaries, which are not part of the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    google_search: EmptyObject,
}

#[derive(Debug, Serialize)]
struct EmptyObject {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

// ============================================================================
// Gemini-specific response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

// ============================================================================
// Conversion functions
// ============================================================================

fn text_content(role: Option<&str>, text: String) -> GeminiContent {
    GeminiContent {
        role: role.map(str::to_string),
        parts: vec![GeminiPart {
            text: Some(text),
            thought: None,
        }],
    }
}

/// Build the wire request from our generic format
fn build_gemini_request(request: GenerateRequest) -> GeminiRequest {
    let tools = request
        .tools
        .iter()
        .map(|tool| match tool {
            Tool::WebSearch => GeminiTool {
                google_search: EmptyObject {},
            },
        })
        .collect();

    let generation_config = request.thinking_budget.map(|thinking_budget| GenerationConfig {
        thinking_config: ThinkingConfig { thinking_budget },
    });

    GeminiRequest {
        contents: vec![text_content(Some("user"), request.contents)],
        system_instruction: request
            .system_instruction
            .map(|instruction| text_content(None, instruction)),
        tools,
        generation_config,
    }
}

/// Convert the wire response to our format
///
/// The text is the concatenation of the first candidate's non-thought
/// parts; an answer with no text parts yields `None`.
fn parse_gemini_response(response: GeminiResponse) -> GenerateResponse {
    let text = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter(|part| part.thought != Some(true))
                .filter_map(|part| part.text.as_deref())
                .collect::<String>()
        })
        .filter(|text| !text.is_empty());

    let usage = response.usage_metadata.map(|usage| TokenUsage {
        input_tokens: usage.prompt_token_count,
        output_tokens: usage.candidates_token_count,
    });

    let candidates = response
        .candidates
        .into_iter()
        .map(|candidate| Candidate {
            finish_reason: candidate.finish_reason,
            grounding_metadata: candidate.grounding_metadata,
        })
        .collect();

    GenerateResponse {
        text,
        candidates,
        usage,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.config().api_key, "test-key");
        assert_eq!(provider.config().api_base, DEFAULT_GEMINI_API_BASE);
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = GeminiProvider::new("  ");
        assert!(matches!(result, Err(LLMError::ConfigurationError(_))));
    }

    #[test]
    fn test_config_builder_trims_base() {
        let config = GeminiConfig::new("k")
            .with_api_base("http://localhost:9999/v1beta/")
            .with_timeout(5);
        assert_eq!(config.api_base, "http://localhost:9999/v1beta");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", GeminiConfig::new("super-secret"));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_request_with_search_and_thinking() {
        let request = GenerateRequest::builder("gemini-2.5-pro")
            .contents("What happened today?")
            .system_instruction("Be helpful")
            .web_search()
            .thinking_budget(32768)
            .build();

        let value = serde_json::to_value(build_gemini_request(request)).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "What happened today?" }] }],
                "systemInstruction": { "parts": [{ "text": "Be helpful" }] },
                "tools": [{ "googleSearch": {} }],
                "generationConfig": { "thinkingConfig": { "thinkingBudget": 32768 } }
            })
        );
    }

    #[test]
    fn test_plain_request_omits_optional_sections() {
        let request = GenerateRequest::builder("gemini-2.5-flash")
            .contents("Hi")
            .build();

        let value = serde_json::to_value(build_gemini_request(request)).unwrap();
        assert!(value.get("tools").is_none());
        assert!(value.get("systemInstruction").is_none());
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "thinking...", "thought": true },
                        { "text": "```json\n{\"a\":" },
                        { "text": "1}\n```" }
                    ]
                },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [{ "web": { "uri": "https://x.example", "title": "X" } }]
                }
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 30 }
        });

        let response = parse_gemini_response(serde_json::from_value(raw).unwrap());
        assert_eq!(response.text.as_deref(), Some("```json\n{\"a\":1}\n```"));
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.grounding().unwrap().grounding_chunks.len(), 1);
        assert_eq!(response.usage.unwrap().total(), 42);
    }

    #[test]
    fn test_response_without_candidates() {
        let response = parse_gemini_response(serde_json::from_value(json!({})).unwrap());
        assert!(response.text.is_none());
        assert!(response.candidates.is_empty());
        assert!(response.usage.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let config = GeminiConfig::new("k")
            .with_api_base("http://127.0.0.1:1/v1beta")
            .with_timeout(2);
        let provider = GeminiProvider::with_config(config).unwrap();

        let request = GenerateRequest::builder("gemini-2.5-flash")
            .contents("Hi")
            .build();
        let result = provider.generate(request).await;
        assert!(matches!(result, Err(LLMError::HttpError(_))));
    }
}
