//! LLM provider trait definition

use crate::{GenerateRequest, GenerateResponse, Result};
use async_trait::async_trait;

/// Trait for generative model providers
///
/// Implementations send one prompt (with optional system instruction, tools
/// and reasoning budget) and return the model's text together with the
/// grounding metadata of each candidate.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate content from the model
    ///
    /// # Arguments
    ///
    /// * `request` - The prompt, model and generation options
    ///
    /// # Returns
    ///
    /// The response text (if any) and per-candidate grounding metadata
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &'static str;
}
