//! Generative model abstraction layer for profile-agent
//!
//! This crate provides provider-agnostic types for single-turn generation
//! with an optional web-search tool. It includes:
//!
//! - Generate request/response types, including grounding metadata that
//!   records which web sources informed an answer
//! - Tool selection (web search)
//! - Provider trait for model implementations
//! - Concrete provider implementations (behind feature flags)

pub mod error;
pub mod generate;
pub mod provider;
pub mod tools;

// Re-export main types
pub use error::{LLMError, Result};
pub use generate::{
    Candidate, GenerateRequest, GenerateRequestBuilder, GenerateResponse, GroundingChunk,
    GroundingMetadata, TokenUsage, WebSource,
};
pub use provider::LLMProvider;
pub use tools::Tool;

// Provider implementations (feature-gated)
#[cfg(feature = "gemini")]
pub mod providers;
