//! Gateways to the model
//!
//! A gateway turns a company query into a validated [`AgentResult`] and a
//! chat message into a [`ChatReply`]. Two deployments exist:
//!
//! - [`DirectGateway`] calls the model API in-process and needs a key
//! - [`ProxyGateway`] calls the profile proxy server, which holds the key
//!
//! The implementation is chosen once at startup by [`build`]. Both apply
//! the same fence-stripping, parsing and citation rules.

mod direct;
mod mock;
mod proxy;

pub use direct::{DirectGateway, provider_from_config};
pub use mock::{MockFallback, mock_result};
pub use proxy::ProxyGateway;

use crate::config::{GatewayMode, ProfileConfig};
use crate::error::Result;
use crate::model::{AgentResult, Citation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reasoning depth for a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningTier {
    /// Fast model, no reasoning budget
    #[default]
    Standard,
    /// Larger model with an extended reasoning budget
    Extended,
}

impl ReasoningTier {
    /// Model name used for this tier
    pub fn model_name(self, config: &ProfileConfig) -> &str {
        match self {
            Self::Standard => &config.model,
            Self::Extended => &config.extended_model,
        }
    }

    /// Tier selected by a model name on the wire
    ///
    /// Only the configured extended model selects the extended tier.
    pub fn from_model_name(name: Option<&str>, config: &ProfileConfig) -> Self {
        match name {
            Some(name) if name.trim() == config.extended_model => Self::Extended,
            _ => Self::Standard,
        }
    }
}

/// Per-message chat options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChatOptions {
    /// Let the model search the web
    pub web_search: bool,
    /// Reasoning depth
    pub tier: ReasoningTier,
}

/// Assistant answer
///
/// `sources` is `Some` exactly when web search was enabled, and may then be
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Citation>>,
}

/// Fetches researched company profiles
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    /// Research one company
    ///
    /// The result has a blank `last_updated` and has already passed the
    /// citation check.
    async fn fetch_profile(&self, query: &str) -> Result<AgentResult>;
}

/// Sends chat messages to the assistant
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send one stateless chat message
    async fn send_message(
        &self,
        message: &str,
        options: ChatOptions,
        company_context: Option<&str>,
    ) -> Result<ChatReply>;
}

/// A gateway serving both profiles and chat
pub trait ResearchGateway: ProfileGateway + ChatGateway {}

impl<T: ProfileGateway + ChatGateway> ResearchGateway for T {}

#[async_trait]
impl<T: ProfileGateway + ?Sized> ProfileGateway for Arc<T> {
    async fn fetch_profile(&self, query: &str) -> Result<AgentResult> {
        (**self).fetch_profile(query).await
    }
}

#[async_trait]
impl<T: ChatGateway + ?Sized> ChatGateway for Arc<T> {
    async fn send_message(
        &self,
        message: &str,
        options: ChatOptions,
        company_context: Option<&str>,
    ) -> Result<ChatReply> {
        (**self).send_message(message, options, company_context).await
    }
}

/// Build the gateway selected by the configuration
pub fn build(config: &ProfileConfig) -> Result<Arc<dyn ResearchGateway>> {
    config.validate()?;

    tracing::info!(
        mode = %config.gateway_mode,
        fallback_to_mock = config.fallback_to_mock,
        "Building gateway"
    );

    let gateway: Arc<dyn ResearchGateway> = match config.gateway_mode {
        GatewayMode::Direct => Arc::new(DirectGateway::from_config(config)?),
        GatewayMode::Proxy => Arc::new(ProxyGateway::new(config.clone())?),
    };

    if config.fallback_to_mock {
        Ok(Arc::new(MockFallback::new(gateway)))
    } else {
        Ok(gateway)
    }
}
