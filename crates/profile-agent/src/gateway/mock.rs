//! Offline stand-in profile for local development

use super::{ChatGateway, ChatOptions, ChatReply, ProfileGateway};
use crate::error::Result;
use crate::model::{AgentResult, CompanyRecord, FinancialRatios, Scalar, StockSnapshot};
use async_trait::async_trait;

/// Placeholder profile for `query` with no researched data
pub fn mock_result(query: &str) -> AgentResult {
    AgentResult {
        company_data: CompanyRecord {
            description: Scalar::text("Mock description for local visualization."),
            stock_data: Some(StockSnapshot {
                change: Scalar::text("0"),
                change_percent: Scalar::text("0%"),
                chart_url: Scalar::text(""),
                ..StockSnapshot::default()
            }),
            financial_ratios: Some(FinancialRatios::default()),
            ..CompanyRecord::unknown(query.trim())
        },
        agent_steps: vec!["Mock: no live data available".to_string()],
        sources: Vec::new(),
    }
}

/// Wraps a gateway and answers profile fetches with [`mock_result`] when the
/// backend cannot be reached
///
/// Validation failures of a real model answer are still returned as errors.
/// Chat is passed through unchanged.
#[derive(Debug)]
pub struct MockFallback<G> {
    inner: G,
}

impl<G> MockFallback<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<G: ProfileGateway> ProfileGateway for MockFallback<G> {
    async fn fetch_profile(&self, query: &str) -> Result<AgentResult> {
        match self.inner.fetch_profile(query).await {
            Err(err) if err.is_unreachable() => {
                tracing::warn!(
                    error = %err,
                    "Backend unreachable, returning mock profile for visualization"
                );
                Ok(mock_result(query))
            }
            other => other,
        }
    }
}

#[async_trait]
impl<G: ChatGateway> ChatGateway for MockFallback<G> {
    async fn send_message(
        &self,
        message: &str,
        options: ChatOptions,
        company_context: Option<&str>,
    ) -> Result<ChatReply> {
        self.inner
            .send_message(message, options, company_context)
            .await
    }
}
