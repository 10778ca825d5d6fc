//! Gateway calling the profile proxy server

use super::{ChatGateway, ChatOptions, ChatReply, ProfileGateway};
use crate::config::ProfileConfig;
use crate::error::{ProfileError, Result};
use crate::extract::interpret_profile_response;
use crate::model::AgentResult;
use crate::server::dto::{
    ChatOptionsBody, ChatRequest, ChatResponse, GenerateCompanyRequest, GenerateCompanyResponse,
};
use agent_llm::GenerateResponse;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

/// Gateway for deployments where the proxy holds the API key
#[derive(Debug, Clone)]
pub struct ProxyGateway {
    client: Client,
    config: ProfileConfig,
}

impl ProxyGateway {
    /// Create a gateway for `config.proxy_url`
    pub fn new(config: ProfileConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    /// POST a JSON body and decode a successful `ok: true` envelope
    ///
    /// A non-2xx status or `ok: false` becomes an error carrying the
    /// server's `error` text. 503 marks the server as unconfigured.
    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.config.proxy_endpoint(path);
        debug!(url = %url, "Calling proxy");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        let value: Value = serde_json::from_str(&text).map_err(|_| {
            ProfileError::TransportError(format!("Proxy error (status {})", status.as_u16()))
        })?;

        let ok = value.get("ok").and_then(Value::as_bool).unwrap_or(false);
        if !status.is_success() || !ok {
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .map_or_else(|| format!("Proxy error (status {})", status.as_u16()), str::to_string);

            return Err(if status == StatusCode::SERVICE_UNAVAILABLE {
                ProfileError::UnconfiguredService(message)
            } else {
                ProfileError::TransportError(message)
            });
        }

        serde_json::from_value(value)
            .map_err(|err| ProfileError::TransportError(format!("Unexpected proxy response: {err}")))
    }
}

#[async_trait]
impl ProfileGateway for ProxyGateway {
    #[instrument(skip(self), fields(proxy = %self.config.proxy_url))]
    async fn fetch_profile(&self, query: &str) -> Result<AgentResult> {
        let body = GenerateCompanyRequest {
            company_query: Some(query.to_string()),
        };
        let reply: GenerateCompanyResponse = self.post("/api/generate-company", &body).await?;

        let response = GenerateResponse {
            text: reply.text,
            candidates: reply.candidates,
            usage: None,
        };

        interpret_profile_response(&response, &self.config.verification)
    }
}

#[async_trait]
impl ChatGateway for ProxyGateway {
    #[instrument(skip(self, message), fields(web_search = options.web_search, tier = ?options.tier))]
    async fn send_message(
        &self,
        message: &str,
        options: ChatOptions,
        company_context: Option<&str>,
    ) -> Result<ChatReply> {
        let body = ChatRequest {
            message: Some(message.to_string()),
            options: Some(ChatOptionsBody {
                is_web_search_enabled: options.web_search,
                model: Some(options.tier.model_name(&self.config).to_string()),
            }),
            company_context: company_context.map(str::to_string),
        };
        let reply: ChatResponse = self.post("/api/chat", &body).await?;

        if reply.text.trim().is_empty() {
            return Err(ProfileError::EmptyResponse);
        }

        // Sources appear exactly when search was requested.
        let sources = if options.web_search {
            Some(reply.sources.unwrap_or_default())
        } else {
            None
        };

        Ok(ChatReply {
            text: reply.text,
            sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_err;

    fn unreachable_gateway() -> ProxyGateway {
        let config = ProfileConfig::builder()
            .proxy_url("http://127.0.0.1:1")
            .request_timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        ProxyGateway::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_transport_error() {
        let gateway = unreachable_gateway();

        let err = assert_err!(gateway.fetch_profile("Tesla").await);
        assert!(matches!(err, ProfileError::TransportError(_)));
        assert!(err.is_unreachable());

        let err = assert_err!(
            gateway
                .send_message("hi", ChatOptions::default(), None)
                .await
        );
        assert!(err.is_unreachable());
    }
}
