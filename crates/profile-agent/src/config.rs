//! Configuration for profile research

use crate::error::{ProfileError, Result};
use crate::verify::VerificationPolicy;
use agent_utils::{env_flag, env_var, first_env_var};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub use agent_llm::providers::gemini::API_KEY_ENV_VARS;

/// How the agent reaches the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    /// Call the model API in-process (needs an API key)
    Direct,
    /// Call the profile proxy server, which holds the key
    #[default]
    Proxy,
}

impl FromStr for GatewayMode {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "proxy" => Ok(Self::Proxy),
            other => Err(ProfileError::ConfigError(format!(
                "unknown gateway mode '{other}' (expected 'direct' or 'proxy')"
            ))),
        }
    }
}

impl std::fmt::Display for GatewayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Proxy => f.write_str("proxy"),
        }
    }
}

/// Configuration for profile research operations
#[derive(Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Gateway used for profile fetches and chat
    pub gateway_mode: GatewayMode,

    /// Model API key (direct mode and server)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Model used for profiles and standard chat
    pub model: String,

    /// Model used for extended-reasoning chat
    pub extended_model: String,

    /// Reasoning budget for extended-reasoning chat
    pub thinking_budget: u32,

    /// Base URL of the proxy server
    pub proxy_url: String,

    /// JSON file the result store lives in
    pub store_path: PathBuf,

    /// Per-request timeout for model and proxy calls
    pub request_timeout: Duration,

    /// Substitute a mock profile when the backend is unreachable
    pub fallback_to_mock: bool,

    /// Citation requirement for profiles
    pub verification: VerificationPolicy,

    /// Port the proxy server listens on
    pub server_port: u16,
}

impl std::fmt::Debug for ProfileConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileConfig")
            .field("gateway_mode", &self.gateway_mode)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("extended_model", &self.extended_model)
            .field("thinking_budget", &self.thinking_budget)
            .field("proxy_url", &self.proxy_url)
            .field("store_path", &self.store_path)
            .field("request_timeout", &self.request_timeout)
            .field("fallback_to_mock", &self.fallback_to_mock)
            .field("verification", &self.verification)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            gateway_mode: GatewayMode::Proxy,
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            extended_model: "gemini-2.5-pro".to_string(),
            thinking_budget: 32_768,
            proxy_url: "http://localhost:4000".to_string(),
            store_path: PathBuf::from("ai_company_agent_db.json"),
            request_timeout: Duration::from_secs(120),
            fallback_to_mock: false,
            verification: VerificationPolicy::default(),
            server_port: 4000,
        }
    }
}

impl ProfileConfig {
    /// Create a new configuration builder
    pub fn builder() -> ProfileConfigBuilder {
        ProfileConfigBuilder::default()
    }

    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.gateway_mode == GatewayMode::Direct && self.api_key.is_none() {
            return Err(ProfileError::ConfigError(
                "GEMINI_API_KEY (or API_KEY) is required in direct gateway mode".to_string(),
            ));
        }

        if self.gateway_mode == GatewayMode::Proxy && self.proxy_url.trim().is_empty() {
            return Err(ProfileError::ConfigError(
                "proxy_url must be set in proxy gateway mode".to_string(),
            ));
        }

        if self.model.trim().is_empty() || self.extended_model.trim().is_empty() {
            return Err(ProfileError::ConfigError(
                "model names must not be empty".to_string(),
            ));
        }

        if self.verification.min_meaningful_values == 0 {
            return Err(ProfileError::ConfigError(
                "min_meaningful_values must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Proxy endpoint URL for a path such as `/api/chat`
    pub fn proxy_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.proxy_url.trim_end_matches('/'), path)
    }
}

/// Builder for ProfileConfig
#[derive(Debug, Default)]
pub struct ProfileConfigBuilder {
    gateway_mode: Option<GatewayMode>,
    api_key: Option<String>,
    model: Option<String>,
    extended_model: Option<String>,
    thinking_budget: Option<u32>,
    proxy_url: Option<String>,
    store_path: Option<PathBuf>,
    request_timeout: Option<Duration>,
    fallback_to_mock: Option<bool>,
    verification: Option<VerificationPolicy>,
    server_port: Option<u16>,
}

impl ProfileConfigBuilder {
    /// Set the gateway mode
    pub fn gateway_mode(mut self, mode: GatewayMode) -> Self {
        self.gateway_mode = Some(mode);
        self
    }

    /// Set the model API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the standard model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the extended-reasoning model
    pub fn extended_model(mut self, model: impl Into<String>) -> Self {
        self.extended_model = Some(model.into());
        self
    }

    /// Set the extended-reasoning budget
    pub fn thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    /// Set the proxy base URL
    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    /// Set the store file path
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Enable or disable the mock fallback
    pub fn fallback_to_mock(mut self, enabled: bool) -> Self {
        self.fallback_to_mock = Some(enabled);
        self
    }

    /// Set the citation policy
    pub fn verification(mut self, policy: VerificationPolicy) -> Self {
        self.verification = Some(policy);
        self
    }

    /// Set the proxy server port
    pub fn server_port(mut self, port: u16) -> Self {
        self.server_port = Some(port);
        self
    }

    /// Fill unset values from the environment
    pub fn with_env(mut self) -> Result<Self> {
        if self.gateway_mode.is_none() {
            self.gateway_mode = env_var("PROFILE_GATEWAY")
                .map(|mode| mode.parse())
                .transpose()?;
        }
        if self.api_key.is_none() {
            self.api_key = first_env_var(&API_KEY_ENV_VARS);
        }
        if self.model.is_none() {
            self.model = env_var("PROFILE_MODEL");
        }
        if self.extended_model.is_none() {
            self.extended_model = env_var("PROFILE_EXTENDED_MODEL");
        }
        if self.proxy_url.is_none() {
            self.proxy_url = env_var("PROFILE_PROXY_URL");
        }
        if self.store_path.is_none() {
            self.store_path = env_var("PROFILE_STORE_PATH").map(PathBuf::from);
        }
        if self.fallback_to_mock.is_none() {
            self.fallback_to_mock = env_flag("PROFILE_MOCK_FALLBACK");
        }
        if self.server_port.is_none() {
            self.server_port = env_var("PORT")
                .map(|port| {
                    port.parse().map_err(|_| {
                        ProfileError::ConfigError(format!(
                            "PORT must be a port number, got '{port}'"
                        ))
                    })
                })
                .transpose()?;
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<ProfileConfig> {
        let defaults = ProfileConfig::default();

        let config = ProfileConfig {
            gateway_mode: self.gateway_mode.unwrap_or(defaults.gateway_mode),
            api_key: self.api_key.filter(|key| !key.trim().is_empty()),
            model: self.model.unwrap_or(defaults.model),
            extended_model: self.extended_model.unwrap_or(defaults.extended_model),
            thinking_budget: self.thinking_budget.unwrap_or(defaults.thinking_budget),
            proxy_url: self.proxy_url.unwrap_or(defaults.proxy_url),
            store_path: self.store_path.unwrap_or(defaults.store_path),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            fallback_to_mock: self.fallback_to_mock.unwrap_or(defaults.fallback_to_mock),
            verification: self.verification.unwrap_or(defaults.verification),
            server_port: self.server_port.unwrap_or(defaults.server_port),
        };

        config.validate()?;
        Ok(config)
    }
}
