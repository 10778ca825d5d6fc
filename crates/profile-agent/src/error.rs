//! Error types for profile research operations

use thiserror::Error;

/// Which user-facing operation an error surfaced from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Company profile fetch
    FetchProfile,
    /// Assistant chat message
    Chat,
}

/// Profile research errors
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The model returned no text
    #[error("The model returned an empty response.")]
    EmptyResponse,

    /// The text was not valid JSON after fence-stripping, or had the wrong shape
    #[error("Could not process the data from the AI. The format was unexpected: {0}")]
    MalformedOutput(String),

    /// Required sections are missing from the model output
    #[error("The AI response is missing required fields ({0}).")]
    MissingFields(String),

    /// The model returned real data without citing any source
    #[error(
        "The AI agent provided data but failed to cite its sources. Please try the search again for reliable results."
    )]
    UnverifiedData,

    /// Network or HTTP failure, including model API errors
    #[error("{0}")]
    TransportError(String),

    /// Credentials or endpoint missing on the serving side
    #[error("Service is not configured: {0}")]
    UnconfiguredService(String),

    /// The query was rejected before any call was made
    #[error("{0}")]
    InvalidQuery(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Prompt template failed to render
    #[error("Prompt error: {0}")]
    Prompt(#[from] agent_prompt::PromptError),
}

/// Result type alias for profile operations
pub type Result<T> = std::result::Result<T, ProfileError>;

impl ProfileError {
    /// Message shown to the user for a failed operation
    pub fn user_message(&self, operation: Operation) -> String {
        match operation {
            Operation::FetchProfile => format!("Failed to fetch company data: {self}"),
            Operation::Chat => format!("Failed to get a response from the assistant: {self}"),
        }
    }

    /// Whether the failure happened before a usable model answer existed
    ///
    /// Transport and configuration failures qualify; validation failures
    /// of an actual answer do not.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::TransportError(_) | Self::UnconfiguredService(_))
    }
}

impl From<agent_llm::LLMError> for ProfileError {
    fn from(err: agent_llm::LLMError) -> Self {
        match err {
            agent_llm::LLMError::ConfigurationError(msg) => Self::UnconfiguredService(msg),
            other => Self::TransportError(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ProfileError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportError(err.to_string())
    }
}
