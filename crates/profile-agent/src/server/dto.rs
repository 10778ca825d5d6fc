//! JSON bodies exchanged between the proxy client and server
//!
//! Field names follow the established wire format (`companyQuery`,
//! `isWebSearchEnabled`, `companyContext`), so fields are renamed
//! individually instead of with `rename_all`.

use crate::model::Citation;
use agent_llm::Candidate;
use serde::{Deserialize, Serialize};

/// POST /api/generate-company request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateCompanyRequest {
    #[serde(rename = "companyQuery", default)]
    pub company_query: Option<String>,
}

/// POST /api/generate-company response
///
/// `text` and `candidates` are the raw model output; the client does all
/// parsing and citation checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateCompanyResponse {
    pub ok: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Chat options as sent on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatOptionsBody {
    #[serde(rename = "isWebSearchEnabled", default)]
    pub is_web_search_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// POST /api/chat request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub options: Option<ChatOptionsBody>,
    #[serde(
        rename = "companyContext",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub company_context: Option<String>,
}

/// POST /api/chat response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    pub ok: bool,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Citation>>,
}

/// Failure envelope shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub ok: bool,
    pub error: String,
}

/// GET /health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
