use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::dto::{
    ChatRequest, ChatResponse, GenerateCompanyRequest, GenerateCompanyResponse, HealthResponse,
};
use super::error::ApiError;
use super::state::AppState;
use crate::error::ProfileError;
use crate::extract::extract_citations;
use crate::gateway::{ChatOptions, ReasoningTier};
use crate::prompts::{build_chat_request, build_profile_request};
use agent_llm::LLMProvider;

const NOT_CONFIGURED: &str = "GEMINI_API_KEY is not configured on the server.";

fn provider(state: &AppState) -> Result<&Arc<dyn LLMProvider>, ApiError> {
    state
        .provider
        .as_ref()
        .ok_or_else(|| ApiError::Unconfigured(NOT_CONFIGURED.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /api/generate-company - Raw grounded profile output for a query
pub async fn generate_company(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerateCompanyRequest>, JsonRejection>,
) -> Result<Json<GenerateCompanyResponse>, ApiError> {
    let request = body.map(|Json(req)| req).unwrap_or_default();
    let query = non_blank(request.company_query).ok_or_else(|| {
        ApiError::BadRequest("companyQuery is required in the request body".into())
    })?;

    let provider = provider(&state)?;

    tracing::info!(query = %query, "Generating company profile");
    let generate = build_profile_request(&query, &state.config.model)?;
    let response = provider.generate(generate).await?;

    Ok(Json(GenerateCompanyResponse {
        ok: true,
        text: response.text,
        candidates: response.candidates,
    }))
}

/// POST /api/chat - One stateless assistant turn
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = body.map(|Json(req)| req).unwrap_or_default();
    let message = non_blank(request.message)
        .ok_or_else(|| ApiError::BadRequest("message is required in the request body".into()))?;

    let provider = provider(&state)?;

    let wire_options = request.options.unwrap_or_default();
    let options = ChatOptions {
        web_search: wire_options.is_web_search_enabled,
        tier: ReasoningTier::from_model_name(wire_options.model.as_deref(), &state.config),
    };

    tracing::info!(
        web_search = options.web_search,
        tier = ?options.tier,
        "Chat request"
    );

    let generate = build_chat_request(
        &message,
        request.company_context.as_deref(),
        &options,
        &state.config,
    );
    let response = provider.generate(generate).await?;

    let text = response
        .non_empty_text()
        .ok_or(ProfileError::EmptyResponse)?
        .to_string();
    let sources = options.web_search.then(|| extract_citations(&response));

    Ok(Json(ChatResponse {
        ok: true,
        text,
        sources,
    }))
}

/// GET /health - Health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
