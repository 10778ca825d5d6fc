//! Turning raw model output into typed results
//!
//! The model is asked for raw JSON but regularly wraps it in a ```json fence.
//! Sources come from the grounding metadata, never from the text itself.

use crate::error::{ProfileError, Result};
use crate::model::{AgentResult, Citation, CompanyRecord, UNTITLED_SOURCE};
use crate::verify::VerificationPolicy;
use agent_llm::GenerateResponse;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static OPENING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^```(?:json)?\s*")
        .unwrap_or_else(|err| unreachable!("invalid fence pattern: {err}"))
});

static CLOSING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*```$").unwrap_or_else(|err| unreachable!("invalid fence pattern: {err}"))
});

/// Remove a leading ```json (or bare ```) fence and a trailing ``` fence
///
/// Each side is stripped independently; text without fences is only trimmed.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let opened = OPENING_FENCE.replace(trimmed, "");
    CLOSING_FENCE.replace(&opened, "").into_owned()
}

/// Parse fence-stripped model text into company data and steps
///
/// The returned record always has an empty `last_updated`; sources are left
/// empty for the caller to attach.
pub fn parse_agent_output(text: &str) -> Result<AgentResult> {
    let cleaned = strip_code_fence(text);

    let mut value: Value = serde_json::from_str(&cleaned).map_err(|err| {
        tracing::error!(error = %err, raw = %text, "Failed to parse JSON response from model");
        ProfileError::MalformedOutput(err.to_string())
    })?;

    let Some(object) = value.as_object_mut() else {
        return Err(ProfileError::MalformedOutput(
            "expected a JSON object".to_string(),
        ));
    };

    let company_data = object.remove("company_data").filter(|v| !v.is_null());
    let agent_steps = object.remove("agent_steps").filter(|v| !v.is_null());

    let (company_data, agent_steps) = match (company_data, agent_steps) {
        (Some(data), Some(steps)) => (data, steps),
        (data, steps) => {
            let missing: Vec<&str> = [
                data.is_none().then_some("company_data"),
                steps.is_none().then_some("agent_steps"),
            ]
            .into_iter()
            .flatten()
            .collect();
            return Err(ProfileError::MissingFields(missing.join(" and ")));
        }
    };

    let mut company_data: CompanyRecord = serde_json::from_value(company_data)
        .map_err(|err| ProfileError::MalformedOutput(format!("company_data: {err}")))?;
    let agent_steps: Vec<String> = serde_json::from_value(agent_steps)
        .map_err(|err| ProfileError::MalformedOutput(format!("agent_steps: {err}")))?;

    company_data.last_updated.clear();

    Ok(AgentResult {
        company_data,
        agent_steps,
        sources: Vec::new(),
    })
}

/// Collect web citations from the first candidate's grounding metadata
///
/// Non-web chunks and web chunks without a URI are skipped. Order is
/// preserved and duplicates are kept.
pub fn extract_citations(response: &GenerateResponse) -> Vec<Citation> {
    let Some(grounding) = response.grounding() else {
        return Vec::new();
    };

    grounding
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.as_deref().filter(|uri| !uri.trim().is_empty())?;
            let title = web
                .title
                .as_deref()
                .filter(|title| !title.trim().is_empty())
                .unwrap_or(UNTITLED_SOURCE);
            Some(Citation::new(uri, title))
        })
        .collect()
}

/// Validate a full profile response: text, shape, sources and citation rule
pub fn interpret_profile_response(
    response: &GenerateResponse,
    policy: &VerificationPolicy,
) -> Result<AgentResult> {
    let text = response.non_empty_text().ok_or(ProfileError::EmptyResponse)?;

    let mut result = parse_agent_output(text)?;
    result.sources = extract_citations(response);

    policy.verify(&result.company_data, &result.sources)?;

    tracing::debug!(
        company = %result.company_data.company_name,
        steps = result.agent_steps.len(),
        sources = result.sources.len(),
        "Profile response accepted"
    );

    Ok(result)
}
