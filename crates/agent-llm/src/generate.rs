//! Generate request and response types
//!
//! The response mirrors the shape generative search APIs return: a flat
//! `text` plus a list of candidates, each optionally carrying grounding
//! metadata. Field names serialize in camelCase so a proxy can forward a
//! response verbatim and a client can decode it with the same types.

use crate::Tool;
use serde::{Deserialize, Serialize};

/// Request for a single-turn generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (provider-specific)
    pub model: String,

    /// User prompt
    pub contents: String,

    /// Optional system instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,

    /// Tools the model may use
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,

    /// Token budget for extended reasoning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<u32>,
}

impl GenerateRequest {
    /// Create a builder for generate requests
    pub fn builder(model: impl Into<String>) -> GenerateRequestBuilder {
        GenerateRequestBuilder::new(model)
    }

    /// Whether the web-search tool is enabled
    pub fn uses_web_search(&self) -> bool {
        self.tools.iter().any(|tool| tool.is_web_search())
    }
}

/// Builder for GenerateRequest
#[derive(Debug)]
pub struct GenerateRequestBuilder {
    model: String,
    contents: String,
    system_instruction: Option<String>,
    tools: Vec<Tool>,
    thinking_budget: Option<u32>,
}

impl GenerateRequestBuilder {
    /// Create a new builder
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            contents: String::new(),
            system_instruction: None,
            tools: Vec::new(),
            thinking_budget: None,
        }
    }

    /// Set the user prompt
    pub fn contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = contents.into();
        self
    }

    /// Set the system instruction
    pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Enable a tool (duplicates are ignored)
    pub fn tool(mut self, tool: Tool) -> Self {
        if !self.tools.contains(&tool) {
            self.tools.push(tool);
        }
        self
    }

    /// Enable the web-search tool
    pub fn web_search(self) -> Self {
        self.tool(Tool::WebSearch)
    }

    /// Set the reasoning budget
    pub fn thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    /// Build the generate request
    pub fn build(self) -> GenerateRequest {
        GenerateRequest {
            model: self.model,
            contents: self.contents,
            system_instruction: self.system_instruction,
            tools: self.tools,
            thinking_budget: self.thinking_budget,
        }
    }
}

/// Response from a generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Concatenated text of the first candidate, if the model produced any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Candidates in provider order
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl GenerateResponse {
    /// Response text, or `None` if absent or whitespace only
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.trim().is_empty())
    }

    /// Grounding metadata of the first candidate
    pub fn grounding(&self) -> Option<&GroundingMetadata> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.grounding_metadata.as_ref())
    }
}

/// One generated candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Why generation stopped (provider-specific string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    /// Sources that informed this candidate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Citation information attached to a candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Retrieved chunks; only web chunks carry a URI
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,

    /// Queries the model issued to the search tool
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_search_queries: Vec<String>,
}

/// A retrieved chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    /// Present when the chunk came from web search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

/// A web page referenced by a grounding chunk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GroundingChunk {
    /// Build a web chunk
    pub fn web(uri: impl Into<String>, title: Option<&str>) -> Self {
        Self {
            web: Some(WebSource {
                uri: Some(uri.into()),
                title: title.map(str::to_string),
            }),
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Number of input tokens
    pub input_tokens: usize,

    /// Number of output tokens
    pub output_tokens: usize,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}
