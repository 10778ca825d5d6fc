//! Tools a model may be allowed to use during generation

use serde::{Deserialize, Serialize};

/// Built-in tool enabled for a generate request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Live web search; results come back as grounding metadata
    WebSearch,
}

impl Tool {
    /// Whether this tool produces web grounding
    pub fn is_web_search(self) -> bool {
        matches!(self, Self::WebSearch)
    }
}
