//! Fluent prompt builder
//!
//! [`PromptBuilder`] collects instruction pieces, some of them conditional,
//! and joins them at the end.

/// A fluent builder for constructing prompts
///
/// # Examples
///
/// ```
/// use agent_prompt::PromptBuilder;
///
/// let web_search = false;
/// let prompt = PromptBuilder::new()
///     .text("You are a helpful assistant.")
///     .when(web_search, "Use the search tool.")
///     .text("Answer concisely.")
///     .join_with("\n");
///
/// assert_eq!(prompt, "You are a helpful assistant.\nAnswer concisely.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    parts: Vec<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a piece of text
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.parts.push(content.into());
        self
    }

    /// Add content only when `condition` holds
    pub fn when(self, condition: bool, content: impl Into<String>) -> Self {
        if condition { self.text(content) } else { self }
    }

    /// Join the pieces with a separator
    pub fn join_with(self, separator: &str) -> String {
        self.parts.join(separator)
    }
}
