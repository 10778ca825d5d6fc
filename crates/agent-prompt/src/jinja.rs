//! MiniJinja-based template implementation

use crate::{PromptError, Result};
use minijinja::Environment;

/// A named prompt template backed by MiniJinja
///
/// The source is checked when the template is created, so a template that
/// exists can always be rendered unless a filter fails at render time.
///
/// # Template Syntax
///
/// Standard Jinja2 syntax:
/// - Variables: `{{ variable }}`
/// - Filters: `{{ name | upper }}`
/// - Conditionals: `{% if condition %}...{% endif %}`
///
/// Single braces pass through untouched, which keeps JSON examples inside
/// a template readable.
#[derive(Clone)]
pub struct JinjaTemplate {
    name: String,
    source: String,
}

impl JinjaTemplate {
    /// Create a template, failing if the source does not parse
    ///
    /// # Examples
    ///
    /// ```
    /// use agent_prompt::JinjaTemplate;
    ///
    /// assert!(JinjaTemplate::new("ok", "Hello, {{ name }}!").is_ok());
    /// assert!(JinjaTemplate::new("broken", "Hello, {{ name").is_err());
    /// ```
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();

        Environment::new()
            .render_str(&source, ())
            .map_err(|e| PromptError::TemplateParseFailed {
                name: name.clone(),
                detail: e.to_string(),
            })?;

        Ok(Self { name, source })
    }

    /// Template identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw template source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the template with JSON variables
    pub fn render(&self, vars: &serde_json::Value) -> Result<String> {
        let mut env = Environment::new();
        env.add_filter("upper", |s: String| s.to_uppercase());
        env.add_filter("lower", |s: String| s.to_lowercase());
        env.add_filter("trim", |s: String| s.trim().to_string());

        let value = minijinja::value::Value::from_serialize(vars);

        env.render_str(&self.source, value)
            .map_err(|e| PromptError::RenderError {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .field("len", &self.source.len())
            .finish()
    }
}
