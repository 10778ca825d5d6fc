//! Prompt templates for profile-agent
//!
//! Two tools live here:
//!
//! - [`JinjaTemplate`]: a named MiniJinja template, validated when it is
//!   created and rendered with JSON variables
//! - [`PromptBuilder`]: a fluent builder for instructions assembled from
//!   conditional pieces
//!
//! # Quick Start
//!
//! ```
//! use agent_prompt::{JinjaTemplate, PromptBuilder};
//! use serde_json::json;
//!
//! let template = JinjaTemplate::new("greeting", "Research \"{{ company }}\".").unwrap();
//! let prompt = template.render(&json!({ "company": "Tesla" })).unwrap();
//! assert_eq!(prompt, "Research \"Tesla\".");
//!
//! let instruction = PromptBuilder::new()
//!     .text("You are a helpful assistant.")
//!     .when(true, "Use the search tool.")
//!     .join_with("\n");
//! assert_eq!(instruction, "You are a helpful assistant.\nUse the search tool.");
//! ```

mod builder;
mod error;
mod jinja;

pub use builder::PromptBuilder;
pub use error::{PromptError, Result};
pub use jinja::JinjaTemplate;
