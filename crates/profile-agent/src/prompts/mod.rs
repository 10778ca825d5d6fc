//! Prompts sent to the model
//!
//! Both the in-process gateway and the proxy server build their requests
//! here, so a profile looks the same whichever path produced it.

mod chat;
mod profile;

pub use chat::{CHAT_PERSONA, build_chat_request, chat_contents, chat_system_instruction};
pub use profile::{build_profile_request, profile_prompt};
