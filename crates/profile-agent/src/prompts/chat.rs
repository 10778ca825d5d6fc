use crate::config::ProfileConfig;
use crate::gateway::{ChatOptions, ReasoningTier};
use agent_llm::GenerateRequest;
use agent_prompt::PromptBuilder;

/// Assistant persona line
pub const CHAT_PERSONA: &str = "You are a helpful AI assistant specializing in business and financial topics. Your name is Profile Agent Assistant.";

const CONCISE: &str = "Answer questions clearly and concisely.";

const MARKDOWN: &str = "You can use Markdown for formatting your responses, such as using bolding with asterisks (*bold*) or bullet points with hyphens (-).";

const WEB_SEARCH: &str = "When asked for up-to-date information, news, or recent events, you MUST use the provided Google Search tool to find the most current and accurate answers. Base your responses on the search results.";

const EXTENDED_REASONING: &str = "You are now in Pro mode. Take your time to provide thorough, insightful, and well-reasoned answers, even for complex or abstract questions. Leverage your advanced reasoning capabilities.";

/// System instruction for a chat turn
pub fn chat_system_instruction(options: &ChatOptions) -> String {
    PromptBuilder::new()
        .text(CHAT_PERSONA)
        .text(CONCISE)
        .text(MARKDOWN)
        .when(options.web_search, WEB_SEARCH)
        .when(options.tier == ReasoningTier::Extended, EXTENDED_REASONING)
        .join_with("\n")
}

/// User content for a chat turn, prefixed with the company being viewed
pub fn chat_contents(message: &str, company_context: Option<&str>) -> String {
    match company_context.map(str::trim).filter(|ctx| !ctx.is_empty()) {
        Some(context) => format!(
            "Given the context that I am looking at a company profile for \"{context}\", answer the following question: {message}"
        ),
        None => message.to_string(),
    }
}

/// Generate request for one chat turn
///
/// The extended tier switches to the extended model and sets the reasoning
/// budget; web search enables the search tool.
pub fn build_chat_request(
    message: &str,
    company_context: Option<&str>,
    options: &ChatOptions,
    config: &ProfileConfig,
) -> GenerateRequest {
    let mut builder = match options.tier {
        ReasoningTier::Standard => GenerateRequest::builder(&config.model),
        ReasoningTier::Extended => GenerateRequest::builder(&config.extended_model)
            .thinking_budget(config.thinking_budget),
    }
    .contents(chat_contents(message, company_context))
    .system_instruction(chat_system_instruction(options));

    if options.web_search {
        builder = builder.web_search();
    }

    builder.build()
}
