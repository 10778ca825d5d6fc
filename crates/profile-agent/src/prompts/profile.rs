use crate::error::Result;
use agent_llm::GenerateRequest;
use agent_prompt::JinjaTemplate;
use serde_json::json;

const PROFILE_TEMPLATE: &str = r#"
// ROLE
You are an automated web research bot.

// TASK
Your task is to use the `googleSearch` tool to find public information about the company: "{{ query }}". You must then structure this information into the required JSON format.

// CRITICAL, NON-NEGOTIABLE RULES
1.  **YOU MUST USE THE `googleSearch` TOOL.** All information in your response must be sourced directly from the web search results.
2.  **DO NOT USE PRE-EXISTING KNOWLEDGE.** Any response generated from your internal memory is a failure.
3.  **REPORT YOUR ACTUAL STEPS.** The "agent_steps" array must be a truthful log of the actions you took to generate the response.
4.  **HANDLE MISSING DATA.** If any piece of information cannot be found in the search results, you must use the string "N/A". This includes all fields in the stock_data and financial_ratios objects if the company is not publicly traded. For trend data, provide an empty array [] if no historical data is found.
5.  **PROVIDE 5-YEAR TRENDS.** For revenue, net_income, and cashflow, you must provide data for the last 5 years. The top-level fields (e.g., "revenue") should contain the value for the most recent year.
6.  **OUTPUT RAW JSON ONLY.** Your entire response must be only the JSON object, without any markdown formatting or other text.

// REQUIRED JSON OUTPUT FORMAT
{
  "company_data": {
    "company_name": "",
    "description": "A brief, one-paragraph summary of the company's business and mission.",
    "sector": "",
    "industry": "",
    "founded_year": "",
    "employees": "",
    "revenue": "The most recent year's revenue.",
    "net_income": "The most recent year's net income.",
    "cashflow": "The most recent year's operating cash flow.",
    "debt": "",
    "growth_rate": "",
    "headquarters": "",
    "stock_data": {
      "price": "Current stock price, as a string.",
      "change": "Today's price change as a string (e.g., '-1.25' or '+2.50').",
      "change_percent": "Today's percentage change as a string (e.g., '-0.5%' or '+1.2%').",
      "market_cap": "Company's market capitalization as a string.",
      "chart_url": "A direct URL to a stock chart (e.g., Google Finance, Yahoo Finance)."
    },
    "financial_ratios": {
      "pe_ratio": "Price-to-Earnings ratio as a string.",
      "eps": "Earnings Per Share as a string.",
      "roe": "Return on Equity as a string (e.g., '15.2%')."
    },
    "revenue_trend": [
      { "year": 2023, "value": "500B USD" },
      { "year": 2022, "value": "450B USD" }
    ],
    "net_income_trend": [
      { "year": 2023, "value": "100B USD" },
      { "year": 2022, "value": "90B USD" }
    ],
    "cashflow_trend": [
      { "year": 2023, "value": "120B USD" },
      { "year": 2022, "value": "110B USD" }
    ]
  },
  "agent_steps": [
    "Step 1: ...",
    "Step 2: ...",
    "Step 3: ..."
  ]
}
"#;

/// Research prompt for one company query
pub fn profile_prompt(query: &str) -> Result<String> {
    let template = JinjaTemplate::new("company_profile", PROFILE_TEMPLATE)?;
    Ok(template.render(&json!({ "query": query.trim() }))?)
}

/// Web-grounded profile request for `query`
pub fn build_profile_request(query: &str, model: &str) -> Result<GenerateRequest> {
    Ok(GenerateRequest::builder(model)
        .contents(profile_prompt(query)?)
        .web_search()
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_prompt_embeds_query() {
        let prompt = profile_prompt("  Tesla ").unwrap();
        assert!(prompt.contains(r#"find public information about the company: "Tesla"."#));
        assert!(prompt.contains("OUTPUT RAW JSON ONLY"));
        assert!(prompt.contains(r#""cashflow_trend": ["#));
    }

    #[test]
    fn test_profile_request_uses_web_search() {
        let request = build_profile_request("Tesla", "gemini-2.5-flash").unwrap();
        assert_eq!(request.model, "gemini-2.5-flash");
        assert!(request.uses_web_search());
        assert!(request.system_instruction.is_none());
        assert!(request.thinking_budget.is_none());
    }
}
