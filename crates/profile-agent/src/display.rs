//! Terminal rendering for profiles, saved results and chat replies

use crate::gateway::ChatReply;
use crate::model::{AgentResult, Citation, CompanyRecord, Scalar, TrendPoint, dedup_citations};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use std::fmt::Write;

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Saved results as a numbered dashboard table
pub fn render_records(records: &[&AgentResult]) -> String {
    if records.is_empty() {
        return "No saved companies yet. Search for one to get started.".to_string();
    }

    let mut table = table();
    table.set_header(vec!["#", "Company", "Sector", "Revenue", "Last updated"]);
    for (index, record) in records.iter().enumerate() {
        let data = &record.company_data;
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&data.company_name),
            Cell::new(&data.sector),
            Cell::new(&data.revenue),
            Cell::new(&data.last_updated),
        ]);
    }
    table.to_string()
}

fn overview(data: &CompanyRecord) -> Table {
    let rows: [(&str, &Scalar); 11] = [
        ("Sector", &data.sector),
        ("Industry", &data.industry),
        ("Founded", &data.founded_year),
        ("Employees", &data.employees),
        ("Headquarters", &data.headquarters),
        ("Revenue", &data.revenue),
        ("Net income", &data.net_income),
        ("Cash flow", &data.cashflow),
        ("Debt", &data.debt),
        ("Growth rate", &data.growth_rate),
        ("Description", &data.description),
    ];

    let mut table = table();
    table.set_header(vec!["Field", "Value"]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }

    if let Some(stock) = &data.stock_data {
        table.add_row(vec![
            Cell::new("Stock"),
            Cell::new(format!(
                "{} ({} / {}), market cap {}",
                stock.price, stock.change, stock.change_percent, stock.market_cap
            )),
        ]);
    }
    if let Some(ratios) = &data.financial_ratios {
        table.add_row(vec![
            Cell::new("Ratios"),
            Cell::new(format!(
                "P/E {}, EPS {}, ROE {}",
                ratios.pe_ratio, ratios.eps, ratios.roe
            )),
        ]);
    }
    table
}

fn trends(data: &CompanyRecord) -> Option<Table> {
    let series: [(&str, &[TrendPoint]); 3] = [
        ("Revenue", &data.revenue_trend),
        ("Net income", &data.net_income_trend),
        ("Cash flow", &data.cashflow_trend),
    ];
    if series.iter().all(|(_, points)| points.is_empty()) {
        return None;
    }

    let mut table = table();
    table.set_header(vec!["Series", "Year", "Value"]);
    for (label, points) in series {
        for point in points {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(&point.year),
                Cell::new(&point.value),
            ]);
        }
    }
    Some(table)
}

fn citations(out: &mut String, sources: &[Citation]) {
    let sources = dedup_citations(sources);
    if sources.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nSources:");
    for (index, source) in sources.iter().enumerate() {
        let _ = writeln!(out, "  [{}] {} <{}>", index + 1, source.title, source.uri);
    }
}

/// Full profile view
pub fn render_profile(result: &AgentResult) -> String {
    let data = &result.company_data;
    let mut out = String::new();

    let _ = writeln!(out, "{}", data.company_name);
    if !data.last_updated.is_empty() {
        let _ = writeln!(out, "Last updated: {}", data.last_updated);
    }
    let _ = writeln!(out, "{}", overview(data));

    if let Some(trends) = trends(data) {
        let _ = writeln!(out, "\nTrends:\n{trends}");
    }

    if !result.agent_steps.is_empty() {
        let _ = writeln!(out, "\nAgent steps:");
        for step in &result.agent_steps {
            let _ = writeln!(out, "  - {step}");
        }
    }

    citations(&mut out, &result.sources);
    out
}

/// Assistant reply with its deduplicated sources
pub fn render_chat_reply(reply: &ChatReply) -> String {
    let mut out = format!("{}\n", reply.text);
    if let Some(sources) = &reply.sources {
        citations(&mut out, sources);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tesla() -> AgentResult {
        let mut company_data = CompanyRecord::unknown("Tesla");
        company_data.revenue = Scalar::from("96B");
        company_data.revenue_trend = vec![TrendPoint::new(2023, "96B")];
        AgentResult {
            company_data,
            agent_steps: vec!["Step 1: searched".to_string()],
            sources: vec![
                Citation::new("https://ir.tesla.com", "Tesla IR"),
                Citation::new("https://ir.tesla.com", "Tesla IR"),
            ],
        }
    }

    #[test]
    fn test_render_profile() {
        let out = render_profile(&tesla());
        assert!(out.starts_with("Tesla"));
        assert!(out.contains("96B"));
        assert!(out.contains("Trends:"));
        assert!(out.contains("Step 1: searched"));
        assert_eq!(out.matches("https://ir.tesla.com").count(), 1);
    }

    #[test]
    fn test_render_records() {
        assert!(render_records(&[]).contains("No saved companies"));

        let tesla = tesla();
        let out = render_records(&[&tesla]);
        assert!(out.contains("Tesla"));
        assert!(out.contains("96B"));
    }

    #[test]
    fn test_render_chat_reply() {
        let reply = ChatReply {
            text: "Hello.".to_string(),
            sources: Some(vec![
                Citation::new("https://a", "A"),
                Citation::new("https://a", "A"),
            ]),
        };
        let out = render_chat_reply(&reply);
        assert!(out.starts_with("Hello."));
        assert_eq!(out.matches("https://a").count(), 1);

        let plain = ChatReply {
            text: "Hi.".to_string(),
            sources: None,
        };
        assert_eq!(render_chat_reply(&plain), "Hi.\n");
    }
}
