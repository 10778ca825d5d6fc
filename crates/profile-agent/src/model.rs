//! Company profile data model
//!
//! The model's JSON is loose: the same field may arrive as a string or a
//! number, nested sections may be missing, and trend series may be `null`.
//! Everything is decoded at the parse boundary into these typed records,
//! with `"N/A"` standing in for anything unknown.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};

/// Sentinel for a value the model could not find
pub const NOT_AVAILABLE: &str = "N/A";

/// Title used for a web citation that came without one
pub const UNTITLED_SOURCE: &str = "Untitled Source";

/// A scalar leaf supplied by the model
///
/// Text keeps unit suffixes ("96.8B USD", "+1.2%"); numbers stay numbers so
/// the record serializes back to the shape it was read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    /// The `"N/A"` sentinel
    pub fn unknown() -> Self {
        Self::Text(NOT_AVAILABLE.to_string())
    }

    /// Text scalar
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whether this is a numeric zero
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Number(n) => n.as_f64() == Some(0.0),
            Self::Text(_) => false,
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Self::unknown()
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
            Bool(bool),
            Nested(serde_json::Value),
        }

        // `false` and empty containers carry no data; other nested values
        // are kept as their JSON text.
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None | Some(Raw::Bool(false)) => Self::unknown(),
            Some(Raw::Text(text)) => Self::Text(text),
            Some(Raw::Number(n)) => Self::Number(n),
            Some(Raw::Bool(true)) => Self::text("true"),
            Some(Raw::Nested(value)) => match &value {
                serde_json::Value::Array(items) if items.is_empty() => Self::unknown(),
                serde_json::Value::Object(map) if map.is_empty() => Self::unknown(),
                _ => Self::Text(value.to_string()),
            },
        })
    }
}

/// Decode `null` as an empty list
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode `null` as an empty string
fn null_as_blank<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Market snapshot for a listed company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    #[serde(default)]
    pub price: Scalar,
    #[serde(default)]
    pub change: Scalar,
    #[serde(default)]
    pub change_percent: Scalar,
    #[serde(default)]
    pub market_cap: Scalar,
    #[serde(default)]
    pub chart_url: Scalar,
}

impl StockSnapshot {
    fn values(&self) -> [&Scalar; 5] {
        [
            &self.price,
            &self.change,
            &self.change_percent,
            &self.market_cap,
            &self.chart_url,
        ]
    }
}

/// Valuation ratios
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialRatios {
    #[serde(default)]
    pub pe_ratio: Scalar,
    #[serde(default)]
    pub eps: Scalar,
    #[serde(default)]
    pub roe: Scalar,
}

impl FinancialRatios {
    fn values(&self) -> [&Scalar; 3] {
        [&self.pe_ratio, &self.eps, &self.roe]
    }
}

/// One year of a trend series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    #[serde(default)]
    pub year: Scalar,
    #[serde(default)]
    pub value: Scalar,
}

impl TrendPoint {
    pub fn new(year: i64, value: &str) -> Self {
        Self {
            year: year.into(),
            value: value.into(),
        }
    }
}

/// Structured company profile
///
/// `last_updated` belongs to the caller: it is blank when a gateway returns
/// and is stamped by the orchestrator just before the record is stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(default, deserialize_with = "null_as_blank")]
    pub company_name: String,
    #[serde(default)]
    pub description: Scalar,
    #[serde(default)]
    pub sector: Scalar,
    #[serde(default)]
    pub industry: Scalar,
    #[serde(default)]
    pub founded_year: Scalar,
    #[serde(default)]
    pub employees: Scalar,
    #[serde(default)]
    pub revenue: Scalar,
    #[serde(default)]
    pub net_income: Scalar,
    #[serde(default)]
    pub cashflow: Scalar,
    #[serde(default)]
    pub debt: Scalar,
    #[serde(default)]
    pub growth_rate: Scalar,
    #[serde(default)]
    pub headquarters: Scalar,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_data: Option<StockSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_ratios: Option<FinancialRatios>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub revenue_trend: Vec<TrendPoint>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub net_income_trend: Vec<TrendPoint>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cashflow_trend: Vec<TrendPoint>,
    #[serde(default, deserialize_with = "null_as_blank")]
    pub last_updated: String,
}

impl CompanyRecord {
    /// A record with every field unknown
    pub fn unknown(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            ..Self::default()
        }
    }

    /// Every leaf that counts as researched data
    ///
    /// The company name only echoes the query and `last_updated` is ours,
    /// so neither is included. Trend years are labels; only their values
    /// are included.
    pub fn data_values(&self) -> Vec<&Scalar> {
        let mut values = vec![
            &self.description,
            &self.sector,
            &self.industry,
            &self.founded_year,
            &self.employees,
            &self.revenue,
            &self.net_income,
            &self.cashflow,
            &self.debt,
            &self.growth_rate,
            &self.headquarters,
        ];

        if let Some(stock) = &self.stock_data {
            values.extend(stock.values());
        }
        if let Some(ratios) = &self.financial_ratios {
            values.extend(ratios.values());
        }

        values.extend(
            self.revenue_trend
                .iter()
                .chain(&self.net_income_trend)
                .chain(&self.cashflow_trend)
                .map(|point| &point.value),
        );

        values
    }
}

/// A web source the model consulted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    pub title: String,
}

impl Citation {
    pub fn new(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: title.into(),
        }
    }
}

/// Remove repeated URIs, keeping the first occurrence and the original order
pub fn dedup_citations(citations: &[Citation]) -> Vec<Citation> {
    let mut seen = HashSet::new();
    citations
        .iter()
        .filter(|citation| seen.insert(citation.uri.as_str()))
        .cloned()
        .collect()
}

/// A researched profile with the model's reported steps and its sources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub company_data: CompanyRecord,
    #[serde(default)]
    pub agent_steps: Vec<String>,
    #[serde(default)]
    pub sources: Vec<Citation>,
}

/// Saved results keyed by lowercase company query
pub type Store = HashMap<String, AgentResult>;

/// Normalize a query into a store key
pub fn store_key(query: &str) -> String {
    query.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_accepts_mixed_types() {
        let record: CompanyRecord = serde_json::from_value(json!({
            "company_name": "Ford",
            "founded_year": 1903,
            "employees": "177,000",
            "debt": null,
            "growth_rate": true
        }))
        .unwrap();

        assert_eq!(record.founded_year, Scalar::from(1903));
        assert_eq!(record.employees, Scalar::from("177,000"));
        assert_eq!(record.debt, Scalar::unknown());
        assert_eq!(record.growth_rate, Scalar::from("true"));
        assert_eq!(record.sector, Scalar::unknown());
    }

    #[test]
    fn test_scalar_false_and_nested_values() {
        let record: CompanyRecord = serde_json::from_value(json!({
            "company_name": "Tesla",
            "growth_rate": false,
            "headquarters": {"city": "Austin"},
            "industry": [],
            "sector": {}
        }))
        .unwrap();

        assert_eq!(record.growth_rate, Scalar::unknown());
        assert_eq!(record.headquarters, Scalar::from(r#"{"city":"Austin"}"#));
        assert_eq!(record.industry, Scalar::unknown());
        assert_eq!(record.sector, Scalar::unknown());
    }

    #[test]
    fn test_scalar_serializes_back_to_original_shape() {
        let record: CompanyRecord = serde_json::from_value(json!({
            "company_name": "Ford",
            "founded_year": 1903,
            "revenue": "176B"
        }))
        .unwrap();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["founded_year"], json!(1903));
        assert_eq!(value["revenue"], json!("176B"));
        assert!(value.get("stock_data").is_none());
    }

    #[test]
    fn test_null_trend_is_empty() {
        let record: CompanyRecord = serde_json::from_value(json!({
            "company_name": "X",
            "revenue_trend": null,
            "cashflow_trend": [{ "year": 2023, "value": "1B" }]
        }))
        .unwrap();

        assert!(record.revenue_trend.is_empty());
        assert_eq!(record.cashflow_trend, vec![TrendPoint::new(2023, "1B")]);
    }

    #[test]
    fn test_data_values_skip_name_and_years() {
        let mut record = CompanyRecord::unknown("Tesla");
        record.stock_data = Some(StockSnapshot::default());
        record.financial_ratios = Some(FinancialRatios::default());
        record.revenue_trend = vec![TrendPoint::new(2023, "96B"), TrendPoint::new(2022, "81B")];

        let values = record.data_values();
        // 11 scalars + 5 stock + 3 ratios + 2 trend values
        assert_eq!(values.len(), 21);
        assert!(values.contains(&&Scalar::from("96B")));
        assert!(!values.contains(&&Scalar::from(2023)));
        assert!(!values.contains(&&Scalar::from("Tesla")));
    }

    #[test]
    fn test_scalar_predicates() {
        assert_eq!(Scalar::unknown(), Scalar::from(NOT_AVAILABLE));
        assert!(Scalar::from(0).is_zero());
        assert!(!Scalar::from(7).is_zero());
        assert_eq!(Scalar::from(42).to_string(), "42");
    }

    #[test]
    fn test_dedup_citations_keeps_first() {
        let citations = vec![
            Citation::new("https://a", "A"),
            Citation::new("https://b", "B"),
            Citation::new("https://a", "A again"),
        ];

        let deduped = dedup_citations(&citations);
        assert_eq!(
            deduped,
            vec![Citation::new("https://a", "A"), Citation::new("https://b", "B")]
        );
    }

    #[test]
    fn test_store_key() {
        assert_eq!(store_key("  Tesla Inc "), "tesla inc");
    }
}
