//! Citation requirement for researched profiles

use crate::error::{ProfileError, Result};
use crate::model::{Citation, CompanyRecord, NOT_AVAILABLE, Scalar};
use serde::{Deserialize, Serialize};

/// Rules deciding when a profile must carry citations
///
/// A record with no meaningful data ("no data found") is trusted without
/// sources. Once at least `min_meaningful_values` leaves hold real data, at
/// least one citation is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationPolicy {
    /// Reject uncited data at all
    pub require_citations: bool,

    /// Count numeric zeros as real data
    pub zero_is_meaningful: bool,

    /// Text values treated as "unknown" (compared case-sensitively after trimming)
    pub placeholders: Vec<String>,

    /// Meaningful leaves needed before citations are required
    pub min_meaningful_values: usize,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            require_citations: true,
            zero_is_meaningful: false,
            placeholders: vec![NOT_AVAILABLE.to_string()],
            min_meaningful_values: 1,
        }
    }
}

impl VerificationPolicy {
    /// A policy that accepts everything
    pub fn permissive() -> Self {
        Self {
            require_citations: false,
            ..Self::default()
        }
    }

    /// Whether a single leaf counts as real data
    pub fn is_meaningful(&self, value: &Scalar) -> bool {
        match value {
            Scalar::Text(text) => {
                let text = text.trim();
                !text.is_empty()
                    && !self
                        .placeholders
                        .iter()
                        .any(|placeholder| placeholder == text)
            }
            Scalar::Number(_) => self.zero_is_meaningful || !value.is_zero(),
        }
    }

    /// Number of meaningful leaves in a record
    pub fn meaningful_count(&self, record: &CompanyRecord) -> usize {
        record
            .data_values()
            .into_iter()
            .filter(|value| self.is_meaningful(value))
            .count()
    }

    /// Whether the record holds enough data to need citations
    pub fn has_meaningful_data(&self, record: &CompanyRecord) -> bool {
        self.meaningful_count(record) >= self.min_meaningful_values.max(1)
    }

    /// Reject a record that carries data but no sources
    pub fn verify(&self, record: &CompanyRecord, sources: &[Citation]) -> Result<()> {
        if self.require_citations && sources.is_empty() && self.has_meaningful_data(record) {
            tracing::warn!(
                company = %record.company_name,
                meaningful = self.meaningful_count(record),
                "Model returned uncited data"
            );
            return Err(ProfileError::UnverifiedData);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StockSnapshot, TrendPoint};

    fn citation() -> Vec<Citation> {
        vec![Citation::new("https://ir.tesla.com", "Tesla IR")]
    }

    #[test]
    fn test_all_unknown_needs_no_sources() {
        let policy = VerificationPolicy::default();
        let mut record = CompanyRecord::unknown("Acme Nonexistent Corp");
        record.stock_data = Some(StockSnapshot::default());

        assert!(!policy.has_meaningful_data(&record));
        assert!(policy.verify(&record, &[]).is_ok());
    }

    #[test]
    fn test_company_name_alone_is_not_data() {
        let policy = VerificationPolicy::default();
        let record = CompanyRecord::unknown("Tesla");
        assert_eq!(policy.meaningful_count(&record), 0);
    }

    #[test]
    fn test_uncited_data_rejected() {
        let policy = VerificationPolicy::default();
        let mut record = CompanyRecord::unknown("Tesla");
        record.revenue = Scalar::from("96B");

        let err = policy.verify(&record, &[]).unwrap_err();
        assert!(matches!(err, ProfileError::UnverifiedData));
        assert!(policy.verify(&record, &citation()).is_ok());
    }

    #[test]
    fn test_trend_value_counts() {
        let policy = VerificationPolicy::default();
        let mut record = CompanyRecord::unknown("Tesla");
        record.cashflow_trend = vec![TrendPoint::new(2023, "13B")];

        assert!(policy.verify(&record, &[]).is_err());
    }

    #[test]
    fn test_zero_policy() {
        let mut record = CompanyRecord::unknown("Shell Co");
        record.debt = Scalar::from(0);

        let default = VerificationPolicy::default();
        assert!(default.verify(&record, &[]).is_ok());

        let strict = VerificationPolicy {
            zero_is_meaningful: true,
            ..VerificationPolicy::default()
        };
        assert!(strict.verify(&record, &[]).is_err());
    }

    #[test]
    fn test_placeholders_case_sensitive() {
        let policy = VerificationPolicy {
            placeholders: vec!["N/A".to_string(), "unknown".to_string()],
            ..VerificationPolicy::default()
        };
        assert!(!policy.is_meaningful(&Scalar::from(" N/A ")));
        assert!(!policy.is_meaningful(&Scalar::from("unknown")));
        assert!(!policy.is_meaningful(&Scalar::from("   ")));
        assert!(policy.is_meaningful(&Scalar::from("n/a")));
        assert!(policy.is_meaningful(&Scalar::from("Unknown")));
        assert!(policy.is_meaningful(&Scalar::from("Austin, TX")));
    }

    #[test]
    fn test_lowercase_placeholder_needs_sources() {
        let policy = VerificationPolicy::default();
        let mut record = CompanyRecord::unknown("X");
        record.revenue = Scalar::from("n/a");

        let err = policy.verify(&record, &[]).unwrap_err();
        assert!(matches!(err, ProfileError::UnverifiedData));
    }

    #[test]
    fn test_threshold_and_permissive() {
        let mut record = CompanyRecord::unknown("Tesla");
        record.sector = Scalar::from("Automotive");

        let lenient = VerificationPolicy {
            min_meaningful_values: 2,
            ..VerificationPolicy::default()
        };
        assert!(lenient.verify(&record, &[]).is_ok());

        record.industry = Scalar::from("EVs");
        assert!(lenient.verify(&record, &[]).is_err());

        assert!(VerificationPolicy::permissive().verify(&record, &[]).is_ok());
    }
}
