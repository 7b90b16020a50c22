use crate::model::Listing;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters for one match run. Unmatched listings are only kept when the
/// run was started with `keep_unmatched`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MatchReport {
    pub matched: usize,
    pub no_manufacturer: usize,
    pub no_product: usize,
    pub unmatched_manufacturer: Vec<Listing>,
    pub unmatched_product: Vec<Listing>,
}

impl MatchReport {
    pub fn total(&self) -> usize {
        self.matched + self.unmatched()
    }

    pub fn unmatched(&self) -> usize {
        self.no_manufacturer + self.no_product
    }

    pub fn merge(&mut self, other: MatchReport) {
        self.matched += other.matched;
        self.no_manufacturer += other.no_manufacturer;
        self.no_product += other.no_product;
        self.unmatched_manufacturer.extend(other.unmatched_manufacturer);
        self.unmatched_product.extend(other.unmatched_product);
    }

    /// Human-readable summary lines, printed in debug mode.
    pub fn summary(&self) -> Vec<String> {
        vec![
            format!("{} matches", self.matched),
            format!("{} listings didn't match any products", self.unmatched()),
            format!(
                "{} listings didn't even match a manufacturer",
                self.no_manufacturer
            ),
        ]
    }

    pub fn to_document(&self) -> ReportDocument<'_> {
        ReportDocument {
            generated_at: Utc::now(),
            matched: self.matched,
            no_manufacturer: self.no_manufacturer,
            no_product: self.no_product,
            unmatched_manufacturer: &self.unmatched_manufacturer,
            unmatched_product: &self.unmatched_product,
        }
    }
}

/// Serialized form of the diagnostics written by `--debug-report`.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub matched: usize,
    pub no_manufacturer: usize,
    pub no_product: usize,
    pub unmatched_manufacturer: &'a [Listing],
    pub unmatched_product: &'a [Listing],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_split_counts() {
        let report = MatchReport {
            matched: 7,
            no_manufacturer: 2,
            no_product: 3,
            ..Default::default()
        };
        assert_eq!(report.total(), 12);
        assert_eq!(
            report.summary(),
            vec![
                "7 matches".to_string(),
                "5 listings didn't match any products".to_string(),
                "2 listings didn't even match a manufacturer".to_string(),
            ]
        );
    }

    #[test]
    fn merge_adds_counts() {
        let mut a = MatchReport {
            matched: 1,
            no_product: 1,
            ..Default::default()
        };
        a.merge(MatchReport {
            matched: 2,
            no_manufacturer: 4,
            ..Default::default()
        });
        assert_eq!((a.matched, a.no_manufacturer, a.no_product), (3, 4, 1));
    }

    #[test]
    fn document_serializes_counts() {
        let report = MatchReport {
            matched: 1,
            ..Default::default()
        };
        let value = serde_json::to_value(report.to_document()).unwrap();
        assert_eq!(value["matched"], 1);
        assert!(value["generated_at"].is_string());
        assert_eq!(value["unmatched_product"], serde_json::json!([]));
    }
}
