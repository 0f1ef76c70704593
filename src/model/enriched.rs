use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::cmf::CmfRecord;

/// Coarse construction-cost tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CostTier {
    Low,
    Medium,
    High,
}

/// Confidence band derived from a CMF's standard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    Low,
    Medium,
    High,
}

impl fmt::Display for CostTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostTier::Low => write!(f, "Low"),
            CostTier::Medium => write!(f, "Medium"),
            CostTier::High => write!(f, "High"),
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLabel::Low => write!(f, "Low"),
            ConfidenceLabel::Medium => write!(f, "Medium"),
            ConfidenceLabel::High => write!(f, "High"),
        }
    }
}

/// One human-readable justification, shown as `icon text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub icon: String,
    pub text: String,
}

impl Reason {
    pub fn new(icon: &str, text: impl Into<String>) -> Self {
        Self {
            icon: icon.to_string(),
            text: text.into(),
        }
    }
}

/// A catalog record plus everything the engine derived for one location.
///
/// Serializes as the original record's fields followed by the enrichment
/// fields. Absent values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCmfRecord {
    #[serde(flatten)]
    pub record: CmfRecord,
    pub expected_reduction_per_year: Option<f64>,
    pub relevance_score: u32,
    pub relevance_reasons: Vec<Reason>,
    pub matching_crash_types: BTreeSet<String>,
    pub cost_tier: Option<CostTier>,
    pub confidence_label: Option<ConfidenceLabel>,
}

impl EnrichedCmfRecord {
    /// Defensive defaults for a record that could not be scored: score 0,
    /// no reasons, every derived value absent.
    pub fn defaulted(record: CmfRecord) -> Self {
        Self {
            record,
            expected_reduction_per_year: None,
            relevance_score: 0,
            relevance_reasons: Vec::new(),
            matching_crash_types: BTreeSet::new(),
            cost_tier: None,
            confidence_label: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_values_serialize_as_null() {
        let record = CmfRecord {
            id: Some("cmf-1".to_string()),
            ..Default::default()
        };
        let enriched = EnrichedCmfRecord::defaulted(record);
        let json = serde_json::to_value(&enriched).unwrap();

        assert_eq!(json["id"], "cmf-1");
        assert!(json["expectedReductionPerYear"].is_null());
        assert!(json["costTier"].is_null());
        assert!(json["confidenceLabel"].is_null());
        assert_eq!(json["relevanceScore"], 0);
        assert_eq!(json["relevanceReasons"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_enriched_is_superset_of_record_fields() {
        let record = CmfRecord {
            id: Some("cmf-2".to_string()),
            description: "Add retroreflective backplates".to_string(),
            star_rating: Some(4.0),
            ..Default::default()
        };
        let record_json = serde_json::to_value(&record).unwrap();
        let enriched_json = serde_json::to_value(EnrichedCmfRecord::defaulted(record)).unwrap();

        for (key, value) in record_json.as_object().unwrap() {
            assert_eq!(&enriched_json[key], value, "field {} changed", key);
        }
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(serde_json::to_value(CostTier::Medium).unwrap(), "Medium");
        assert_eq!(ConfidenceLabel::High.to_string(), "High");
    }
}
