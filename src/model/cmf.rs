use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// A crash modification factor as supplied by the catalog.
///
/// Read-only input. Unknown JSON fields are ignored so that catalog
/// providers can add columns without breaking the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmfRecord {
    /// Required identity; a record without one is skipped by the pipeline.
    /// Numeric ids are accepted and kept in their decimal form.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Percentage reduction, in (-inf, 100]. Negative means crashes increase.
    #[serde(default)]
    pub crash_reduction_factor_pct: Option<f64>,

    /// Multiplicative CMF, used when no CRF is given
    #[serde(default)]
    pub cmf_multiplier: Option<f64>,

    /// Clearinghouse quality rating, 0-5
    #[serde(default)]
    pub star_rating: Option<f64>,

    #[serde(default)]
    pub publication_year: Option<i32>,

    #[serde(default)]
    pub standard_error_pct: Option<f64>,

    /// Crash types the countermeasure targets; empty applies broadly
    #[serde(default)]
    pub crash_types: BTreeSet<String>,

    #[serde(default)]
    pub is_proven_safety_countermeasure: bool,

    #[serde(default)]
    pub is_in_highway_safety_manual: bool,

    #[serde(default)]
    pub is_virginia_specific_study: bool,

    #[serde(default)]
    pub applicable_traffic_control: Option<BTreeSet<String>>,

    #[serde(default)]
    pub applicable_functional_class: Option<BTreeSet<String>>,

    #[serde(default)]
    pub applicable_intersection_geometry: Option<BTreeSet<String>>,

    #[serde(default)]
    pub min_lanes: Option<u32>,

    #[serde(default)]
    pub max_lanes: Option<u32>,

    #[serde(default)]
    pub study_link: Option<String>,

    /// Construction cost category, e.g. "Low", "$$", "Moderate"
    #[serde(default)]
    pub cost_category: Option<String>,

    /// Behavioral factors this countermeasure addresses, e.g. "speeding"
    #[serde(default)]
    pub behavioral_factors: Option<BTreeSet<String>>,

    /// Set by the assistive-search collaborator when it surfaced this record
    #[serde(default)]
    pub ai_recommended: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}

impl CmfRecord {
    /// Record identity, if present and not blank
    pub fn identity(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Crash reduction factor in percent, derived from the CMF multiplier
    /// when no CRF is given.
    pub fn resolved_crf(&self) -> Option<f64> {
        self.crash_reduction_factor_pct
            .or_else(|| self.cmf_multiplier.map(|cmf| (1.0 - cmf) * 100.0))
    }

    /// Check the numeric fields against their documented domains.
    /// Returns every violation, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(crf) = self.crash_reduction_factor_pct {
            if !crf.is_finite() || crf > 100.0 {
                errors.push(format!("crashReductionFactorPct: {} is outside (-inf, 100]", crf));
            }
        }

        if let Some(cmf) = self.cmf_multiplier {
            if !cmf.is_finite() || cmf < 0.0 {
                errors.push(format!("cmfMultiplier: {} must be a non-negative number", cmf));
            }
        }

        if let Some(stars) = self.star_rating {
            if !(0.0..=5.0).contains(&stars) {
                errors.push(format!("starRating: {} is outside 0-5", stars));
            }
        }

        if let Some(se) = self.standard_error_pct {
            if !se.is_finite() || se < 0.0 {
                errors.push(format!("standardErrorPct: {} must be non-negative", se));
            }
        }

        if let (Some(min), Some(max)) = (self.min_lanes, self.max_lanes) {
            if min > max {
                errors.push(format!("minLanes {} exceeds maxLanes {}", min, max));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
