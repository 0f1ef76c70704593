use serde::{Deserialize, Serialize};

/// Weights of every relevance contribution.
///
/// Each contribution is an independent, non-negative number of points; the
/// sum is clamped to `max_score` once, with no per-tier caps. Any field left
/// out of a YAML document keeps its default.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   proven_countermeasure: 50
///   virginia_study: 10
///   recency_horizon_years: 15
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringWeights {
    /// Ceiling applied to the summed score (default: 400)
    pub max_score: f64,

    /// Points for covering all typed crashes at the location, scaled by the
    /// matched share (default: 50)
    pub crash_type_coverage: f64,

    /// Bonus when a matched type is the location's most frequent type
    pub dominant_type_bonus: f64,

    /// Bonus when a matched type is among the three most frequent types
    pub top_type_bonus: f64,

    /// Flat credit for a CMF with no declared crash types when a profile exists
    pub broad_applicability: f64,

    /// Road intersection geometry listed by the CMF
    pub intersection_geometry: f64,

    /// Road lane range within the CMF's lane bounds
    pub lane_fit: f64,

    /// Points per star of the CMF's rating (0-5 stars)
    pub star_rating_multiplier: f64,

    /// Points for a study published this year, decaying linearly
    pub recency_max: f64,

    /// Study age in years at which recency reaches zero
    pub recency_horizon_years: f64,

    pub proven_countermeasure: f64,
    pub highway_safety_manual: f64,
    pub virginia_study: f64,
    pub traffic_control_match: f64,
    pub functional_class_match: f64,

    /// Flat part of the severity bonus
    pub severity_base: f64,

    /// Severity points scaled by the fatal plus serious-injury share
    pub severity_share: f64,

    /// Points for a behavioral factor present in 100% of crashes
    pub behavioral: f64,

    /// Cap on the summed behavioral points
    pub behavioral_cap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            max_score: 400.0,
            crash_type_coverage: 50.0,
            dominant_type_bonus: 20.0,
            top_type_bonus: 10.0,
            broad_applicability: 15.0,
            intersection_geometry: 15.0,
            lane_fit: 15.0,
            star_rating_multiplier: 5.0,
            recency_max: 15.0,
            recency_horizon_years: 20.0,
            proven_countermeasure: 40.0,
            highway_safety_manual: 15.0,
            virginia_study: 25.0,
            traffic_control_match: 20.0,
            functional_class_match: 15.0,
            severity_base: 15.0,
            severity_share: 15.0,
            behavioral: 30.0,
            behavioral_cap: 30.0,
        }
    }
}

impl ScoringWeights {
    /// Every weight with its YAML key, in declaration order
    pub fn named_weights(&self) -> [(&'static str, f64); 19] {
        [
            ("max_score", self.max_score),
            ("crash_type_coverage", self.crash_type_coverage),
            ("dominant_type_bonus", self.dominant_type_bonus),
            ("top_type_bonus", self.top_type_bonus),
            ("broad_applicability", self.broad_applicability),
            ("intersection_geometry", self.intersection_geometry),
            ("lane_fit", self.lane_fit),
            ("star_rating_multiplier", self.star_rating_multiplier),
            ("recency_max", self.recency_max),
            ("recency_horizon_years", self.recency_horizon_years),
            ("proven_countermeasure", self.proven_countermeasure),
            ("highway_safety_manual", self.highway_safety_manual),
            ("virginia_study", self.virginia_study),
            ("traffic_control_match", self.traffic_control_match),
            ("functional_class_match", self.functional_class_match),
            ("severity_base", self.severity_base),
            ("severity_share", self.severity_share),
            ("behavioral", self.behavioral),
            ("behavioral_cap", self.behavioral_cap),
        ]
    }
}
