use std::collections::BTreeSet;

use super::config::ScoringWeights;
use crate::matching::{addresses_factor, contains_normalized, normalize_label, targets_severe_crashes};
use crate::model::{CmfRecord, CrashProfile, RoadProperties};

/// Everything a contribution may look at. Built once per record.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub cmf: &'a CmfRecord,
    pub profile: Option<&'a CrashProfile>,
    pub road: Option<&'a RoadProperties>,
    /// Crash-type match for this CMF and profile
    pub matching: &'a BTreeSet<String>,
    /// Injected so recency never reads a clock
    pub current_year: i32,
}

/// A pure scoring rule: non-negative points for one aspect of relevance.
pub type ContributionFn = fn(&ScoringContext<'_>, &ScoringWeights) -> f64;

/// A named scoring rule
#[derive(Clone, Copy)]
pub struct Contribution {
    pub label: &'static str,
    pub apply: ContributionFn,
}

/// Scoring rules in evaluation order. New rules are added here without
/// touching existing ones.
pub const CONTRIBUTIONS: &[Contribution] = &[
    Contribution { label: "Crash type match", apply: crash_type_match },
    Contribution { label: "Location type match", apply: location_type_match },
    Contribution { label: "Star rating", apply: star_rating },
    Contribution { label: "Recency", apply: recency },
    Contribution { label: "Proven safety countermeasure", apply: proven_countermeasure },
    Contribution { label: "Highway Safety Manual", apply: highway_safety_manual },
    Contribution { label: "Virginia study", apply: virginia_study },
    Contribution { label: "Traffic control match", apply: traffic_control },
    Contribution { label: "Functional class match", apply: functional_class },
    Contribution { label: "Severity match", apply: severity_match },
    Contribution { label: "Behavioral match", apply: behavioral_match },
];

pub fn crash_type_match(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> f64 {
    let Some(profile) = ctx.profile else {
        return 0.0;
    };
    // Broadly applicable CMFs are not penalized for having nothing to match
    if ctx.cmf.crash_types.is_empty() {
        return weights.broad_applicability;
    }
    if ctx.matching.is_empty() {
        return 0.0;
    }

    let matched: BTreeSet<String> = ctx.matching.iter().map(|t| normalize_label(t)).collect();
    let counts = profile.normalized_counts();
    let matched_crashes = matched
        .iter()
        .filter_map(|t| counts.get(t))
        .fold(0u64, |acc, count| acc.saturating_add(*count));
    let typed_total = profile.typed_total();
    let share = if typed_total > 0 {
        (matched_crashes as f64 / typed_total as f64).min(1.0)
    } else {
        0.0
    };

    let dominant = profile.dominant_types(3);
    let dominance = if dominant.first().is_some_and(|t| matched.contains(t)) {
        weights.dominant_type_bonus
    } else if dominant.iter().any(|t| matched.contains(t)) {
        weights.top_type_bonus
    } else {
        0.0
    };

    weights.crash_type_coverage * share + dominance
}

pub fn location_type_match(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> f64 {
    let Some(road) = ctx.road else {
        return 0.0;
    };
    let mut points = 0.0;
    if geometry_matches(ctx.cmf, road) {
        points += weights.intersection_geometry;
    }
    if lanes_fit(ctx.cmf, road) {
        points += weights.lane_fit;
    }
    points
}

pub fn star_rating(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> f64 {
    match ctx.cmf.star_rating {
        Some(stars) if stars.is_finite() => stars.clamp(0.0, 5.0) * weights.star_rating_multiplier,
        _ => 0.0,
    }
}

pub fn recency(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> f64 {
    let Some(year) = ctx.cmf.publication_year else {
        return 0.0;
    };
    if weights.recency_horizon_years <= 0.0 {
        return 0.0;
    }
    // Publication years in the future count as this year
    let age = f64::from(ctx.current_year.saturating_sub(year).max(0));
    weights.recency_max * (1.0 - age / weights.recency_horizon_years).max(0.0)
}

pub fn proven_countermeasure(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> f64 {
    flag(ctx.cmf.is_proven_safety_countermeasure, weights.proven_countermeasure)
}

pub fn highway_safety_manual(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> f64 {
    flag(ctx.cmf.is_in_highway_safety_manual, weights.highway_safety_manual)
}

pub fn virginia_study(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> f64 {
    flag(ctx.cmf.is_virginia_specific_study, weights.virginia_study)
}

pub fn traffic_control(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> f64 {
    let matched = ctx.road.is_some_and(|road| traffic_control_matches(ctx.cmf, road));
    flag(matched, weights.traffic_control_match)
}

pub fn functional_class(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> f64 {
    let matched = ctx.road.is_some_and(|road| functional_class_matches(ctx.cmf, road));
    flag(matched, weights.functional_class_match)
}

pub fn severity_match(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> f64 {
    let Some(profile) = ctx.profile else {
        return 0.0;
    };
    let severe = profile.fatal_and_serious();
    if severe == 0 || !targets_severe_crashes(ctx.cmf) {
        return 0.0;
    }

    // Severity counts larger than the crash total are read as "all severe"
    let share = if profile.total_crashes > 0 {
        (severe as f64 / profile.total_crashes as f64).min(1.0)
    } else {
        1.0
    };
    weights.severity_base + weights.severity_share * share
}

pub fn behavioral_match(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> f64 {
    let Some(profile) = ctx.profile else {
        return 0.0;
    };
    let points: f64 = profile
        .behavioral_factors()
        .iter()
        .filter(|(factor, _)| addresses_factor(ctx.cmf, factor))
        .map(|(_, pct)| weights.behavioral * pct / 100.0)
        .sum();
    points.min(weights.behavioral_cap)
}

fn flag(set: bool, points: f64) -> f64 {
    if set {
        points
    } else {
        0.0
    }
}

/// Road traffic control listed in the CMF's applicable traffic controls
pub fn traffic_control_matches(cmf: &CmfRecord, road: &RoadProperties) -> bool {
    match (&cmf.applicable_traffic_control, &road.traffic_control) {
        (Some(applicable), Some(control)) => contains_normalized(applicable, control),
        _ => false,
    }
}

/// Road functional class listed in the CMF's applicable functional classes
pub fn functional_class_matches(cmf: &CmfRecord, road: &RoadProperties) -> bool {
    match (&cmf.applicable_functional_class, &road.functional_class) {
        (Some(applicable), Some(class)) => contains_normalized(applicable, class),
        _ => false,
    }
}

/// Road intersection geometry listed in the CMF's applicable geometries
pub fn geometry_matches(cmf: &CmfRecord, road: &RoadProperties) -> bool {
    match (&cmf.applicable_intersection_geometry, &road.intersection_geometry) {
        (Some(applicable), Some(geometry)) => contains_normalized(applicable, geometry),
        _ => false,
    }
}

/// Road lane range inside the CMF's lane bounds. Needs a known road lane
/// count and at least one CMF bound.
pub fn lanes_fit(cmf: &CmfRecord, road: &RoadProperties) -> bool {
    if cmf.min_lanes.is_none() && cmf.max_lanes.is_none() {
        return false;
    }
    let Some((low, high)) = road.lane_range() else {
        return false;
    };
    cmf.min_lanes.map_or(true, |min| low >= min) && cmf.max_lanes.map_or(true, |max| high <= max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ctx<'a>(
        cmf: &'a CmfRecord,
        profile: Option<&'a CrashProfile>,
        road: Option<&'a RoadProperties>,
        matching: &'a BTreeSet<String>,
    ) -> ScoringContext<'a> {
        ScoringContext {
            cmf,
            profile,
            road,
            matching,
            current_year: 2025,
        }
    }

    fn profile() -> CrashProfile {
        CrashProfile {
            collision_type_counts: [
                ("angle".to_string(), 60),
                ("rear-end".to_string(), 30),
                ("sideswipe".to_string(), 10),
            ]
            .into_iter()
            .collect(),
            total_crashes: 100,
            years_of_data: Some(5.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_crash_type_match_dominant() {
        let cmf = CmfRecord {
            crash_types: set(&["angle"]),
            ..Default::default()
        };
        let profile = profile();
        let matching = set(&["angle"]);
        let weights = ScoringWeights::default();

        // 60% of typed crashes and the most frequent type: 50 * 0.6 + 20
        let points = crash_type_match(&ctx(&cmf, Some(&profile), None, &matching), &weights);
        assert!((points - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_crash_type_match_top_three() {
        let cmf = CmfRecord {
            crash_types: set(&["sideswipe"]),
            ..Default::default()
        };
        let profile = profile();
        let matching = set(&["sideswipe"]);
        let weights = ScoringWeights::default();

        // 10% share plus the top-three bonus: 5 + 10
        let points = crash_type_match(&ctx(&cmf, Some(&profile), None, &matching), &weights);
        assert!((points - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_crash_type_match_full_coverage_is_max() {
        let cmf = CmfRecord {
            crash_types: set(&["angle", "rear-end", "sideswipe"]),
            ..Default::default()
        };
        let profile = profile();
        let matching = cmf.crash_types.clone();
        let points = crash_type_match(
            &ctx(&cmf, Some(&profile), None, &matching),
            &ScoringWeights::default(),
        );
        assert!((points - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_broad_cmf_not_penalized() {
        let cmf = CmfRecord::default();
        let profile = profile();
        let matching = BTreeSet::new();
        let weights = ScoringWeights::default();

        assert_eq!(
            crash_type_match(&ctx(&cmf, Some(&profile), None, &matching), &weights),
            15.0
        );
        assert_eq!(crash_type_match(&ctx(&cmf, None, None, &matching), &weights), 0.0);
    }

    #[test]
    fn test_unmatched_specific_cmf_scores_zero() {
        let cmf = CmfRecord {
            crash_types: set(&["pedestrian"]),
            ..Default::default()
        };
        let profile = profile();
        let matching = BTreeSet::new();
        assert_eq!(
            crash_type_match(&ctx(&cmf, Some(&profile), None, &matching), &ScoringWeights::default()),
            0.0
        );
    }

    #[test]
    fn test_recency_decay() {
        let weights = ScoringWeights::default();
        let matching = BTreeSet::new();
        let mut cmf = CmfRecord {
            publication_year: Some(2025),
            ..Default::default()
        };
        assert_eq!(recency(&ctx(&cmf, None, None, &matching), &weights), 15.0);

        cmf.publication_year = Some(2015);
        assert_eq!(recency(&ctx(&cmf, None, None, &matching), &weights), 7.5);

        cmf.publication_year = Some(2005);
        assert_eq!(recency(&ctx(&cmf, None, None, &matching), &weights), 0.0);

        cmf.publication_year = Some(1990);
        assert_eq!(recency(&ctx(&cmf, None, None, &matching), &weights), 0.0);

        cmf.publication_year = Some(2030);
        assert_eq!(recency(&ctx(&cmf, None, None, &matching), &weights), 15.0);
    }

    #[test]
    fn test_star_rating_points() {
        let weights = ScoringWeights::default();
        let matching = BTreeSet::new();
        let cmf = CmfRecord {
            star_rating: Some(4.0),
            ..Default::default()
        };
        assert_eq!(star_rating(&ctx(&cmf, None, None, &matching), &weights), 20.0);

        let unrated = CmfRecord::default();
        assert_eq!(star_rating(&ctx(&unrated, None, None, &matching), &weights), 0.0);
    }

    #[test]
    fn test_location_matches() {
        let cmf = CmfRecord {
            applicable_traffic_control: Some(set(&["Signal"])),
            applicable_functional_class: Some(set(&["minor arterial", "collector"])),
            applicable_intersection_geometry: Some(set(&["four-leg"])),
            min_lanes: Some(2),
            max_lanes: Some(4),
            ..Default::default()
        };
        let road = RoadProperties {
            traffic_control: Some("signal".to_string()),
            functional_class: Some("Minor Arterial".to_string()),
            intersection_geometry: Some("Four Leg".to_string()),
            min_lanes: Some(2),
            max_lanes: Some(4),
            is_divided: None,
        };
        let weights = ScoringWeights::default();
        let matching = BTreeSet::new();
        let context = ctx(&cmf, None, Some(&road), &matching);

        assert_eq!(traffic_control(&context, &weights), 20.0);
        assert_eq!(functional_class(&context, &weights), 15.0);
        assert_eq!(location_type_match(&context, &weights), 30.0);
    }

    #[test]
    fn test_unknown_road_properties_score_nothing() {
        let cmf = CmfRecord {
            applicable_traffic_control: Some(set(&["signal"])),
            min_lanes: Some(2),
            ..Default::default()
        };
        let road = RoadProperties::default();
        let weights = ScoringWeights::default();
        let matching = BTreeSet::new();

        let context = ctx(&cmf, None, Some(&road), &matching);
        assert_eq!(traffic_control(&context, &weights), 0.0);
        assert_eq!(location_type_match(&context, &weights), 0.0);

        let context = ctx(&cmf, None, None, &matching);
        assert_eq!(traffic_control(&context, &weights), 0.0);
    }

    #[test]
    fn test_lanes_fit_bounds() {
        let cmf = CmfRecord {
            max_lanes: Some(2),
            ..Default::default()
        };
        let mut road = RoadProperties {
            min_lanes: Some(2),
            max_lanes: Some(2),
            ..Default::default()
        };
        assert!(lanes_fit(&cmf, &road));

        road.max_lanes = Some(4);
        assert!(!lanes_fit(&cmf, &road));

        assert!(!lanes_fit(&CmfRecord::default(), &road));
    }

    #[test]
    fn test_severity_match() {
        let cmf = CmfRecord {
            crash_types: set(&["head-on"]),
            ..Default::default()
        };
        let mut profile = profile();
        profile.severity_counts = Some(crate::model::SeverityCounts {
            k: 5,
            a: 15,
            ..Default::default()
        });
        let matching = BTreeSet::new();
        let weights = ScoringWeights::default();

        // 20 of 100 crashes are K or A: 15 + 15 * 0.2
        let points = severity_match(&ctx(&cmf, Some(&profile), None, &matching), &weights);
        assert!((points - 18.0).abs() < 1e-9);

        let rear_end = CmfRecord {
            crash_types: set(&["rear-end"]),
            ..Default::default()
        };
        assert_eq!(
            severity_match(&ctx(&rear_end, Some(&profile), None, &matching), &weights),
            0.0
        );
    }

    #[test]
    fn test_behavioral_match_capped() {
        let cmf = CmfRecord {
            behavioral_factors: Some(set(&["distracted", "speeding"])),
            ..Default::default()
        };
        let mut profile = profile();
        profile.behavioral_factor_pct.insert("distracted".to_string(), 20.0);
        let matching = BTreeSet::new();
        let weights = ScoringWeights::default();

        let points = behavioral_match(&ctx(&cmf, Some(&profile), None, &matching), &weights);
        assert!((points - 6.0).abs() < 1e-9);

        profile.behavioral_factor_pct.insert("speeding".to_string(), 95.0);
        let points = behavioral_match(&ctx(&cmf, Some(&profile), None, &matching), &weights);
        assert_eq!(points, 30.0);
    }

    #[test]
    fn test_every_contribution_non_negative_without_inputs() {
        let cmf = CmfRecord::default();
        let matching = BTreeSet::new();
        let weights = ScoringWeights::default();
        for contribution in CONTRIBUTIONS {
            let points = (contribution.apply)(&ctx(&cmf, None, None, &matching), &weights);
            assert_eq!(points, 0.0, "{} scored without inputs", contribution.label);
        }
    }
}
