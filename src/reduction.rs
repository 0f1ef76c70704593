use std::collections::BTreeSet;

use crate::matching::normalize_label;
use crate::model::{CmfRecord, CrashProfile};

/// Lower bound on the divisor when annualizing crash counts
const MIN_YEARS: f64 = f64::EPSILON;

/// Crashes the CMF's treatment would prevent per year at this location.
///
/// `matching` is the crash-type match for this CMF and profile. Returns
/// `None` when the CRF cannot be resolved or no profile is available. A
/// negative CRF produces a negative value (a projected crash increase).
pub fn expected_reduction(
    cmf: &CmfRecord,
    profile: Option<&CrashProfile>,
    matching: &BTreeSet<String>,
) -> Option<f64> {
    let crf = cmf.resolved_crf()?;
    let profile = profile?;

    let applicable_crashes = if cmf.crash_types.is_empty() {
        profile.total_crashes
    } else {
        // Two CMF spellings of one type must not double count it
        let types: BTreeSet<String> = matching.iter().map(|t| normalize_label(t)).collect();
        let counts = profile.normalized_counts();
        types
            .iter()
            .filter_map(|t| counts.get(t))
            .fold(0u64, |acc, count| acc.saturating_add(*count))
    };

    let annual_crashes = applicable_crashes as f64 / profile.effective_years().max(MIN_YEARS);
    let reduction = round_to_tenth(annual_crashes * (crf / 100.0));

    // -0.0 would render as "-0.0"
    Some(if reduction == 0.0 { 0.0 } else { reduction })
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::match_crash_types;

    fn angle_profile() -> CrashProfile {
        CrashProfile {
            collision_type_counts: [("angle".to_string(), 600)].into_iter().collect(),
            total_crashes: 600,
            years_of_data: Some(5.0),
            ..Default::default()
        }
    }

    fn angle_cmf() -> CmfRecord {
        CmfRecord {
            id: Some("cmf-1".to_string()),
            crash_types: ["angle".to_string()].into_iter().collect(),
            ..Default::default()
        }
    }

    fn reduce(cmf: &CmfRecord, profile: Option<&CrashProfile>) -> Option<f64> {
        let matching = match_crash_types(&cmf.crash_types, profile);
        expected_reduction(cmf, profile, &matching)
    }

    #[test]
    fn test_reduction_from_crf() {
        let cmf = CmfRecord {
            crash_reduction_factor_pct: Some(30.0),
            ..angle_cmf()
        };
        // 600 crashes / 5 years = 120 per year, 30% of that
        assert_eq!(reduce(&cmf, Some(&angle_profile())), Some(36.0));
    }

    #[test]
    fn test_reduction_from_multiplier_matches_crf() {
        let cmf = CmfRecord {
            cmf_multiplier: Some(0.70),
            ..angle_cmf()
        };
        assert_eq!(reduce(&cmf, Some(&angle_profile())), Some(36.0));
    }

    #[test]
    fn test_missing_profile_is_absent() {
        let cmf = CmfRecord {
            crash_reduction_factor_pct: Some(30.0),
            ..angle_cmf()
        };
        assert_eq!(reduce(&cmf, None), None);
    }

    #[test]
    fn test_missing_crf_is_absent() {
        assert_eq!(reduce(&angle_cmf(), Some(&angle_profile())), None);
    }

    #[test]
    fn test_broad_cmf_uses_total_crashes() {
        let cmf = CmfRecord {
            crash_reduction_factor_pct: Some(10.0),
            ..Default::default()
        };
        let profile = CrashProfile {
            total_crashes: 250,
            years_of_data: Some(5.0),
            ..Default::default()
        };
        assert_eq!(reduce(&cmf, Some(&profile)), Some(5.0));
    }

    #[test]
    fn test_negative_crf_is_preserved() {
        let cmf = CmfRecord {
            crash_reduction_factor_pct: Some(-10.0),
            ..angle_cmf()
        };
        assert_eq!(reduce(&cmf, Some(&angle_profile())), Some(-12.0));
    }

    #[test]
    fn test_non_positive_years_use_default() {
        let cmf = CmfRecord {
            crash_reduction_factor_pct: Some(30.0),
            ..angle_cmf()
        };
        let profile = CrashProfile {
            years_of_data: Some(0.0),
            ..angle_profile()
        };
        assert_eq!(reduce(&cmf, Some(&profile)), Some(36.0));
    }

    #[test]
    fn test_unmatched_types_yield_zero() {
        let cmf = CmfRecord {
            crash_reduction_factor_pct: Some(-30.0),
            crash_types: ["pedestrian".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let value = reduce(&cmf, Some(&angle_profile())).unwrap();
        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
    }

    #[test]
    fn test_duplicate_spellings_count_once() {
        let cmf = CmfRecord {
            crash_reduction_factor_pct: Some(50.0),
            crash_types: ["angle".to_string(), "ANGLE".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(reduce(&cmf, Some(&angle_profile())), Some(60.0));
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        let cmf = CmfRecord {
            crash_reduction_factor_pct: Some(33.0),
            ..angle_cmf()
        };
        let profile = CrashProfile {
            years_of_data: Some(7.0),
            ..angle_profile()
        };
        // 600 / 7 * 0.33 = 28.2857...
        assert_eq!(reduce(&cmf, Some(&profile)), Some(28.3));
    }
}
