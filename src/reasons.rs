use std::collections::BTreeSet;

use crate::matching::{addresses_factor, normalize_label, targets_severe_crashes};
use crate::model::{CmfRecord, CrashProfile, Reason, RoadProperties};
use crate::scoring::factors::{functional_class_matches, geometry_matches, lanes_fit, traffic_control_matches};

pub const ICON_AI: &str = "🤖";
pub const ICON_PROVEN: &str = "⭐";
pub const ICON_HSM: &str = "📘";
pub const ICON_VIRGINIA: &str = "🏛️";
pub const ICON_CRASH_TYPE: &str = "🎯";
pub const ICON_LOCATION: &str = "📍";
pub const ICON_SEVERITY: &str = "⚠️";
pub const ICON_BEHAVIOR: &str = "🧠";

/// Justifications for recommending a CMF at this location.
///
/// Items follow a fixed priority order (badges first, then the location
/// evidence), independent of how many points each one earned. An item whose
/// precondition fails is omitted, never replaced with a placeholder.
pub fn generate_reasons(
    cmf: &CmfRecord,
    profile: Option<&CrashProfile>,
    road: Option<&RoadProperties>,
    matching: &BTreeSet<String>,
) -> Vec<Reason> {
    let mut reasons = Vec::new();

    if cmf.ai_recommended {
        push_unique(&mut reasons, ICON_AI, "Surfaced by AI-assisted search".to_string());
    }
    if cmf.is_proven_safety_countermeasure {
        push_unique(&mut reasons, ICON_PROVEN, "FHWA Proven Safety Countermeasure".to_string());
    }
    if cmf.is_in_highway_safety_manual {
        push_unique(&mut reasons, ICON_HSM, "Listed in the Highway Safety Manual".to_string());
    }
    if cmf.is_virginia_specific_study {
        push_unique(&mut reasons, ICON_VIRGINIA, "Based on a Virginia-specific study".to_string());
    }

    if let Some(profile) = profile {
        if let Some(text) = crash_type_reason(profile, matching) {
            push_unique(&mut reasons, ICON_CRASH_TYPE, text);
        }
    }

    if let Some(road) = road {
        if let Some(text) = location_reason(cmf, road) {
            push_unique(&mut reasons, ICON_LOCATION, text);
        }
    }

    if let Some(profile) = profile {
        if let Some(text) = severity_reason(cmf, profile) {
            push_unique(&mut reasons, ICON_SEVERITY, text);
        }

        for (factor, pct) in profile.behavioral_factors() {
            if !addresses_factor(cmf, &factor) {
                continue;
            }
            push_unique(
                &mut reasons,
                ICON_BEHAVIOR,
                format!("Addresses {} crashes ({}% of crashes here)", factor, pct),
            );
        }
    }

    reasons
}

fn push_unique(reasons: &mut Vec<Reason>, icon: &str, text: String) {
    if reasons.iter().any(|r| r.text == text) {
        return;
    }
    reasons.push(Reason::new(icon, text));
}

fn crash_type_reason(profile: &CrashProfile, matching: &BTreeSet<String>) -> Option<String> {
    if matching.is_empty() {
        return None;
    }
    // Spellings of one type are listed once
    let mut seen = BTreeSet::new();
    let listed: Vec<String> = matching
        .iter()
        .filter(|label| seen.insert(normalize_label(label)))
        .map(|label| format!("{} ({})", label, profile.count_for(label)))
        .collect();
    Some(format!("Targets crash types seen here: {}", listed.join(", ")))
}

fn location_reason(cmf: &CmfRecord, road: &RoadProperties) -> Option<String> {
    let mut parts = Vec::new();

    if traffic_control_matches(cmf, road) {
        if let Some(ref control) = road.traffic_control {
            parts.push(format!("{} traffic control", control.trim()));
        }
    }
    if functional_class_matches(cmf, road) {
        if let Some(ref class) = road.functional_class {
            parts.push(format!("{} roadway", class.trim()));
        }
    }
    if geometry_matches(cmf, road) {
        if let Some(ref geometry) = road.intersection_geometry {
            parts.push(format!("{} intersection", geometry.trim()));
        }
    }
    if lanes_fit(cmf, road) {
        if let Some((low, high)) = road.lane_range() {
            if low == high {
                parts.push(format!("{}-lane cross-section", low));
            } else {
                parts.push(format!("{}-{} lane cross-section", low, high));
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("Applies to this location: {}", parts.join(", ")))
    }
}

fn severity_reason(cmf: &CmfRecord, profile: &CrashProfile) -> Option<String> {
    let severity = profile.severity_counts?;
    if profile.fatal_and_serious() == 0 || !targets_severe_crashes(cmf) {
        return None;
    }
    Some(format!(
        "Targets severe crash patterns: {} fatal and {} serious-injury crashes here",
        severity.k, severity.a
    ))
}
