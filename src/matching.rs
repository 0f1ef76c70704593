use std::collections::BTreeSet;

use crate::model::{CmfRecord, CrashProfile};

/// Crash types associated with fatal and serious-injury outcomes, normalized.
pub const SEVERE_CRASH_TYPES: &[&str] = &[
    "fatal",
    "serious injury",
    "fatal and serious injury",
    "fatal and injury",
    "injury",
    "ka",
    "kabc",
    "head on",
    "pedestrian",
    "bicycle",
    "run off road",
];

/// Keywords that tie a behavioral factor to a countermeasure's text.
/// Factors not listed here match on their own name.
const BEHAVIORAL_KEYWORDS: &[(&str, &[&str])] = &[
    ("distracted", &["distract"]),
    ("speeding", &["speed"]),
    ("impaired", &["alcohol", "impair", "dui", "drug"]),
    ("unbelted", &["belt", "restraint"]),
    ("drowsy", &["drowsy", "fatigue"]),
];

/// Normalize a label for comparison: lower-case, trimmed, `_` and `-` read
/// as spaces, internal whitespace collapsed.
pub fn normalize_label(label: &str) -> String {
    label
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `set` contains `value` after normalization
pub fn contains_normalized(set: &BTreeSet<String>, value: &str) -> bool {
    let wanted = normalize_label(value);
    !wanted.is_empty() && set.iter().any(|item| normalize_label(item) == wanted)
}

/// Crash types declared by the CMF that the profile has actually observed.
///
/// Returns the CMF's own spelling of each label. An empty declaration means
/// the CMF applies broadly and yields an empty set, as does a missing profile.
pub fn match_crash_types(
    cmf_crash_types: &BTreeSet<String>,
    profile: Option<&CrashProfile>,
) -> BTreeSet<String> {
    let Some(profile) = profile else {
        return BTreeSet::new();
    };
    if cmf_crash_types.is_empty() {
        return BTreeSet::new();
    }

    let observed = profile.normalized_counts();
    cmf_crash_types
        .iter()
        .filter(|label| {
            observed
                .get(&normalize_label(label))
                .is_some_and(|count| *count > 0)
        })
        .cloned()
        .collect()
}

/// Whether the CMF targets a crash type tied to fatal or serious injuries
pub fn targets_severe_crashes(cmf: &CmfRecord) -> bool {
    cmf.crash_types
        .iter()
        .map(|label| normalize_label(label))
        .any(|label| SEVERE_CRASH_TYPES.contains(&label.as_str()))
}

/// Whether the CMF addresses a behavioral factor (given in normalized form).
///
/// An explicit `behavioralFactors` declaration wins; otherwise the factor's
/// keywords are searched in the description and crash types.
pub fn addresses_factor(cmf: &CmfRecord, factor: &str) -> bool {
    if let Some(ref declared) = cmf.behavioral_factors {
        return contains_normalized(declared, factor);
    }

    let keywords: Vec<&str> = BEHAVIORAL_KEYWORDS
        .iter()
        .find(|(name, _)| *name == factor)
        .map(|(_, words)| words.to_vec())
        .unwrap_or_else(|| vec![factor]);

    let description = normalize_label(&cmf.description);
    let mentions = |text: &str| keywords.iter().any(|word| text.contains(word));

    mentions(&description)
        || cmf
            .crash_types
            .iter()
            .any(|label| mentions(&normalize_label(label)))
}
