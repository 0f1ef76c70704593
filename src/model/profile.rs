use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::matching::normalize_label;

/// Years of data assumed when a profile does not carry a usable span.
pub const DEFAULT_YEARS_OF_DATA: f64 = 5.0;

/// Aggregated crash statistics for one location and time window.
///
/// Field names follow the camelCase JSON contract shared with the
/// collaborators that build profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashProfile {
    /// Crash count per collision-type label (e.g. "angle", "rear-end")
    #[serde(default)]
    pub collision_type_counts: BTreeMap<String, u64>,

    /// All crashes, typed or not
    #[serde(default)]
    pub total_crashes: u64,

    /// Span of the counts in years; see [`CrashProfile::effective_years`]
    #[serde(default)]
    pub years_of_data: Option<f64>,

    #[serde(default)]
    pub severity_counts: Option<SeverityCounts>,

    /// Percentage (0-100) of crashes exhibiting each behavioral factor
    #[serde(default)]
    pub behavioral_factor_pct: BTreeMap<String, f64>,
}

/// KABCO severity counts. Only `k` and `a` feed scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    #[serde(default)]
    pub k: u64,
    #[serde(default)]
    pub a: u64,
    #[serde(default)]
    pub b: u64,
    #[serde(default)]
    pub c: u64,
    #[serde(default)]
    pub o: u64,
}

/// One crash as it appears in a state crash extract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashRow {
    #[serde(default)]
    pub crash_year: Option<i32>,

    /// e.g. "K. Fatal Injury", "A. Severe Injury", "O. Property Damage Only"
    #[serde(default)]
    pub crash_severity: Option<String>,

    /// e.g. "2. Angle"; ordinal prefixes are stripped during aggregation
    #[serde(default)]
    pub collision_type: Option<String>,

    /// Behavioral factors flagged on this crash (e.g. "distracted")
    #[serde(default)]
    pub factors: Vec<String>,
}

impl CrashProfile {
    /// Years the counts span, falling back to [`DEFAULT_YEARS_OF_DATA`] when
    /// absent, non-positive or not finite.
    pub fn effective_years(&self) -> f64 {
        match self.years_of_data {
            Some(years) if years.is_finite() && years > 0.0 => years,
            _ => DEFAULT_YEARS_OF_DATA,
        }
    }

    /// Collision-type counts keyed by normalized label. Keys that normalize
    /// to the same label are summed.
    pub fn normalized_counts(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for (label, count) in &self.collision_type_counts {
            let key = normalize_label(label);
            if key.is_empty() {
                continue;
            }
            let entry = counts.entry(key).or_insert(0u64);
            *entry = entry.saturating_add(*count);
        }
        counts
    }

    /// Count for a label, compared after normalization
    pub fn count_for(&self, label: &str) -> u64 {
        self.normalized_counts()
            .get(&normalize_label(label))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of typed crashes, or `total_crashes` when no type is counted.
    pub fn typed_total(&self) -> u64 {
        let typed = self
            .collision_type_counts
            .values()
            .fold(0u64, |acc, count| acc.saturating_add(*count));
        if typed > 0 {
            typed
        } else {
            self.total_crashes
        }
    }

    /// The `n` most frequent normalized crash types with non-zero counts,
    /// ties broken alphabetically.
    pub fn dominant_types(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<(String, u64)> = self
            .normalized_counts()
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.into_iter().take(n).map(|(label, _)| label).collect()
    }

    /// Fatal plus serious-injury crashes
    pub fn fatal_and_serious(&self) -> u64 {
        self.severity_counts
            .map(|s| s.k.saturating_add(s.a))
            .unwrap_or(0)
    }

    /// Behavioral factors with a usable, non-zero percentage, keyed by
    /// normalized name. Percentages are clamped to 0-100. Keys that
    /// normalize to the same name keep the largest percentage.
    pub fn behavioral_factors(&self) -> BTreeMap<String, f64> {
        let mut factors: BTreeMap<String, f64> = BTreeMap::new();
        for (name, pct) in &self.behavioral_factor_pct {
            if !pct.is_finite() || *pct <= 0.0 {
                continue;
            }
            let key = normalize_label(name);
            if key.is_empty() {
                continue;
            }
            let pct = pct.min(100.0);
            factors
                .entry(key)
                .and_modify(|existing| *existing = existing.max(pct))
                .or_insert(pct);
        }
        factors
    }

    /// Aggregate individual crash rows into a profile.
    ///
    /// Rows without a recognizable collision type still count toward
    /// `total_crashes`. Years of data is the inclusive span of known crash
    /// years; severity counts are only present when at least one row has a
    /// KABCO severity.
    pub fn from_rows(rows: &[CrashRow]) -> Self {
        let mut collision_type_counts = BTreeMap::new();
        let mut severity = SeverityCounts::default();
        let mut any_severity = false;
        let mut factor_rows: BTreeMap<String, u64> = BTreeMap::new();
        let mut first_year: Option<i32> = None;
        let mut last_year: Option<i32> = None;

        for row in rows {
            if let Some(ref raw) = row.collision_type {
                let label = normalize_label(strip_ordinal_prefix(raw));
                if !label.is_empty() {
                    *collision_type_counts.entry(label).or_insert(0) += 1;
                }
            }

            if let Some(ref raw) = row.crash_severity {
                let bucket = match raw.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
                    Some('K') => Some(&mut severity.k),
                    Some('A') => Some(&mut severity.a),
                    Some('B') => Some(&mut severity.b),
                    Some('C') => Some(&mut severity.c),
                    Some('O') => Some(&mut severity.o),
                    _ => None,
                };
                if let Some(count) = bucket {
                    *count += 1;
                    any_severity = true;
                }
            }

            if let Some(year) = row.crash_year {
                first_year = Some(first_year.map_or(year, |y| y.min(year)));
                last_year = Some(last_year.map_or(year, |y| y.max(year)));
            }

            // A factor listed twice on one crash still counts once
            let flagged: BTreeSet<String> = row
                .factors
                .iter()
                .map(|f| normalize_label(f))
                .filter(|f| !f.is_empty())
                .collect();
            for factor in flagged {
                *factor_rows.entry(factor).or_insert(0) += 1;
            }
        }

        let total_crashes = rows.len() as u64;
        let behavioral_factor_pct = factor_rows
            .into_iter()
            .map(|(factor, count)| {
                let pct = count as f64 / total_crashes as f64 * 100.0;
                (factor, (pct * 10.0).round() / 10.0)
            })
            .collect();

        let years_of_data = match (first_year, last_year) {
            (Some(first), Some(last)) => Some(f64::from(last - first + 1)),
            _ => None,
        };

        Self {
            collision_type_counts,
            total_crashes,
            years_of_data,
            severity_counts: any_severity.then_some(severity),
            behavioral_factor_pct,
        }
    }
}

/// Strip a leading "N." ordinal as used in state crash extracts ("2. Angle").
fn strip_ordinal_prefix(raw: &str) -> &str {
    let trimmed = raw.trim();
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = trimmed[digits..].strip_prefix('.') {
            return rest.trim_start();
        }
    }
    trimmed
}
