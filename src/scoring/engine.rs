use super::config::ScoringWeights;
use super::factors::{ScoringContext, CONTRIBUTIONS};
use crate::matching::match_crash_types;
use crate::model::{CmfRecord, CrashProfile, RoadProperties};

/// Hard ceiling of the relevance score, whatever the configured weights
pub const SCORE_CEILING: u32 = 400;

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub label: &'static str, // e.g. "Star rating", "Recency"
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Final score, rounded and clamped to `[0, max_score]`
    pub score: u32,
    /// Unclamped sum of all contributions
    pub raw_score: f64,
    /// Non-zero contributions in evaluation order
    pub breakdown: Vec<FactorContribution>,
}

/// Relevance of a CMF for one location.
///
/// Pure: the same inputs always produce the same result. `current_year` drives
/// the recency contribution and is never read from a clock here.
pub fn calculate_score(
    cmf: &CmfRecord,
    profile: Option<&CrashProfile>,
    road: Option<&RoadProperties>,
    current_year: i32,
    weights: &ScoringWeights,
) -> ScoreResult {
    let matching = match_crash_types(&cmf.crash_types, profile);
    let ctx = ScoringContext {
        cmf,
        profile,
        road,
        matching: &matching,
        current_year,
    };
    score_context(&ctx, weights)
}

/// Score a prepared context by summing every contribution in order.
pub fn score_context(ctx: &ScoringContext<'_>, weights: &ScoringWeights) -> ScoreResult {
    let mut raw_score = 0.0;
    let mut breakdown = Vec::new();

    for contribution in CONTRIBUTIONS {
        let points = (contribution.apply)(ctx, weights);
        // Contributions are never negative; guard against bad weights anyway
        if !points.is_finite() || points <= 0.0 {
            continue;
        }
        raw_score += points;
        breakdown.push(FactorContribution {
            label: contribution.label,
            points,
        });
    }

    ScoreResult {
        score: clamp_score(raw_score, weights.max_score),
        raw_score,
        breakdown,
    }
}

/// Round, then clamp once to `[0, max_score]`; no per-tier caps.
fn clamp_score(raw: f64, max_score: f64) -> u32 {
    let ceiling = if max_score.is_finite() && max_score > 0.0 {
        max_score.min(f64::from(SCORE_CEILING))
    } else {
        f64::from(SCORE_CEILING)
    };
    raw.round().clamp(0.0, ceiling.floor()) as u32
}
