use crate::matching::normalize_label;
use crate::model::{CmfRecord, ConfidenceLabel, CostTier};

/// Standard error (percent) below which a CMF is considered high confidence
pub const HIGH_CONFIDENCE_SE_PCT: f64 = 10.0;

/// Standard error (percent) below which a CMF is considered medium confidence
pub const MEDIUM_CONFIDENCE_SE_PCT: f64 = 25.0;

/// Cost tier from the catalog's construction-cost category.
///
/// Unrecognized or missing categories yield `None`; the display layer picks
/// the fallback text.
pub fn cost_tier(cmf: &CmfRecord) -> Option<CostTier> {
    let category = cmf.cost_category.as_deref()?;
    let trimmed = category.trim();

    // Dollar-sign scales ("$", "$$", "$$$")
    if !trimmed.is_empty() && trimmed.chars().all(|c| c == '$') {
        return match trimmed.len() {
            1 => Some(CostTier::Low),
            2 => Some(CostTier::Medium),
            _ => Some(CostTier::High),
        };
    }

    match normalize_label(trimmed).as_str() {
        "low" | "low cost" | "minimal" | "inexpensive" => Some(CostTier::Low),
        "medium" | "medium cost" | "moderate" => Some(CostTier::Medium),
        "high" | "high cost" | "major" | "expensive" => Some(CostTier::High),
        _ => None,
    }
}

/// Confidence band from the standard error: under 10% is High, under 25% is
/// Medium, anything larger is Low. `None` without a usable standard error.
pub fn confidence_label(cmf: &CmfRecord) -> Option<ConfidenceLabel> {
    let se = cmf.standard_error_pct?;
    if !se.is_finite() || se < 0.0 {
        return None;
    }

    Some(if se < HIGH_CONFIDENCE_SE_PCT {
        ConfidenceLabel::High
    } else if se < MEDIUM_CONFIDENCE_SE_PCT {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    })
}
