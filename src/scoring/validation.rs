use super::config::ScoringWeights;
use super::engine::SCORE_CEILING;

/// Validate scoring weights at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_weights(weights: &ScoringWeights) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (name, value) in weights.named_weights() {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("scoring.{}: must be a non-negative number, got {}", name, value));
        }
    }

    if weights.max_score.is_finite()
        && (weights.max_score <= 0.0 || weights.max_score > f64::from(SCORE_CEILING))
    {
        errors.push(format!(
            "scoring.max_score: must be in (0, {}], got {}",
            SCORE_CEILING, weights.max_score
        ));
    }

    if weights.recency_horizon_years.is_finite() && weights.recency_horizon_years <= 0.0 {
        errors.push(format!(
            "scoring.recency_horizon_years: must be positive, got {}",
            weights.recency_horizon_years
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
