use serde::{Deserialize, Serialize};

use crate::scoring::ScoringWeights;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Scoring weight overrides; `None` means the built-in defaults
    #[serde(default)]
    pub scoring: Option<ScoringWeights>,
}

impl EngineConfig {
    /// Weights to score with, defaults filled in
    pub fn effective_weights(&self) -> ScoringWeights {
        self.scoring.clone().unwrap_or_default()
    }
}
