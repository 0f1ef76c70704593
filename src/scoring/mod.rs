pub mod config;
pub mod factors;
pub mod engine;
pub mod validation;

pub use config::*;
pub use factors::{Contribution, ScoringContext, CONTRIBUTIONS};
pub use engine::{calculate_score, score_context, FactorContribution, ScoreResult, SCORE_CEILING};
pub use validation::validate_weights;
