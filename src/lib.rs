//! Countermeasure relevance engine.
//!
//! Scores a catalog of crash modification factor (CMF) records against a
//! location's crash profile and road properties, producing enriched records
//! with a relevance score, an expected crash reduction, a cost tier, a
//! confidence label and ordered justification reasons.

pub mod config;
pub mod error;
pub mod estimate;
pub mod matching;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod reasons;
pub mod reduction;
pub mod scoring;

pub use error::{EngineError, EnrichmentWarning, MissingInput};
pub use model::{
    CmfRecord, CostTier, ConfidenceLabel, CrashProfile, CrashRow, EnrichedCmfRecord, Reason,
    RoadProperties, SeverityCounts,
};
pub use pipeline::{current_year, Enricher, Enrichment, EntryOutcome};
pub use scoring::{calculate_score, ScoreResult, ScoringWeights};
