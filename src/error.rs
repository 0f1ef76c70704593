use serde::Serialize;
use thiserror::Error;

/// Fatal conditions of an enrichment call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("CMF catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },
}

/// Which contextual input was missing from an enrichment call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingInput {
    CrashProfile,
    RoadProperties,
}

impl std::fmt::Display for MissingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingInput::CrashProfile => write!(f, "crash profile"),
            MissingInput::RoadProperties => write!(f, "road properties"),
        }
    }
}

/// Soft, non-fatal data-quality warnings returned alongside enriched records.
///
/// Callers use these to show data-quality banners; they never abort a batch.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EnrichmentWarning {
    /// Profile or road properties absent; outputs degrade to absent values.
    #[error("missing input: {input} not provided, dependent fields left empty")]
    MissingInput { input: MissingInput },

    /// Catalog entry without identity; skipped from the output.
    #[error("catalog entry {index} skipped: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// Catalog entry with identity but unusable values; emitted with defaults.
    #[error("record '{id}' emitted with defaults: {reason}")]
    RecordDefaulted { id: String, reason: String },
}
