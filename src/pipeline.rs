use chrono::Datelike;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::error::{EngineError, EnrichmentWarning, MissingInput};
use crate::estimate::{confidence_label, cost_tier};
use crate::matching::match_crash_types;
use crate::model::{CmfRecord, CrashProfile, EnrichedCmfRecord, RoadProperties};
use crate::reasons::generate_reasons;
use crate::reduction::expected_reduction;
use crate::scoring::{score_context, ScoringContext, ScoringWeights};

/// Calendar year from the wall clock, for callers building an [`Enricher`].
/// The engine itself never reads the clock.
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Result of enriching one catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Enriched(EnrichedCmfRecord),
    /// Emitted with defensive defaults because its values were unusable
    Defaulted(EnrichedCmfRecord, EnrichmentWarning),
    /// Left out of the output because it has no identity
    Skipped(EnrichmentWarning),
}

/// Enriched records in catalog order, plus soft warnings for the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Enrichment {
    pub records: Vec<EnrichedCmfRecord>,
    pub warnings: Vec<EnrichmentWarning>,
}

/// Scores and enriches CMF catalogs for one location.
///
/// Holds no state between calls: enriching the same inputs twice yields
/// identical output, and entries never see each other.
#[derive(Debug, Clone)]
pub struct Enricher {
    weights: ScoringWeights,
    current_year: i32,
}

impl Enricher {
    /// Enricher with default weights, scoring recency against `current_year`
    pub fn new(current_year: i32) -> Self {
        Self {
            weights: ScoringWeights::default(),
            current_year,
        }
    }

    /// Enricher using the wall-clock year
    pub fn for_current_year() -> Self {
        Self::new(current_year())
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Enrich one record without validating it.
    pub fn enrich_record(
        &self,
        cmf: &CmfRecord,
        profile: Option<&CrashProfile>,
        road: Option<&RoadProperties>,
    ) -> EnrichedCmfRecord {
        let matching = match_crash_types(&cmf.crash_types, profile);
        let ctx = ScoringContext {
            cmf,
            profile,
            road,
            matching: &matching,
            current_year: self.current_year,
        };
        let score = score_context(&ctx, &self.weights);

        EnrichedCmfRecord {
            record: cmf.clone(),
            expected_reduction_per_year: expected_reduction(cmf, profile, &matching),
            relevance_score: score.score,
            relevance_reasons: generate_reasons(cmf, profile, road, &matching),
            matching_crash_types: matching,
            cost_tier: cost_tier(cmf),
            confidence_label: confidence_label(cmf),
        }
    }

    /// Validate and enrich the catalog entry at `index`.
    pub fn outcome(
        &self,
        index: usize,
        cmf: &CmfRecord,
        profile: Option<&CrashProfile>,
        road: Option<&RoadProperties>,
    ) -> EntryOutcome {
        let Some(id) = cmf.identity() else {
            return EntryOutcome::Skipped(EnrichmentWarning::MalformedRecord {
                index,
                reason: "missing id".to_string(),
            });
        };

        match cmf.validate() {
            Ok(()) => EntryOutcome::Enriched(self.enrich_record(cmf, profile, road)),
            Err(errors) => EntryOutcome::Defaulted(
                EnrichedCmfRecord::defaulted(cmf.clone()),
                EnrichmentWarning::RecordDefaulted {
                    id: id.to_string(),
                    reason: errors.join("; "),
                },
            ),
        }
    }

    /// Lazily enrich a catalog, one outcome per entry in catalog order.
    ///
    /// Nothing is cached: cloning the iterator, or calling this again,
    /// recomputes every entry from the inputs.
    pub fn outcomes<'a>(
        &'a self,
        catalog: &'a [CmfRecord],
        profile: Option<&'a CrashProfile>,
        road: Option<&'a RoadProperties>,
    ) -> impl Iterator<Item = EntryOutcome> + Clone + 'a {
        catalog
            .iter()
            .enumerate()
            .map(move |(index, cmf)| self.outcome(index, cmf, profile, road))
    }

    /// Enrich a whole catalog sequentially.
    ///
    /// Output preserves catalog order; no ranking is applied. Fails only when
    /// the catalog itself is missing.
    pub fn enrich(
        &self,
        catalog: Option<&[CmfRecord]>,
        profile: Option<&CrashProfile>,
        road: Option<&RoadProperties>,
    ) -> Result<Enrichment, EngineError> {
        let catalog = catalog.ok_or_else(|| EngineError::CatalogUnavailable {
            reason: "no catalog supplied".to_string(),
        })?;
        Ok(collect(self.outcomes(catalog, profile, road), profile, road))
    }

    /// Enrich a whole catalog across the rayon thread pool.
    ///
    /// Same output as [`Enricher::enrich`], including order.
    pub fn enrich_par(
        &self,
        catalog: Option<&[CmfRecord]>,
        profile: Option<&CrashProfile>,
        road: Option<&RoadProperties>,
    ) -> Result<Enrichment, EngineError> {
        let catalog = catalog.ok_or_else(|| EngineError::CatalogUnavailable {
            reason: "no catalog supplied".to_string(),
        })?;
        let outcomes: Vec<EntryOutcome> = catalog
            .par_iter()
            .enumerate()
            .map(|(index, cmf)| self.outcome(index, cmf, profile, road))
            .collect();
        Ok(collect(outcomes, profile, road))
    }

    /// Enrich a catalog given as JSON text (an array of CMF objects).
    ///
    /// Unknown fields are ignored. An entry that cannot be decoded is emitted
    /// with defaults when it carries an id and skipped otherwise. Text that is
    /// not a JSON array makes the whole catalog unavailable.
    pub fn enrich_json(
        &self,
        catalog_json: &str,
        profile: Option<&CrashProfile>,
        road: Option<&RoadProperties>,
    ) -> Result<Enrichment, EngineError> {
        let parsed: Value =
            serde_json::from_str(catalog_json).map_err(|e| EngineError::CatalogUnavailable {
                reason: format!("catalog is not valid JSON: {}", e),
            })?;
        let Value::Array(entries) = parsed else {
            return Err(EngineError::CatalogUnavailable {
                reason: "catalog is not a JSON array".to_string(),
            });
        };

        let outcomes = entries.into_iter().enumerate().map(|(index, entry)| {
            let id = entry_id(&entry);
            match serde_json::from_value::<CmfRecord>(entry) {
                Ok(cmf) => self.outcome(index, &cmf, profile, road),
                Err(e) => match id {
                    Some(id) => {
                        let record = CmfRecord {
                            id: Some(id.clone()),
                            ..Default::default()
                        };
                        EntryOutcome::Defaulted(
                            EnrichedCmfRecord::defaulted(record),
                            EnrichmentWarning::RecordDefaulted {
                                id,
                                reason: format!("unreadable record: {}", e),
                            },
                        )
                    }
                    None => EntryOutcome::Skipped(EnrichmentWarning::MalformedRecord {
                        index,
                        reason: format!("unreadable record without id: {}", e),
                    }),
                },
            }
        });

        Ok(collect(outcomes, profile, road))
    }
}

/// Identity of a raw catalog entry, read leniently for error reporting
fn entry_id(entry: &Value) -> Option<String> {
    let id = match entry.get("id")? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!id.is_empty()).then_some(id)
}

fn collect(
    outcomes: impl IntoIterator<Item = EntryOutcome>,
    profile: Option<&CrashProfile>,
    road: Option<&RoadProperties>,
) -> Enrichment {
    let mut enrichment = Enrichment::default();

    if profile.is_none() {
        enrichment.warnings.push(EnrichmentWarning::MissingInput {
            input: MissingInput::CrashProfile,
        });
    }
    if road.is_none() {
        enrichment.warnings.push(EnrichmentWarning::MissingInput {
            input: MissingInput::RoadProperties,
        });
    }

    for outcome in outcomes {
        match outcome {
            EntryOutcome::Enriched(record) => enrichment.records.push(record),
            EntryOutcome::Defaulted(record, warning) => {
                enrichment.records.push(record);
                enrichment.warnings.push(warning);
            }
            EntryOutcome::Skipped(warning) => enrichment.warnings.push(warning),
        }
    }

    for warning in &enrichment.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!(
        "Enriched {} records with {} warnings",
        enrichment.records.len(),
        enrichment.warnings.len()
    );

    enrichment
}
