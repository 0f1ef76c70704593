mod cmf;
mod enriched;
mod profile;
mod road;

pub use cmf::CmfRecord;
pub use enriched::{ConfidenceLabel, CostTier, EnrichedCmfRecord, Reason};
pub use profile::{CrashProfile, CrashRow, SeverityCounts, DEFAULT_YEARS_OF_DATA};
pub use road::RoadProperties;
