pub mod formatter;

pub use formatter::{
    format_confidence, format_enriched_table, format_reasons, format_reduction, format_tier,
    format_tsv, should_use_colors,
};
