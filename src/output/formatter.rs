use std::io::IsTerminal;

use owo_colors::OwoColorize;

use crate::model::{ConfidenceLabel, CostTier, EnrichedCmfRecord, Reason};

/// Placeholder for an absent expected reduction
pub const NO_REDUCTION: &str = "—";
/// Placeholder for an absent tier or label
pub const NOT_AVAILABLE: &str = "N/A";

/// Description column width in the table view
const DESCRIPTION_WIDTH: usize = 48;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format expected crashes prevented per year with one decimal.
/// Negative values (crash increases) keep their sign.
pub fn format_reduction(reduction: Option<f64>) -> String {
    match reduction {
        Some(value) if value.is_finite() => format!("{:.1}", value),
        _ => NO_REDUCTION.to_string(),
    }
}

pub fn format_tier(tier: Option<CostTier>) -> String {
    tier.map_or_else(|| NOT_AVAILABLE.to_string(), |t| t.to_string())
}

pub fn format_confidence(label: Option<ConfidenceLabel>) -> String {
    label.map_or_else(|| NOT_AVAILABLE.to_string(), |l| l.to_string())
}

/// One `icon text` line per reason
pub fn format_reasons(reasons: &[Reason]) -> String {
    reasons
        .iter()
        .map(|reason| format!("{} {}", reason.icon, reason.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format enriched records as a table with columns:
/// Index, Score, Reduction/yr, Cost, Confidence, Description
///
/// No headers. Rows keep the input order.
pub fn format_enriched_table(records: &[EnrichedCmfRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return "No countermeasures found.".to_string();
    }

    let separator = "  ";

    records
        .iter()
        .enumerate()
        .map(|(idx, enriched)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>3}", enriched.relevance_score);
            let reduction_str = format!("{:>6}", format_reduction(enriched.expected_reduction_per_year));
            let tier_str = format!("{:<6}", format_tier(enriched.cost_tier));
            let confidence_str = format!("{:<6}", format_confidence(enriched.confidence_label));
            let description = truncate_text(&enriched.record.description, DESCRIPTION_WIDTH);

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    reduction_str.green(),
                    separator,
                    tier_str.yellow(),
                    separator,
                    confidence_str.cyan(),
                    separator,
                    description
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str,
                    score_str,
                    separator,
                    reduction_str,
                    separator,
                    tier_str,
                    separator,
                    confidence_str,
                    separator,
                    description
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format enriched records as tab-separated values for scripting
/// Columns: id, score, reduction, cost tier, confidence, description (no headers, no colors)
pub fn format_tsv(records: &[EnrichedCmfRecord]) -> String {
    records
        .iter()
        .map(|enriched| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                enriched.record.identity().unwrap_or_default(),
                enriched.relevance_score,
                format_reduction(enriched.expected_reduction_per_year),
                format_tier(enriched.cost_tier),
                format_confidence(enriched.confidence_label),
                enriched.record.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
