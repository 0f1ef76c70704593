mod schema;

pub use schema::EngineConfig;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::scoring::{validate_weights, ScoringWeights};

/// Load engine configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Path to the config file, chosen by the caller
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed or names an unknown weight
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        anyhow::bail!("Config file not found at {}", path.display());
    }

    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    parse_config(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))
}

/// Parse engine configuration from YAML text
pub fn parse_config(yaml: &str) -> Result<EngineConfig> {
    let config: EngineConfig = serde_saphyr::from_str(yaml)?;
    Ok(config)
}

/// Load a config file and return its validated scoring weights.
///
/// All weight errors are reported together.
pub fn load_weights(path: &Path) -> Result<ScoringWeights> {
    let weights = load_config(path)?.effective_weights();

    if let Err(errors) = validate_weights(&weights) {
        anyhow::bail!(
            "Scoring config errors in {}:\n  - {}",
            path.display(),
            errors.join("\n  - ")
        );
    }

    Ok(weights)
}
