//! Run document loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use types::SimConfig;

/// Read, parse and validate a JSON run document.
pub fn load_config(path: &Path) -> Result<SimConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = parse_config(&text).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<SimConfig> {
    let config: SimConfig = serde_json::from_str(text).context("malformed run document")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let text = r#"{
            "world": { "opportunities": 10, "batch_size": 5, "mechanism": "vcg" },
            "sellers": [
                {
                    "id": "a",
                    "daily_budget": 10.0,
                    "value_per_conversion": 2.0,
                    "policy": "aggressive"
                }
            ]
        }"#;
        let config = parse_config(text).unwrap();
        assert_eq!(config.world.block_count(), 2);
        assert_eq!(config.sellers[0].brand, "generic");
    }

    #[test]
    fn test_validation_runs_on_load() {
        let text = r#"{ "world": { "slots": 4 }, "sellers": [
            { "id": "a", "daily_budget": 10.0, "value_per_conversion": 2.0,
              "policy": "aggressive" } ] }"#;
        let err = parse_config(text).unwrap_err();
        assert!(err.downcast_ref::<types::ConfigError>().is_some());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_config(Path::new("does/not/exist.json")).is_err());
    }
}
