//! Trainer configuration
//!
//! Everything the host supplies at startup lives here. Values are read from a
//! TOML file; any field left out falls back to its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::core::error::{Result, TrainerError};
use crate::encoder::FIELD_DELIMITER;

/// Configuration for a training session
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Durable record store for the knowledge base
    ///
    /// Replaced atomically after every feedback submission. A missing file
    /// means a cold start with no observations.
    pub knowledge_path: PathBuf,

    /// External resource holding the level-code prefix
    ///
    /// The contents are opaque to the trainer and copied verbatim into every
    /// level code (minus trailing line terminators).
    pub prefix_path: PathBuf,

    /// Location tags a round can be placed in
    ///
    /// One is drawn uniformly at random per round. Tags end up inside the
    /// level code, so they must not contain the encoder's field delimiter.
    pub locations: Vec<String>,

    /// Inclusive upper bound for the per-round seed value
    pub seed_max: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            knowledge_path: PathBuf::from("knowledge.bin"),
            prefix_path: PathBuf::from("prefix.txt"),
            locations: vec![
                "caverns".into(),
                "foundry".into(),
                "skyway".into(),
                "depths".into(),
            ],
            seed_max: u32::MAX as u64,
        }
    }
}

impl TrainerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: TrainerConfig = toml::from_str(&contents)?;
        config.validate()?;
        debug!(?path, "loaded trainer config");
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.locations.is_empty() {
            return Err(TrainerError::Config("at least one location is required".into()));
        }

        if let Some(bad) = self
            .locations
            .iter()
            .find(|tag| tag.is_empty() || tag.contains(FIELD_DELIMITER))
        {
            return Err(TrainerError::Config(format!(
                "location tag {:?} must be non-empty and free of '{}'",
                bad, FIELD_DELIMITER
            )));
        }

        Ok(())
    }

    /// Read the level-code prefix from `prefix_path`
    ///
    /// A missing or unreadable resource yields an empty prefix.
    pub fn load_prefix(&self) -> String {
        match fs::read_to_string(&self.prefix_path) {
            Ok(raw) => raw.trim_end_matches(&['\r', '\n'][..]).to_string(),
            Err(e) => {
                warn!(path = ?self.prefix_path, error = %e, "prefix unavailable, using empty prefix");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TrainerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_locations_rejected() {
        let config = TrainerConfig { locations: vec![], ..Default::default() };
        assert!(matches!(config.validate(), Err(TrainerError::Config(_))));
    }

    #[test]
    fn test_delimiter_in_location_rejected() {
        let config = TrainerConfig {
            locations: vec![format!("bad{}tag", FIELD_DELIMITER)],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TrainerConfig = toml::from_str("knowledge_path = \"kb.bin\"").unwrap();
        assert_eq!(config.knowledge_path, PathBuf::from("kb.bin"));
        assert_eq!(config.locations.len(), 4);
        assert_eq!(config.seed_max, u32::MAX as u64);
    }

    #[test]
    fn test_prefix_strips_line_terminators_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefix.txt");
        fs::write(&path, "  ck:v2 \r\n").unwrap();

        let config = TrainerConfig { prefix_path: path, ..Default::default() };
        assert_eq!(config.load_prefix(), "  ck:v2 ");
    }

    #[test]
    fn test_missing_prefix_is_empty() {
        let config = TrainerConfig {
            prefix_path: PathBuf::from("/nonexistent/prefix.txt"),
            ..Default::default()
        };
        assert_eq!(config.load_prefix(), "");
    }
}
