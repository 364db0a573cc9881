/// Engine configuration, loaded from RON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::filter::ContentSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for event selection. Every field has a default, so a config
/// file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub specific_chance: f64,
    pub specific_chance_post_gig: f64,
    pub template_chance: f64,
    pub max_filter_retries: u32,
    /// Weekly event chance for a calm band on the standard campaign.
    pub weekly_event_floor: f64,
    pub weekly_event_ceiling: f64,
    pub content: ContentSettings,
    /// Extra template files merged over the built-in families, in order.
    pub template_files: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            specific_chance: 0.3,
            specific_chance_post_gig: 0.5,
            template_chance: 0.3,
            max_filter_retries: 5,
            weekly_event_floor: 0.3,
            weekly_event_ceiling: 0.8,
            content: ContentSettings::default(),
            template_files: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn load_from_ron(path: &Path) -> Result<EngineConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<EngineConfig, ConfigError> {
        let config: EngineConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let chances = [
            ("specific_chance", self.specific_chance),
            ("specific_chance_post_gig", self.specific_chance_post_gig),
            ("template_chance", self.template_chance),
            ("weekly_event_floor", self.weekly_event_floor),
            ("weekly_event_ceiling", self.weekly_event_ceiling),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.weekly_event_floor > self.weekly_event_ceiling {
            return Err(ConfigError::Invalid(
                "weekly_event_floor is above weekly_event_ceiling".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::event::MaturityLevel;

    #[test]
    fn empty_config_is_all_defaults() {
        let config = EngineConfig::parse_ron("()").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_filter_retries, 5);
    }

    #[test]
    fn partial_config_overrides() {
        let config = EngineConfig::parse_ron(
            "(seed: Some(7), template_chance: 0.5, content: (enabled: true, maturity: mature))",
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.template_chance, 0.5);
        assert_eq!(config.specific_chance, 0.3);
        assert!(config.content.enabled);
        assert_eq!(config.content.maturity, MaturityLevel::Mature);
    }

    #[test]
    fn rejects_out_of_range_chances() {
        let err = EngineConfig::parse_ron("(specific_chance: 1.5)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = EngineConfig::parse_ron("(weekly_event_floor: 0.9, weekly_event_ceiling: 0.2)")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_ron_is_a_ron_error() {
        assert!(matches!(
            EngineConfig::parse_ron("(seed: "),
            Err(ConfigError::Ron(_))
        ));
    }
}
