//! Engine tuning knobs.

use crate::export::{DEFAULT_EXPORT_HEIGHT, DEFAULT_EXPORT_WIDTH};
use crate::hit_test::HIT_TOLERANCE;
use crate::tools::MIN_SAMPLE_DIST_SQ;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Configuration for a [`crate::Whiteboard`] session.
///
/// Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Eraser slack for stroked shapes, in canvas units.
    pub hit_tolerance: f64,
    /// Squared distance a pencil sample must exceed to be kept.
    pub sample_threshold_sq: f64,
    /// Cap on stored undo states; `None` keeps everything.
    pub max_undo_depth: Option<usize>,
    pub export_width: u32,
    pub export_height: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: HIT_TOLERANCE,
            sample_threshold_sq: MIN_SAMPLE_DIST_SQ,
            max_undo_depth: None,
            export_width: DEFAULT_EXPORT_WIDTH,
            export_height: DEFAULT_EXPORT_HEIGHT,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        // serde also accepts a sequence for a struct.
        if !value.is_object() {
            return Err(ConfigError::Invalid("config must be a JSON object".to_string()));
        }
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.hit_tolerance.is_finite() && self.hit_tolerance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "hit_tolerance must be a non-negative number, got {}",
                self.hit_tolerance
            )));
        }
        if !(self.sample_threshold_sq.is_finite() && self.sample_threshold_sq >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "sample_threshold_sq must be a non-negative number, got {}",
                self.sample_threshold_sq
            )));
        }
        if self.max_undo_depth == Some(0) {
            return Err(ConfigError::Invalid(
                "max_undo_depth must be at least 1, omit it for no cap".to_string(),
            ));
        }
        if self.export_width == 0 || self.export_height == 0 {
            return Err(ConfigError::Invalid("export size must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.hit_tolerance, 6.0);
        assert_eq!(config.sample_threshold_sq, 4.0);
        assert_eq!(config.max_undo_depth, None);
        assert_eq!((config.export_width, config.export_height), (3000, 3000));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EngineConfig::from_json(r#"{"hit_tolerance": 10, "max_undo_depth": 50}"#).unwrap();
        assert_eq!(config.hit_tolerance, 10.0);
        assert_eq!(config.max_undo_depth, Some(50));
        assert_eq!(config.sample_threshold_sq, 4.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"hit_tolerance": -1}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"export_width": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"max_undo_depth": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_non_object_json() {
        assert!(matches!(EngineConfig::from_json("[]"), Err(ConfigError::Invalid(_))));
        assert!(matches!(EngineConfig::from_json("7"), Err(ConfigError::Invalid(_))));
        assert!(matches!(EngineConfig::from_json("{"), Err(ConfigError::Json(_))));
        assert!(matches!(
            EngineConfig::from_json(r#"{"hit_tolerance": "wide"}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
