//! Generator configuration.
//!
//! Loaded from a TOML file; any missing table or field falls back to its default.
//!
//! ```toml
//! [corridor]
//! step_counts = [1, 2, 3]
//! step_weights = [5, 3, 2]
//! min_segment_length = 1
//! max_segment_length = 3
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Most segments one corridor chain may have.
pub const MAX_CORRIDOR_STEPS: u32 = 32;
/// Upper limit for `max_segment_length`.
pub const MAX_SEGMENT_LENGTH: i32 = 64;

/// Errors raised while loading a [`GeneratorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub corridor: CorridorConfig,
}

/// Shape of the corridor chain grown from each connection point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    /// Possible numbers of segments in one chain.
    pub step_counts: Vec<u32>,
    /// Relative weight of each entry in `step_counts`.
    pub step_weights: Vec<u32>,
    /// Shortest segment length, inclusive.
    pub min_segment_length: i32,
    /// Longest segment length, exclusive.
    pub max_segment_length: i32,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            step_counts: vec![1, 2, 3],
            step_weights: vec![5, 3, 2],
            min_segment_length: 1,
            max_segment_length: 3,
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or the defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let corridor = &self.corridor;
        if corridor.step_counts.is_empty() {
            return Err(ConfigError::Invalid("corridor.step_counts is empty".into()));
        }
        if corridor.step_counts.len() != corridor.step_weights.len() {
            return Err(ConfigError::Invalid(format!(
                "corridor.step_counts has {} entries but corridor.step_weights has {}",
                corridor.step_counts.len(),
                corridor.step_weights.len()
            )));
        }
        if let Some(steps) = corridor
            .step_counts
            .iter()
            .find(|steps| **steps > MAX_CORRIDOR_STEPS)
        {
            return Err(ConfigError::Invalid(format!(
                "corridor.step_counts entry {steps} exceeds {MAX_CORRIDOR_STEPS}"
            )));
        }
        if corridor.step_weights.iter().all(|weight| *weight == 0) {
            return Err(ConfigError::Invalid(
                "corridor.step_weights must not all be zero".into(),
            ));
        }
        if corridor.min_segment_length < 1
            || corridor.min_segment_length >= corridor.max_segment_length
            || corridor.max_segment_length > MAX_SEGMENT_LENGTH
        {
            return Err(ConfigError::Invalid(format!(
                "corridor segment lengths must satisfy 1 <= min < max <= {MAX_SEGMENT_LENGTH}, got {}..{}",
                corridor.min_segment_length, corridor.max_segment_length
            )));
        }
        Ok(())
    }
}
