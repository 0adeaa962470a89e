//! Recall configuration via `recall.toml`
//!
//! The config holds the weights used to blend the ranking signals. Every key
//! is optional; missing keys fall back to the defaults that reproduce the
//! observed ranking behavior.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name conventionally used for recall settings.
pub const CONFIG_FILE_NAME: &str = "recall.toml";

/// Weights applied to each ranking signal
///
/// `total = relevance * tfidf + recency * time + affinity + frequency * ln(1 + count)`
///
/// where `affinity` is `session_affinity` when the candidate was executed by
/// the calling session and `0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Multiplier for the summed tf-idf relevance (default 1.0)
    pub relevance: f32,
    /// Multiplier for the `-log10(1 + age_secs)` time score (default 1.0)
    pub recency: f32,
    /// Bonus for commands the calling session executed itself (default 100.0)
    pub session_affinity: f32,
    /// Multiplier for the `ln(1 + occurrence_count)` repetition signal.
    ///
    /// Defaults to 0.0: the signal is computed and logged but does not
    /// contribute to the total.
    pub frequency: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            relevance: 1.0,
            recency: 1.0,
            session_affinity: 100.0,
            frequency: 0.0,
        }
    }
}

impl ScoringWeights {
    /// Builder: set the repetition-frequency weight
    pub fn with_frequency(mut self, weight: f32) -> Self {
        self.frequency = weight;
        self
    }

    /// Builder: set the session affinity bonus
    pub fn with_session_affinity(mut self, bonus: f32) -> Self {
        self.session_affinity = bonus;
        self
    }

    /// Reject weights that would poison every comparison (NaN, infinities)
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("relevance", self.relevance),
            ("recency", self.recency),
            ("session_affinity", self.session_affinity),
            ("frequency", self.frequency),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(Error::InvalidConfig(format!(
                    "scoring.{} must be a finite number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Recall configuration loaded from `recall.toml`.
///
/// # Example
///
/// ```toml
/// [scoring]
/// relevance = 1.0
/// recency = 1.0
/// session_affinity = 100.0
/// frequency = 0.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    /// Ranking signal weights
    pub scoring: ScoringWeights,
}

impl RecallConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Recall configuration
#
# Ranking blends four signals for each search candidate:
#   total = relevance * tfidf
#         + recency * -log10(1 + age_secs)
#         + session_affinity   (only if the calling terminal ran the command)
#         + frequency * ln(1 + occurrence_count)
[scoring]
relevance = 1.0
recency = 1.0
session_affinity = 100.0

# Repetition frequency is computed and logged but does not count by default.
frequency = 0.0
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed TOML and `InvalidConfig` for
    /// non-finite weights.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RecallConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate every section of the config.
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()
    }
}
