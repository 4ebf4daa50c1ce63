//! Tunable parameters of the targeted analysis pipeline.
//!
//! Every value defaults to the constant the service has always used; the
//! struct only exists so callers can override them without patching code.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::genomics::ScoringScheme;

/// Number of leading reference bases used as the exact-match anchor.
pub const DEFAULT_ANCHOR_LEN: usize = 20;
/// Bases kept on either side of an anchored reference region.
pub const DEFAULT_FLANK: usize = 100;
/// Aligned reference symbols reported on each side of a called variant.
pub const DEFAULT_CONTEXT_RADIUS: usize = 5;
/// Match percentage below which an analysis is flagged as low similarity.
pub const LOW_SIMILARITY_THRESHOLD: f64 = 80.0;
/// Largest magnitude accepted for any single scoring value.
pub const MAX_SCORE_MAGNITUDE: i32 = 1_000;

/// Configuration for a targeted analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Scoring passed to the global aligner.
    pub scoring: ScoringScheme,

    /// Anchor length for the exact-match region search.
    pub anchor_len: usize,

    /// Flanking bases extracted around an anchored region.
    pub flank: usize,

    /// Context half-width reported with each mutation call.
    pub context_radius: usize,

    /// Match percentage (0-100) under which a warning is attached.
    pub low_similarity_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringScheme::default(),
            anchor_len: DEFAULT_ANCHOR_LEN,
            flank: DEFAULT_FLANK,
            context_radius: DEFAULT_CONTEXT_RADIUS,
            low_similarity_threshold: LOW_SIMILARITY_THRESHOLD,
        }
    }
}

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Anchor length of zero would match everywhere.
    #[error("anchor length must be greater than zero")]
    ZeroAnchor,

    /// Threshold outside the percentage range.
    #[error("low similarity threshold {0} is outside [0, 100]")]
    ThresholdOutOfRange(f64),

    /// A scoring value is too large for the alignment matrix.
    #[error("{field} = {value} exceeds the allowed magnitude {}", MAX_SCORE_MAGNITUDE)]
    ScoreOutOfRange {
        /// Name of the offending scoring field.
        field: &'static str,
        /// Rejected value.
        value: i32,
    },

    /// Configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON for [`AnalysisConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AnalysisConfig {
    /// Override the aligner scoring.
    pub fn with_scoring(mut self, scoring: ScoringScheme) -> Self {
        self.scoring = scoring;
        self
    }

    /// Override the anchor length.
    pub fn with_anchor_len(mut self, anchor_len: usize) -> Self {
        self.anchor_len = anchor_len;
        self
    }

    /// Override the flank width.
    pub fn with_flank(mut self, flank: usize) -> Self {
        self.flank = flank;
        self
    }

    /// Override the reported context radius.
    pub fn with_context_radius(mut self, context_radius: usize) -> Self {
        self.context_radius = context_radius;
        self
    }

    /// Override the low-similarity threshold.
    pub fn with_low_similarity_threshold(mut self, threshold: f64) -> Self {
        self.low_similarity_threshold = threshold;
        self
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.anchor_len == 0 {
            return Err(ConfigError::ZeroAnchor);
        }
        if !(0.0..=100.0).contains(&self.low_similarity_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.low_similarity_threshold));
        }
        let scoring = &self.scoring;
        for (field, value) in [
            ("match_score", scoring.match_score),
            ("mismatch_penalty", scoring.mismatch_penalty),
            ("gap_penalty", scoring.gap_penalty),
        ] {
            if value.unsigned_abs() > MAX_SCORE_MAGNITUDE.unsigned_abs() {
                return Err(ConfigError::ScoreOutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration; missing keys keep defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_named_constants() {
        let config = AnalysisConfig::default();
        assert_eq!(config.anchor_len, 20);
        assert_eq!(config.flank, 100);
        assert_eq!(config.context_radius, 5);
        assert_eq!(config.low_similarity_threshold, 80.0);
        assert_eq!(config.scoring, ScoringScheme::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json_str(r#"{ "flank": 50 }"#).unwrap();
        assert_eq!(config.flank, 50);
        assert_eq!(config.anchor_len, DEFAULT_ANCHOR_LEN);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            AnalysisConfig::default().with_anchor_len(0).validate(),
            Err(ConfigError::ZeroAnchor)
        ));
        assert!(matches!(
            AnalysisConfig::from_json_str(r#"{ "low_similarity_threshold": 120.0 }"#),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json_str(r#"{ "scoring": { "gap_penalty": -2147483648 } }"#),
            Err(ConfigError::ScoreOutOfRange { field: "gap_penalty", .. })
        ));
    }
}
