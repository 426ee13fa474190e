//! Crosser thresholds and defaults.

use crate::error::{CrossError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosserConfig {
    /// Minimum uniqueness ratio (exclusive) for a column to count as identifier-like.
    pub uniqueness_threshold: f64,

    /// Minimum overlap (exclusive) for a cross-name candidate to be reported.
    pub cross_name_min_overlap: f64,

    /// Minimum score (exclusive) for a multi-dataset crossing suggestion.
    pub suggestion_min_score: f64,

    /// Minimum jaro-winkler similarity (inclusive) for a column-name hint.
    pub name_similarity_threshold: f64,

    /// Suffixes applied to colliding column names of the first and second table.
    pub default_suffixes: (String, String),
}

impl Default for CrosserConfig {
    fn default() -> Self {
        Self {
            uniqueness_threshold: 0.5,
            cross_name_min_overlap: 0.1,
            suggestion_min_score: 0.2,
            name_similarity_threshold: 0.85,
            default_suffixes: ("_1".to_string(), "_2".to_string()),
        }
    }
}

impl CrosserConfig {
    /// Defaults overridden by `CROSSER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            uniqueness_threshold: env_f64("CROSSER_UNIQUENESS_THRESHOLD", defaults.uniqueness_threshold)?,
            cross_name_min_overlap: env_f64("CROSSER_CROSS_NAME_MIN_OVERLAP", defaults.cross_name_min_overlap)?,
            suggestion_min_score: env_f64("CROSSER_SUGGESTION_MIN_SCORE", defaults.suggestion_min_score)?,
            name_similarity_threshold: env_f64(
                "CROSSER_NAME_SIMILARITY_THRESHOLD",
                defaults.name_similarity_threshold,
            )?,
            default_suffixes: (
                std::env::var("CROSSER_SUFFIX_A").unwrap_or(defaults.default_suffixes.0),
                std::env::var("CROSSER_SUFFIX_B").unwrap_or(defaults.default_suffixes.1),
            ),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("uniqueness_threshold", self.uniqueness_threshold),
            ("cross_name_min_overlap", self.cross_name_min_overlap),
            ("suggestion_min_score", self.suggestion_min_score),
            ("name_similarity_threshold", self.name_similarity_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(CrossError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        let (a, b) = &self.default_suffixes;
        if a.is_empty() || b.is_empty() {
            return Err(CrossError::Config("Suffixes must not be empty".to_string()));
        }
        if a == b {
            return Err(CrossError::Config(format!(
                "Suffixes must differ, both are '{}'",
                a
            )));
        }
        Ok(())
    }
}

fn env_f64(key: &str, default: f64) -> Result<f64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|e| CrossError::Config(format!("{}='{}' is not a number: {}", key, raw, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CrosserConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.uniqueness_threshold, 0.5);
        assert_eq!(config.cross_name_min_overlap, 0.1);
        assert_eq!(config.suggestion_min_score, 0.2);
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let config = CrosserConfig {
            cross_name_min_overlap: 1.5,
            ..CrosserConfig::default()
        };
        assert!(matches!(config.validate(), Err(CrossError::Config(_))));
    }

    #[test]
    fn test_rejects_identical_suffixes() {
        let config = CrosserConfig {
            default_suffixes: ("_x".to_string(), "_x".to_string()),
            ..CrosserConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
