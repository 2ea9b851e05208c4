use crate::core::engine::DEFAULT_TOP_N;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Mining thresholds and query defaults, loadable from TOML.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RecommenderConfig {
    /// Minimum itemset support, in (0, 1]
    #[serde(default = "default_min_support")]
    pub min_support: f64,

    /// Minimum rule confidence, in (0, 1]
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Recommendations returned when the caller does not ask for a count
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Score attached to popularity fallbacks
    #[serde(default = "default_fallback_score")]
    pub fallback_score: f64,
}

fn default_min_support() -> f64 {
    0.2
}

fn default_min_confidence() -> f64 {
    0.5
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_fallback_score() -> f64 {
    0.5
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            min_support: default_min_support(),
            min_confidence: default_min_confidence(),
            top_n: default_top_n(),
            fallback_score: default_fallback_score(),
        }
    }
}

impl RecommenderConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |v: f64| v > 0.0 && v <= 1.0;
        if !unit(self.min_support) {
            return Err(ConfigError::Invalid(format!(
                "min_support must be in (0, 1], got {}",
                self.min_support
            )));
        }
        if !unit(self.min_confidence) {
            return Err(ConfigError::Invalid(format!(
                "min_confidence must be in (0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.fallback_score) {
            return Err(ConfigError::Invalid(format!(
                "fallback_score must be in [0, 1], got {}",
                self.fallback_score
            )));
        }
        Ok(())
    }
}
