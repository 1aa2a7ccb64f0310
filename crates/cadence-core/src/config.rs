//! Study configuration
//!
//! Defaults, JSON file loading, and `CADENCE_*` environment overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fsrs::{SchedulerParameters, DEFAULT_RETENTION, FSRS_WEIGHTS};
use crate::progress::{ProgressThresholds, XpTable};

/// Env var overriding [`StudyConfig::new_cards_limit`]
pub const ENV_NEW_CARDS_LIMIT: &str = "CADENCE_NEW_CARDS_LIMIT";

/// Env var overriding [`StudyConfig::desired_retention`]
pub const ENV_DESIRED_RETENTION: &str = "CADENCE_DESIRED_RETENTION";

/// Configuration error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything a study session needs besides the clock and the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyConfig {
    /// Maximum never-reviewed items per session
    pub new_cards_limit: usize,
    /// Recall probability targeted when an item comes due
    pub desired_retention: f64,
    /// Recalibrated weight table; `None` uses the built-in defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<[f64; 17]>,
    pub advanced_unlock_stability: f64,
    pub health_stability_threshold: f64,
    pub weak_difficulty_threshold: f64,
    pub strong_stability_threshold: f64,
    pub xp: XpTable,
}

impl Default for StudyConfig {
    fn default() -> Self {
        let thresholds = ProgressThresholds::default();
        Self {
            new_cards_limit: 20,
            desired_retention: DEFAULT_RETENTION,
            weights: None,
            advanced_unlock_stability: thresholds.advanced_unlock_stability,
            health_stability_threshold: thresholds.health_stability,
            weak_difficulty_threshold: thresholds.weak_difficulty,
            strong_stability_threshold: thresholds.strong_stability,
            xp: thresholds.xp,
        }
    }
}

impl StudyConfig {
    /// Read a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: StudyConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CADENCE_*` env vars. Unparseable values are ignored with a warning.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(ENV_NEW_CARDS_LIMIT) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => self.new_cards_limit = limit,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid {}", ENV_NEW_CARDS_LIMIT),
            }
        }
        if let Ok(raw) = std::env::var(ENV_DESIRED_RETENTION) {
            match raw.trim().parse::<f64>() {
                Ok(r) if r > 0.0 && r < 1.0 => self.desired_retention = r,
                _ => tracing::warn!(value = %raw, "Ignoring invalid {}", ENV_DESIRED_RETENTION),
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.desired_retention > 0.0 && self.desired_retention < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "desiredRetention must be in (0, 1), got {}",
                self.desired_retention
            )));
        }
        if let Some(weights) = &self.weights {
            if weights.iter().any(|w| !w.is_finite()) {
                return Err(ConfigError::Invalid("weights must be finite".to_string()));
            }
        }
        for (name, value) in [
            ("advancedUnlockStability", self.advanced_unlock_stability),
            ("healthStabilityThreshold", self.health_stability_threshold),
            ("weakDifficultyThreshold", self.weak_difficulty_threshold),
            ("strongStabilityThreshold", self.strong_stability_threshold),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }
        Ok(())
    }

    pub fn scheduler_parameters(&self) -> SchedulerParameters {
        SchedulerParameters {
            weights: self.weights.unwrap_or(FSRS_WEIGHTS),
            desired_retention: self.desired_retention,
        }
    }

    pub fn progress_thresholds(&self) -> ProgressThresholds {
        ProgressThresholds {
            advanced_unlock_stability: self.advanced_unlock_stability,
            health_stability: self.health_stability_threshold,
            weak_difficulty: self.weak_difficulty_threshold,
            strong_stability: self.strong_stability_threshold,
            xp: self.xp,
        }
    }
}
