use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tournament::{TierRule, TierWeights, default_tier_rules};

pub const CONFIG_PATH_ENV: &str = "TENNIS_EDGE_CONFIG";
pub const THRESHOLD_ENV: &str = "TENNIS_EDGE_THRESHOLD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct H2hConfig {
    pub base_points: f64,
    /// Applied to meetings at most 180 days old.
    pub very_recent_multiplier: f64,
    /// Applied to meetings at most 365 days old.
    pub recent_multiplier: f64,
    /// Applied to meetings more than 730 days old.
    pub stale_multiplier: f64,
    pub dominance_bonus: f64,
    pub quality_bonus: f64,
    pub max_points: f64,
}

impl Default for H2hConfig {
    fn default() -> Self {
        Self {
            base_points: 8.0,
            very_recent_multiplier: 2.0,
            recent_multiplier: 1.5,
            stale_multiplier: 0.5,
            dominance_bonus: 10.0,
            quality_bonus: 5.0,
            max_points: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub window: usize,
    pub per_win_points: f64,
    pub recent_swing_bonus: f64,
    pub win_streak_bonus: f64,
    pub win_streak_length: usize,
    pub quality_bonus: f64,
    pub fatigue_penalty: f64,
    pub busy_penalty: f64,
    pub inactivity_penalty: f64,
    pub freshness_bonus: f64,
    pub max_points: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            window: 10,
            per_win_points: 3.0,
            recent_swing_bonus: 5.0,
            win_streak_bonus: 8.0,
            win_streak_length: 5,
            quality_bonus: 5.0,
            fatigue_penalty: 5.0,
            busy_penalty: 2.0,
            inactivity_penalty: 3.0,
            freshness_bonus: 3.0,
            max_points: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub winrate_multiplier: f64,
    pub specialist_bonus: f64,
    pub experience_bonus: f64,
    pub recent_form_multiplier: f64,
    pub transition_bonus: f64,
    pub transition_partial_bonus: f64,
    pub transition_penalty: f64,
    pub max_points: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            winrate_multiplier: 25.0,
            specialist_bonus: 8.0,
            experience_bonus: 5.0,
            recent_form_multiplier: 10.0,
            transition_bonus: 5.0,
            transition_partial_bonus: 3.0,
            transition_penalty: 3.0,
            max_points: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub streak_bonus: f64,
    pub confidence_bonus: f64,
    pub max_points: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            streak_bonus: 5.0,
            confidence_bonus: 5.0,
            max_points: 10.0,
        }
    }
}

/// Lower bounds of the confidence tiers, in points of |total score|.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceCuts {
    pub very_high: f64,
    pub high: f64,
    pub medium: f64,
}

impl Default for ConfidenceCuts {
    fn default() -> Self {
        Self {
            very_high: 60.0,
            high: 50.0,
            medium: 40.0,
        }
    }
}

/// Every weight, cap and threshold the engine reads. Built once, shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub h2h: H2hConfig,
    pub form: FormConfig,
    pub surface: SurfaceConfig,
    pub momentum: MomentumConfig,
    pub threshold: f64,
    pub adaptive_threshold: bool,
    /// Threshold reduction per missing factor while H2H is present.
    pub threshold_relax_step: f64,
    /// Threshold increase when H2H is missing.
    pub missing_h2h_penalty: f64,
    pub probability_scale: f64,
    pub confidence: ConfidenceCuts,
    pub tier_weights: TierWeights,
    pub tier_rules: Vec<TierRule>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            h2h: H2hConfig::default(),
            form: FormConfig::default(),
            surface: SurfaceConfig::default(),
            momentum: MomentumConfig::default(),
            threshold: 45.0,
            adaptive_threshold: true,
            threshold_relax_step: 5.0,
            missing_h2h_penalty: 5.0,
            probability_scale: 10.0,
            confidence: ConfidenceCuts::default(),
            tier_weights: TierWeights::default(),
            tier_rules: default_tier_rules(),
        }
    }
}

impl ScoringConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: ScoringConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Resolves the config for a binary: file named by `TENNIS_EDGE_CONFIG` (or defaults),
    /// then scalar overrides from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = match lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            Some(path) => Self::load(Path::new(path.trim()))?,
            None => Self::default(),
        };
        cfg.apply_overrides(&lookup)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(raw) = lookup(THRESHOLD_ENV) {
            self.threshold = raw.trim().parse::<f64>().map_err(|_| ConfigError::Invalid {
                field: "threshold",
                reason: format!("{THRESHOLD_ENV}={raw} is not a number"),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let caps = [
            ("h2h.max_points", self.h2h.max_points),
            ("form.max_points", self.form.max_points),
            ("surface.max_points", self.surface.max_points),
            ("momentum.max_points", self.momentum.max_points),
        ];
        for (field, cap) in caps {
            if !cap.is_finite() || cap < 0.0 {
                return Err(invalid(field, format!("cap must be a finite non-negative number, got {cap}")));
            }
        }

        let scalars = [
            ("threshold", self.threshold),
            ("threshold_relax_step", self.threshold_relax_step),
            ("missing_h2h_penalty", self.missing_h2h_penalty),
            ("h2h.base_points", self.h2h.base_points),
            ("form.per_win_points", self.form.per_win_points),
            ("surface.winrate_multiplier", self.surface.winrate_multiplier),
        ];
        for (field, v) in scalars {
            if !v.is_finite() {
                return Err(invalid(field, format!("must be finite, got {v}")));
            }
        }

        if !self.probability_scale.is_finite() || self.probability_scale <= 0.0 {
            return Err(invalid(
                "probability_scale",
                format!("must be positive, got {}", self.probability_scale),
            ));
        }

        let c = self.confidence;
        if !(c.very_high >= c.high && c.high >= c.medium) {
            return Err(invalid(
                "confidence",
                format!(
                    "cuts must be descending, got {}/{}/{}",
                    c.very_high, c.high, c.medium
                ),
            ));
        }

        if self.form.window == 0 {
            return Err(invalid("form.window", "must hold at least one match".to_string()));
        }

        for w in self.tier_weights.all() {
            if !w.is_finite() || w < 0.0 {
                return Err(invalid("tier_weights", format!("weight must be non-negative, got {w}")));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
