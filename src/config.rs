//! Engine configuration
//!
//! The empirical constants behind the prediction formula were calibrated
//! informally, so they live here as tunable settings rather than hard-coded
//! literals. Defaults reproduce the documented calibration; a TOML config
//! file can override any of them pending recalibration against real race
//! outcomes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Single-workout analyzer settings
    pub analyzer: AnalyzerSettings,

    /// Race-time prediction settings
    pub prediction: PredictionSettings,
}

/// Constants used by the single-workout analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Assumed maximum heart rate (bpm) for zone proximity scoring
    pub assumed_max_hr: f64,

    /// Fallback pace (seconds/km) for convenience substitution paths
    pub default_pace_seconds: u32,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            assumed_max_hr: 185.0,
            default_pace_seconds: 300,
        }
    }
}

/// Empirical race-prediction parameters
///
/// Distance-band pace factors scale the runner's best recent training pace
/// to a sustainable race pace for the target distance. The fitness
/// multiplier thresholds adjust for weekly volume, consistency, and recency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionSettings {
    /// Pace factor for races up to 5 km
    pub factor_5k: f64,
    /// Pace factor for races up to 10 km
    pub factor_10k: f64,
    /// Pace factor for races up to the half marathon (21.1 km)
    pub factor_half_marathon: f64,
    /// Pace factor for races up to the marathon (42.2 km)
    pub factor_marathon: f64,
    /// Pace factor beyond marathon distance
    pub factor_ultra: f64,

    /// Weekly volume (km) above which the pace multiplier improves
    pub high_volume_km: f64,
    pub high_volume_multiplier: f64,
    /// Weekly volume (km) below which the pace multiplier worsens
    pub low_volume_km: f64,
    pub low_volume_multiplier: f64,

    /// Consistency score above which the pace multiplier improves
    pub high_consistency: f64,
    pub high_consistency_multiplier: f64,
    /// Consistency score below which the pace multiplier worsens
    pub low_consistency: f64,
    pub low_consistency_multiplier: f64,

    /// Days without training after which detraining applies
    pub detraining_days: f64,
    pub detraining_multiplier: f64,

    /// Race countdown (days) assumed when the target date is unparsable
    pub default_days_to_race: i64,

    /// Maximum projected improvement over a full training block
    pub max_improvement: f64,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            factor_5k: 0.95,
            factor_10k: 0.98,
            factor_half_marathon: 1.05,
            factor_marathon: 1.15,
            factor_ultra: 1.25,
            high_volume_km: 50.0,
            high_volume_multiplier: 0.95,
            low_volume_km: 20.0,
            low_volume_multiplier: 1.05,
            high_consistency: 0.8,
            high_consistency_multiplier: 0.97,
            low_consistency: 0.3,
            low_consistency_multiplier: 1.03,
            detraining_days: 14.0,
            detraining_multiplier: 1.08,
            default_days_to_race: 60,
            max_improvement: 0.03,
        }
    }
}

impl AnalyticsConfig {
    /// Default config file location (`<config_dir>/runsight/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("runsight").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AnalyticsConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load from the given path, or fall back to defaults when absent
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::load(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Persist configuration as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
