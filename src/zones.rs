//! Training zone distribution and polarization analysis
//!
//! Maps the four workout types onto intensity zones, computes the share of
//! each over the supplied window, and scores the training mix against the
//! 80/20 polarization heuristic.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::models::{WorkoutRecord, WorkoutType};

/// Percentage share of each workout type over the analyzed window
///
/// Shares sum to 100 (within floating point rounding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDistribution {
    /// Zone 1: recovery runs
    pub recovery_pct: f64,
    /// Zone 2: endurance runs
    pub endurance_pct: f64,
    /// Zone 3: tempo / race-pace runs
    pub tempo_pct: f64,
    /// Zone 4: interval / speed work
    pub interval_pct: f64,
}

/// Assessment of the intensity mix against the 80/20 principle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBalance {
    /// Low-intensity share in [75, 85]: follows the 80/20 principle
    Excellent,
    /// Low-intensity share in [70, 75): slightly more intense than recommended
    Good,
    /// Low-intensity share below 70: too much high intensity
    TooIntense,
    /// Low-intensity share above 85: could add some intensity
    VeryConservative,
}

impl std::fmt::Display for IntensityBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            IntensityBalance::Excellent => "excellent - follows the 80/20 principle",
            IntensityBalance::Good => "good - slightly more intensity than recommended",
            IntensityBalance::TooIntense => "warning - too much high intensity training",
            IntensityBalance::VeryConservative => {
                "very conservative - could benefit from more intensity"
            }
        };
        write!(f, "{label}")
    }
}

/// Zone-specific recommendations; each fires only when its rule triggers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecommendations {
    pub endurance: Option<String>,
    pub interval: Option<String>,
    pub recovery: Option<String>,
}

/// Complete training zone analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingZoneAnalysis {
    pub zone_distribution: ZoneDistribution,
    pub recommendations: ZoneRecommendations,
    /// Share of low-intensity training (endurance + recovery), [0, 100]
    pub polarization_index: f64,
    pub intensity_balance: IntensityBalance,
}

/// Training zone analysis engine
pub struct ZoneAnalyzer;

impl ZoneAnalyzer {
    /// Compute zone distribution and polarization over the full window
    ///
    /// Fails with `EmptyInput` when no workouts are supplied (the shares
    /// would otherwise divide by zero).
    pub fn analyze(workouts: &[WorkoutRecord]) -> Result<TrainingZoneAnalysis> {
        if workouts.is_empty() {
            return Err(AnalyticsError::EmptyInput {
                analysis: "training zone analysis",
            });
        }

        let distribution = Self::zone_distribution(workouts);
        let polarization_index = Self::polarization_index(workouts);

        Ok(TrainingZoneAnalysis {
            recommendations: Self::recommendations(&distribution),
            intensity_balance: Self::intensity_balance(polarization_index),
            zone_distribution: distribution,
            polarization_index,
        })
    }

    fn zone_distribution(workouts: &[WorkoutRecord]) -> ZoneDistribution {
        let total = workouts.len() as f64;
        let share = |workout_type: WorkoutType| {
            workouts
                .iter()
                .filter(|w| w.workout_type == workout_type)
                .count() as f64
                / total
                * 100.0
        };

        ZoneDistribution {
            recovery_pct: share(WorkoutType::Recovery),
            endurance_pct: share(WorkoutType::Endurance),
            tempo_pct: share(WorkoutType::Tempo),
            interval_pct: share(WorkoutType::Interval),
        }
    }

    /// Share of low-intensity workouts per the 80/20 model
    fn polarization_index(workouts: &[WorkoutRecord]) -> f64 {
        let low_intensity = workouts
            .iter()
            .filter(|w| w.workout_type.is_low_intensity())
            .count();
        low_intensity as f64 / workouts.len() as f64 * 100.0
    }

    fn intensity_balance(polarization: f64) -> IntensityBalance {
        if (75.0..=85.0).contains(&polarization) {
            IntensityBalance::Excellent
        } else if (70.0..75.0).contains(&polarization) {
            IntensityBalance::Good
        } else if polarization < 70.0 {
            IntensityBalance::TooIntense
        } else {
            IntensityBalance::VeryConservative
        }
    }

    fn recommendations(distribution: &ZoneDistribution) -> ZoneRecommendations {
        let mut recommendations = ZoneRecommendations::default();

        if distribution.endurance_pct < 60.0 {
            recommendations.endurance = Some("Increase base endurance volume".to_string());
        }
        if distribution.interval_pct > 20.0 {
            recommendations.interval =
                Some("Reduce the frequency of intense sessions".to_string());
        }
        if distribution.recovery_pct < 10.0 {
            recommendations.recovery = Some("Add more recovery sessions".to_string());
        }

        recommendations
    }
}
