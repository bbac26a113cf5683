//! Race-time prediction
//!
//! Predicts a race time for a target distance and date from the runner's
//! training history. A trained model is consulted when one is registered for
//! the target's distance bucket; otherwise the empirical distance-banded
//! formula applies. All empirical constants come from
//! [`PredictionSettings`](crate::config::PredictionSettings).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::PredictionSettings;
use crate::features::{FeatureExtractor, FeatureSet};
use crate::models::WorkoutRecord;
use crate::pace;

/// Standard race distance buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBucket {
    FiveK,
    TenK,
    HalfMarathon,
    Marathon,
    Ultra,
}

impl DistanceBucket {
    /// Bucket for a target distance in kilometers
    pub fn for_distance(distance_km: f64) -> Self {
        if distance_km <= 5.0 {
            DistanceBucket::FiveK
        } else if distance_km <= 10.0 {
            DistanceBucket::TenK
        } else if distance_km <= 21.1 {
            DistanceBucket::HalfMarathon
        } else if distance_km <= 42.2 {
            DistanceBucket::Marathon
        } else {
            DistanceBucket::Ultra
        }
    }
}

/// Optional registry of trained per-bucket models
///
/// Consumed, never implemented here: when no registry is supplied or
/// `has_model` is false for the target bucket, the empirical formula is used
/// unconditionally.
pub trait TrainedModelRegistry {
    fn has_model(&self, bucket: DistanceBucket) -> bool;

    /// Predicted total race time in seconds for the given feature vector
    fn predict(&self, features: &FeatureSet, bucket: DistanceBucket) -> f64;
}

/// Current fitness classification from history features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    Beginner,
    Average,
    Good,
    Excellent,
}

impl std::fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FitnessLevel::Beginner => "beginner",
            FitnessLevel::Average => "average",
            FitnessLevel::Good => "good",
            FitnessLevel::Excellent => "excellent",
        };
        write!(f, "{label}")
    }
}

/// Headroom for improvement before race day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementPotential {
    Limited,
    Moderate,
    High,
    VeryHigh,
}

impl std::fmt::Display for ImprovementPotential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ImprovementPotential::Limited => "limited",
            ImprovementPotential::Moderate => "moderate",
            ImprovementPotential::High => "high",
            ImprovementPotential::VeryHigh => "very high",
        };
        write!(f, "{label}")
    }
}

/// Projected intermediate race-time estimate before the target date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestonePrediction {
    /// Days before the race at which this estimate applies
    pub checkpoint_days: i64,
    /// Projected race time at this checkpoint
    pub predicted_time: String,
    /// Expected improvement over today's prediction, in percent
    pub expected_improvement_pct: f64,
    /// Estimate confidence, lower the further the checkpoint is from race day
    pub confidence: f64,
}

/// Complete race prediction result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePrediction {
    pub target_distance_km: f64,
    /// Target date as supplied by the caller
    pub target_date: String,
    /// Predicted race time ("MM:SS" or "H:MM:SS")
    pub predicted_time: String,
    /// Predicted race time in seconds
    pub predicted_seconds: f64,
    /// Prediction confidence, [0, 0.95]
    pub confidence_level: f64,
    pub current_fitness_level: FitnessLevel,
    pub improvement_potential: ImprovementPotential,
    pub training_recommendations: Vec<String>,
    pub milestone_predictions: Vec<MilestonePrediction>,
}

/// Race-time prediction engine
pub struct PerformancePredictor {
    settings: PredictionSettings,
    registry: Option<Box<dyn TrainedModelRegistry>>,
}

impl Default for PerformancePredictor {
    fn default() -> Self {
        Self::new(PredictionSettings::default())
    }
}

impl PerformancePredictor {
    pub fn new(settings: PredictionSettings) -> Self {
        Self {
            settings,
            registry: None,
        }
    }

    /// Attach a trained model registry consulted before the empirical formula
    pub fn with_registry(mut self, registry: Box<dyn TrainedModelRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Predict the race time for a target distance and date
    ///
    /// `now` anchors the race countdown and the recency features and must be
    /// passed explicitly. An unparsable `target_date` falls back to the
    /// configured default countdown; the substitution is logged, never
    /// silent. An empty history predicts from the default beginner profile.
    pub fn predict(
        &self,
        history: &[WorkoutRecord],
        target_distance_km: f64,
        target_date: &str,
        now: DateTime<Utc>,
    ) -> PerformancePrediction {
        let features = FeatureExtractor::extract(history, now);
        let days_to_race = self.days_to_race(target_date, now);
        let bucket = DistanceBucket::for_distance(target_distance_km);

        let predicted_seconds = self.predict_seconds(&features, target_distance_km, bucket);
        let confidence_level = Self::confidence(history, target_distance_km);
        let current_fitness_level = Self::fitness_level(history.len(), &features);
        let improvement_potential =
            Self::improvement_potential(current_fitness_level, days_to_race);

        PerformancePrediction {
            target_distance_km,
            target_date: target_date.to_string(),
            predicted_time: pace::seconds_to_time_string(predicted_seconds),
            predicted_seconds,
            confidence_level,
            current_fitness_level,
            improvement_potential,
            training_recommendations: self.training_recommendations(
                &features,
                target_distance_km,
                days_to_race,
            ),
            milestone_predictions: self.milestones(predicted_seconds, days_to_race),
        }
    }

    /// Days until the race; unparsable dates fall back to the configured
    /// default countdown
    fn days_to_race(&self, target_date: &str, now: DateTime<Utc>) -> i64 {
        let parsed = DateTime::parse_from_rfc3339(target_date)
            .map(|d| d.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDate::parse_from_str(target_date, "%Y-%m-%d")
                    .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
            });

        match parsed {
            Ok(race_date) => (race_date - now).num_days(),
            Err(_) => {
                warn!(
                    target_date = %target_date,
                    default_days = self.settings.default_days_to_race,
                    "unparsable target date, using default race countdown"
                );
                self.settings.default_days_to_race
            }
        }
    }

    fn predict_seconds(
        &self,
        features: &FeatureSet,
        target_distance_km: f64,
        bucket: DistanceBucket,
    ) -> f64 {
        if let Some(registry) = &self.registry {
            if registry.has_model(bucket) {
                return registry.predict(features, bucket);
            }
        }

        self.empirical_prediction(features, target_distance_km, bucket)
    }

    /// Distance-banded empirical formula: best recent training pace, scaled
    /// by the band factor and the fitness multiplier
    fn empirical_prediction(
        &self,
        features: &FeatureSet,
        target_distance_km: f64,
        bucket: DistanceBucket,
    ) -> f64 {
        let band_factor = match bucket {
            DistanceBucket::FiveK => self.settings.factor_5k,
            DistanceBucket::TenK => self.settings.factor_10k,
            DistanceBucket::HalfMarathon => self.settings.factor_half_marathon,
            DistanceBucket::Marathon => self.settings.factor_marathon,
            DistanceBucket::Ultra => self.settings.factor_ultra,
        };

        let adjusted_pace =
            features.best_recent_pace * band_factor * self.fitness_multiplier(features);

        adjusted_pace * target_distance_km
    }

    /// Pace multiplier from weekly volume, consistency, and recency
    fn fitness_multiplier(&self, features: &FeatureSet) -> f64 {
        let s = &self.settings;
        let mut multiplier = 1.0;

        if features.avg_weekly_distance > s.high_volume_km {
            multiplier *= s.high_volume_multiplier;
        } else if features.avg_weekly_distance < s.low_volume_km {
            multiplier *= s.low_volume_multiplier;
        }

        if features.consistency_score > s.high_consistency {
            multiplier *= s.high_consistency_multiplier;
        } else if features.consistency_score < s.low_consistency {
            multiplier *= s.low_consistency_multiplier;
        }

        if features.days_since_last_workout.unwrap_or(7.0) > s.detraining_days {
            multiplier *= s.detraining_multiplier;
        }

        multiplier
    }

    /// Prediction confidence: base 0.5, additive, capped at 0.95
    fn confidence(history: &[WorkoutRecord], target_distance_km: f64) -> f64 {
        let mut confidence = 0.5;

        if history.len() > 20 {
            confidence += 0.2;
        } else if history.len() > 10 {
            confidence += 0.1;
        }

        // Experience at distances close to the target
        let similar = history
            .iter()
            .filter(|w| (w.distance_f64() - target_distance_km).abs() <= target_distance_km * 0.2)
            .count();
        if similar >= 3 {
            confidence += 0.2;
        }

        if history.len().min(10) >= 5 {
            confidence += 0.1;
        }

        f64::min(0.95, confidence)
    }

    /// Additive 0-8 fitness score from best pace, distance, and consistency
    fn fitness_level(history_len: usize, features: &FeatureSet) -> FitnessLevel {
        if history_len < 5 {
            return FitnessLevel::Beginner;
        }

        let mut score = 0u8;

        if features.best_pace < 240.0 {
            score += 3;
        } else if features.best_pace < 300.0 {
            score += 2;
        } else if features.best_pace < 360.0 {
            score += 1;
        }

        if features.avg_distance > 15.0 {
            score += 3;
        } else if features.avg_distance > 8.0 {
            score += 2;
        } else if features.avg_distance > 5.0 {
            score += 1;
        }

        if features.consistency_score > 0.7 {
            score += 2;
        } else if features.consistency_score > 0.5 {
            score += 1;
        }

        match score {
            7.. => FitnessLevel::Excellent,
            5..=6 => FitnessLevel::Good,
            3..=4 => FitnessLevel::Average,
            _ => FitnessLevel::Beginner,
        }
    }

    /// Base potential from fitness level, shifted by the time remaining
    fn improvement_potential(fitness: FitnessLevel, days_to_race: i64) -> ImprovementPotential {
        let base = match fitness {
            FitnessLevel::Beginner => ImprovementPotential::VeryHigh,
            FitnessLevel::Average => ImprovementPotential::High,
            FitnessLevel::Good => ImprovementPotential::Moderate,
            FitnessLevel::Excellent => ImprovementPotential::Limited,
        };

        if days_to_race < 30 {
            match base {
                ImprovementPotential::VeryHigh => ImprovementPotential::High,
                ImprovementPotential::High => ImprovementPotential::Moderate,
                other => other,
            }
        } else if days_to_race > 90 {
            match base {
                ImprovementPotential::Moderate => ImprovementPotential::High,
                ImprovementPotential::Limited => ImprovementPotential::Moderate,
                other => other,
            }
        } else {
            base
        }
    }

    fn training_recommendations(
        &self,
        features: &FeatureSet,
        target_distance_km: f64,
        days_to_race: i64,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if target_distance_km <= 10.0 {
            recommendations
                .push("Include 1-2 interval sessions per week for speed".to_string());
            recommendations.push("Practice the specific paces of your goal".to_string());
        } else if target_distance_km <= 21.1 {
            recommendations.push("Build endurance with long runs".to_string());
            recommendations.push("Include lactate threshold sessions".to_string());
        } else {
            recommendations
                .push("Prioritize aerobic base endurance (70-80% of volume)".to_string());
            recommendations.push("Progress gradually on the long distance".to_string());
        }

        if days_to_race < 45 {
            recommendations.push("Focus on specificity - race paces".to_string());
            recommendations.push("Taper the volume progressively before the race".to_string());
        } else {
            recommendations.push("Build a solid aerobic base".to_string());
            recommendations
                .push("Grow the volume gradually (+10% per week max)".to_string());
        }

        if features.consistency_score < 0.5 {
            recommendations.push("Favor regularity over intensity".to_string());
        }

        if features.interval_ratio < 0.1 {
            recommendations.push("Add speed work (short intervals)".to_string());
        }

        recommendations
    }

    /// Intermediate projections at checkpoints before race day
    fn milestones(&self, predicted_seconds: f64, days_to_race: i64) -> Vec<MilestonePrediction> {
        let checkpoints: Vec<i64> = if days_to_race > 60 {
            vec![30, 60, days_to_race - 14]
        } else if days_to_race > 30 {
            vec![15, days_to_race - 7]
        } else {
            vec![days_to_race - 7]
        };

        checkpoints
            .into_iter()
            .filter(|&checkpoint| checkpoint > 0)
            .map(|checkpoint| {
                let progress_ratio = (days_to_race - checkpoint) as f64 / days_to_race as f64;
                let expected_improvement = self.settings.max_improvement * progress_ratio;
                let milestone_seconds = predicted_seconds * (1.0 - expected_improvement);

                MilestonePrediction {
                    checkpoint_days: checkpoint,
                    predicted_time: pace::seconds_to_time_string(milestone_seconds),
                    expected_improvement_pct: expected_improvement * 100.0,
                    confidence: 0.7 - progress_ratio * 0.1,
                }
            })
            .collect()
    }
}
