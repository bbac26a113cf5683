//! Single-workout analysis
//!
//! Scores the most recent workout of a history against the workouts that
//! preceded it: overall quality score, pace categorization and trend, heart
//! rate zone proximity, fatigue, and rule-based recommendations.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::config::AnalyzerSettings;
use crate::error::{AnalyticsError, Result};
use crate::models::{WorkoutRecord, WorkoutType};
use crate::pace;

/// Pace classification relative to type-specific thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceCategory {
    // Interval workouts
    Fast,
    Moderate,
    Slow,
    // All other workout types
    Sustained,
    Comfortable,
    Recovery,
}

impl std::fmt::Display for PaceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaceCategory::Fast => "fast",
            PaceCategory::Moderate => "moderate",
            PaceCategory::Slow => "slow",
            PaceCategory::Sustained => "sustained",
            PaceCategory::Comfortable => "comfortable",
            PaceCategory::Recovery => "recovery",
        };
        write!(f, "{label}")
    }
}

/// Pace direction relative to the recent historical average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceTrend {
    Improving,
    Stable,
    Declining,
}

impl std::fmt::Display for PaceTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaceTrend::Improving => "improving",
            PaceTrend::Stable => "stable",
            PaceTrend::Declining => "declining",
        };
        write!(f, "{label}")
    }
}

/// Pace analysis for the workout under review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceAnalysis {
    /// Pace as supplied, "MM:SS" per km
    pub current_pace: String,
    /// Parsed pace in seconds per km
    pub current_pace_seconds: u32,
    /// Category against type-specific thresholds
    pub category: PaceCategory,
    /// Trend vs the mean of the last 5 historical paces; None without history
    pub trend: Option<PaceTrend>,
}

/// Proximity scores to the four intensity anchors (60/75/85/95% of max HR)
///
/// These are smooth, overlapping proximity measures in [0, 100], not a
/// mutually exclusive zone assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateZoneScores {
    pub zone1: f64,
    pub zone2: f64,
    pub zone3: f64,
    pub zone4: f64,
}

/// Estimated fatigue from recent training frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatigueLevel {
    Low,
    Normal,
    High,
}

impl std::fmt::Display for FatigueLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FatigueLevel::Low => "low",
            FatigueLevel::Normal => "normal",
            FatigueLevel::High => "high",
        };
        write!(f, "{label}")
    }
}

/// Signed percentage deltas against the personal history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryComparison {
    /// Current distance vs the mean of the last 10 workouts, in percent
    pub distance_vs_average_pct: f64,
    /// Current pace vs the mean of the last 5 paces, in percent
    /// (positive = faster); requires at least 3 historical workouts
    pub pace_vs_average_pct: Option<f64>,
}

/// Complete single-workout analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutAnalysis {
    /// Identifier of the analyzed workout
    pub workout_id: String,
    /// Overall quality score, [0, 100]
    pub overall_score: f64,
    /// Pace categorization and trend
    pub pace_analysis: PaceAnalysis,
    /// Heart rate zone proximity, when heart rate was recorded
    pub heart_rate_zones: Option<HeartRateZoneScores>,
    /// Per-type effort consistency constant, [0, 1]
    pub effort_consistency: f64,
    /// Estimated fatigue from the last 7 days of training
    pub fatigue_level: FatigueLevel,
    /// Recovery guidance derived from fatigue and workout type
    pub recovery_recommendation: String,
    /// Rule-based performance observations
    pub performance_insights: Vec<String>,
    /// Comparison against personal history; None for a first workout
    pub comparison_to_history: Option<HistoryComparison>,
}

/// Single-workout analysis engine
#[derive(Debug, Clone, Default)]
pub struct WorkoutAnalyzer {
    settings: AnalyzerSettings,
}

impl WorkoutAnalyzer {
    pub fn new(settings: AnalyzerSettings) -> Self {
        Self { settings }
    }

    /// Analyze the last workout of the supplied sequence
    ///
    /// The final record is the workout under analysis; everything before it
    /// is its comparison history. `now` anchors the fatigue window and must
    /// be passed explicitly. Fails with `EmptyInput` when no workout is
    /// supplied, and propagates a malformed pace on the analyzed workout.
    pub fn analyze(
        &self,
        workouts: &[WorkoutRecord],
        now: DateTime<Utc>,
    ) -> Result<WorkoutAnalysis> {
        let (workout, history) = workouts.split_last().ok_or(AnalyticsError::EmptyInput {
            analysis: "workout analysis",
        })?;

        let current_pace_seconds = pace::pace_to_seconds(&workout.pace)?;
        let fatigue_level = self.assess_fatigue(history, now);

        Ok(WorkoutAnalysis {
            workout_id: workout.id.clone(),
            overall_score: self.overall_score(workout, history),
            pace_analysis: self.analyze_pace(workout, history, current_pace_seconds),
            heart_rate_zones: workout.heart_rate.map(|hr| self.heart_rate_zones(hr)),
            effort_consistency: Self::effort_consistency(workout.workout_type),
            fatigue_level,
            recovery_recommendation: Self::recovery_recommendation(workout, fatigue_level),
            performance_insights: Self::performance_insights(workout, history),
            comparison_to_history: self.compare_to_history(
                workout,
                history,
                current_pace_seconds,
            ),
        })
    }

    /// Overall quality score: base 50, additive bonuses, clamped to [0, 100]
    fn overall_score(&self, workout: &WorkoutRecord, history: &[WorkoutRecord]) -> f64 {
        let mut score = 50.0;
        let distance = workout.distance_f64();

        if distance >= 5.0 {
            score += f64::min(15.0, distance * 2.0);
        }

        if let Some(hr) = workout.heart_rate {
            if (120..=180).contains(&hr) {
                score += 10.0;
            }
        }

        if !history.is_empty() {
            let start = history.len().saturating_sub(5);
            let distances: Vec<f64> =
                history[start..].iter().map(|w| w.distance_f64()).collect();
            let avg = Statistics::mean(&distances);
            if avg > 0.0 {
                let ratio = distance / avg;
                if (0.8..=1.3).contains(&ratio) {
                    score += 10.0;
                }
            }
        }

        score.clamp(0.0, 100.0)
    }

    fn analyze_pace(
        &self,
        workout: &WorkoutRecord,
        history: &[WorkoutRecord],
        current_pace_seconds: u32,
    ) -> PaceAnalysis {
        let category = Self::categorize_pace(current_pace_seconds, workout.workout_type);

        let trend = if history.is_empty() {
            None
        } else {
            let avg = self.recent_history_pace(history, 5);
            let current = f64::from(current_pace_seconds);
            Some(if current < avg * 0.95 {
                PaceTrend::Improving
            } else if current > avg * 1.05 {
                PaceTrend::Declining
            } else {
                PaceTrend::Stable
            })
        };

        PaceAnalysis {
            current_pace: workout.pace.clone(),
            current_pace_seconds,
            category,
            trend,
        }
    }

    /// Mean of the last `window` historical paces, substituting the
    /// documented default for any malformed entry (logged, never silent)
    fn recent_history_pace(&self, history: &[WorkoutRecord], window: usize) -> f64 {
        let start = history.len().saturating_sub(window);
        let paces: Vec<f64> = history[start..]
            .iter()
            .map(|w| {
                f64::from(pace::pace_seconds_or_default(
                    &w.pace,
                    self.settings.default_pace_seconds,
                ))
            })
            .collect();
        Statistics::mean(&paces)
    }

    fn categorize_pace(pace_seconds: u32, workout_type: WorkoutType) -> PaceCategory {
        match workout_type {
            WorkoutType::Interval => {
                if pace_seconds < 240 {
                    PaceCategory::Fast
                } else if pace_seconds < 300 {
                    PaceCategory::Moderate
                } else {
                    PaceCategory::Slow
                }
            }
            _ => {
                if pace_seconds < 300 {
                    PaceCategory::Sustained
                } else if pace_seconds < 360 {
                    PaceCategory::Comfortable
                } else {
                    PaceCategory::Recovery
                }
            }
        }
    }

    /// Proximity of the recorded heart rate to the four intensity anchors
    fn heart_rate_zones(&self, heart_rate: u16) -> HeartRateZoneScores {
        let max_hr = self.settings.assumed_max_hr;
        let hr = f64::from(heart_rate);
        let band = 0.1 * max_hr;

        let proximity =
            |anchor: f64| (100.0 - (hr - anchor * max_hr).abs() / band * 100.0).clamp(0.0, 100.0);

        HeartRateZoneScores {
            zone1: ((0.6 * max_hr - hr).max(0.0) / band * 100.0).clamp(0.0, 100.0),
            zone2: proximity(0.75),
            zone3: proximity(0.85),
            zone4: proximity(0.95),
        }
    }

    /// Fixed per-type effort consistency constant
    fn effort_consistency(workout_type: WorkoutType) -> f64 {
        match workout_type {
            WorkoutType::Endurance => 0.85,
            WorkoutType::Interval => 0.65,
            _ => 0.75,
        }
    }

    /// Fatigue from training frequency over the last 7 days
    fn assess_fatigue(&self, history: &[WorkoutRecord], now: DateTime<Utc>) -> FatigueLevel {
        if history.is_empty() {
            return FatigueLevel::Normal;
        }

        let cutoff = now - Duration::days(7);
        let recent = history.iter().filter(|w| w.date > cutoff).count();

        if recent > 5 {
            FatigueLevel::High
        } else if recent < 2 {
            FatigueLevel::Low
        } else {
            FatigueLevel::Normal
        }
    }

    fn recovery_recommendation(workout: &WorkoutRecord, fatigue: FatigueLevel) -> String {
        if fatigue == FatigueLevel::High {
            "Active rest recommended. Consider 1-2 days of complete recovery.".to_string()
        } else if workout.workout_type == WorkoutType::Interval {
            "Moderate recovery. Favor easy endurance running over the next 24h.".to_string()
        } else {
            "Standard recovery. Hydration and stretching are sufficient.".to_string()
        }
    }

    fn performance_insights(
        workout: &WorkoutRecord,
        history: &[WorkoutRecord],
    ) -> Vec<String> {
        let mut insights = Vec::new();
        let distance = workout.distance_f64();

        if distance > 10.0 {
            insights.push("Excellent endurance capacity demonstrated".to_string());
        }

        if let Some(hr) = workout.heart_rate {
            if hr < 150 {
                insights.push("Low heart rate - good cardiac efficiency".to_string());
            }
        }

        if history.len() >= 3 {
            let recent = &history[history.len() - 3..];
            if recent.iter().all(|w| w.distance_f64() >= distance * 0.8) {
                insights.push("Remarkable consistency across distances".to_string());
            }
        }

        if insights.is_empty() {
            insights.push("Workout within normal training standards".to_string());
        }

        insights
    }

    fn compare_to_history(
        &self,
        workout: &WorkoutRecord,
        history: &[WorkoutRecord],
        current_pace_seconds: u32,
    ) -> Option<HistoryComparison> {
        if history.is_empty() {
            return None;
        }

        let start = history.len().saturating_sub(10);
        let distances: Vec<f64> = history[start..].iter().map(|w| w.distance_f64()).collect();
        let avg_distance = Statistics::mean(&distances);
        let distance_vs_average_pct = (workout.distance_f64() / avg_distance - 1.0) * 100.0;

        let pace_vs_average_pct = if history.len() >= 3 {
            let avg_pace = self.recent_history_pace(history, 5);
            Some((avg_pace - f64::from(current_pace_seconds)) / avg_pace * 100.0)
        } else {
            None
        };

        Some(HistoryComparison {
            distance_vs_average_pct,
            pace_vs_average_pct,
        })
    }
}
