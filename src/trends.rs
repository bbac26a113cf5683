//! Multi-workout trend analysis
//!
//! Detects fitness, endurance, and speed evolution over a workout history,
//! summarizes training volume, and flags risky patterns in the recent
//! training mix. Requires at least 3 workouts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::{AnalyticsError, Result};
use crate::models::{WorkoutRecord, WorkoutType};
use crate::pace;

/// Minimum workouts for any trend analysis
const MIN_WORKOUTS: usize = 3;

/// Minimum workouts before the fitness trend is reported
const MIN_FITNESS_WORKOUTS: usize = 5;

/// Overall fitness direction from distance progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessTrend {
    /// Fewer than 5 workouts: not enough signal
    Insufficient,
    /// Recent average distance up more than 10%
    StrongImprovement,
    /// Recent average distance up more than 5%
    SlightImprovement,
    Stable,
    /// Recent average distance down more than 10%
    Regression,
}

impl std::fmt::Display for FitnessTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FitnessTrend::Insufficient => "insufficient data",
            FitnessTrend::StrongImprovement => "strong improvement",
            FitnessTrend::SlightImprovement => "slight improvement",
            FitnessTrend::Stable => "stable",
            FitnessTrend::Regression => "regression",
        };
        write!(f, "{label}")
    }
}

/// Endurance progression over endurance and tempo workouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnduranceEvolution {
    /// Percentage change of mean distance, last-5 vs prior-5 window
    pub trend_pct: f64,
    /// Mean distance of the recent window, km
    pub average_distance_km: f64,
    /// Distance standard deviation of the recent window, km
    pub dispersion_km: f64,
}

/// Speed progression over interval workouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedEvolution {
    /// Percentage pace improvement, 3-vs-3 windows (positive = faster)
    pub trend_pct: f64,
    /// Mean pace of the recent window, seconds/km
    pub average_pace_seconds: f64,
    /// Fastest pace of the recent window, seconds/km
    pub best_pace_seconds: f64,
}

/// Aggregate training volume over the analyzed window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeAnalysis {
    pub total_distance_km: f64,
    pub total_duration_minutes: f64,
    pub average_distance_per_workout_km: f64,
    /// Naive 7-day projection from per-workout volume
    pub weekly_projection_km: f64,
}

/// Complete multi-workout trend result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTrend {
    /// Human-readable description of the analyzed period
    pub period: String,
    pub fitness_trend: FitnessTrend,
    pub endurance_evolution: EnduranceEvolution,
    pub speed_evolution: SpeedEvolution,
    pub volume_analysis: VolumeAnalysis,
    /// Rule-based guidance from the recent training mix
    pub recommendations: Vec<String>,
    /// Risky patterns in the last 7 days of training
    pub risk_factors: Vec<String>,
}

/// Multi-workout trend analysis engine
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Analyze fitness, endurance, and speed trends over a workout history
    ///
    /// Fails with `InsufficientData` below 3 workouts. `now` anchors the
    /// 7-day risk windows and must be passed explicitly.
    pub fn analyze(workouts: &[WorkoutRecord], now: DateTime<Utc>) -> Result<PerformanceTrend> {
        if workouts.len() < MIN_WORKOUTS {
            return Err(AnalyticsError::InsufficientData {
                analysis: "trend analysis",
                required: MIN_WORKOUTS,
                actual: workouts.len(),
            });
        }

        Ok(PerformanceTrend {
            period: format!("last {} workouts", workouts.len()),
            fitness_trend: Self::fitness_trend(workouts),
            endurance_evolution: Self::endurance_evolution(workouts),
            speed_evolution: Self::speed_evolution(workouts),
            volume_analysis: Self::volume_analysis(workouts),
            recommendations: Self::recommendations(workouts),
            risk_factors: Self::risk_factors(workouts, now),
        })
    }

    /// Distance progression of the last 10 workouts vs the 10 before them
    fn fitness_trend(workouts: &[WorkoutRecord]) -> FitnessTrend {
        if workouts.len() < MIN_FITNESS_WORKOUTS {
            return FitnessTrend::Insufficient;
        }

        let len = workouts.len();
        let recent_start = len.saturating_sub(10);
        let older = if len >= 20 {
            &workouts[len - 20..recent_start]
        } else {
            &workouts[..recent_start]
        };

        if older.is_empty() {
            return FitnessTrend::Stable;
        }

        let recent_avg = Self::mean_distance(&workouts[recent_start..]);
        let older_avg = Self::mean_distance(older);
        let improvement = (recent_avg - older_avg) / older_avg;

        if improvement > 0.1 {
            FitnessTrend::StrongImprovement
        } else if improvement > 0.05 {
            FitnessTrend::SlightImprovement
        } else if improvement < -0.1 {
            FitnessTrend::Regression
        } else {
            FitnessTrend::Stable
        }
    }

    /// Distance progression restricted to endurance and tempo workouts
    fn endurance_evolution(workouts: &[WorkoutRecord]) -> EnduranceEvolution {
        let endurance: Vec<&WorkoutRecord> = workouts
            .iter()
            .filter(|w| {
                matches!(
                    w.workout_type,
                    WorkoutType::Endurance | WorkoutType::Tempo
                )
            })
            .collect();

        if endurance.len() < 3 {
            return EnduranceEvolution {
                trend_pct: 0.0,
                average_distance_km: 0.0,
                dispersion_km: 0.0,
            };
        }

        let len = endurance.len();
        let recent_start = len.saturating_sub(5);
        let recent = &endurance[recent_start..];
        let older = if len >= 10 {
            &endurance[len - 10..recent_start]
        } else {
            &endurance[..recent_start]
        };

        let recent_distances: Vec<f64> = recent.iter().map(|w| w.distance_f64()).collect();
        let recent_avg = Statistics::mean(&recent_distances);
        let older_avg = if older.is_empty() {
            recent_avg
        } else {
            Statistics::mean(older.iter().map(|w| w.distance_f64()).collect::<Vec<_>>())
        };

        let trend_pct = if older_avg > 0.0 {
            (recent_avg - older_avg) / older_avg * 100.0
        } else {
            0.0
        };

        let dispersion_km = if recent_distances.len() > 1 {
            Statistics::std_dev(&recent_distances)
        } else {
            0.0
        };

        EnduranceEvolution {
            trend_pct,
            average_distance_km: recent_avg,
            dispersion_km,
        }
    }

    /// Pace progression restricted to interval workouts
    fn speed_evolution(workouts: &[WorkoutRecord]) -> SpeedEvolution {
        let intervals: Vec<&WorkoutRecord> = workouts
            .iter()
            .filter(|w| w.workout_type == WorkoutType::Interval)
            .collect();

        if intervals.len() < 3 {
            return SpeedEvolution {
                trend_pct: 0.0,
                average_pace_seconds: 0.0,
                best_pace_seconds: 0.0,
            };
        }

        let len = intervals.len();
        let recent_start = len.saturating_sub(3);
        let recent_paces: Vec<f64> = intervals[recent_start..]
            .iter()
            .map(|w| Self::pace_seconds(w))
            .collect();
        let older = if len >= 6 {
            &intervals[len - 6..recent_start]
        } else {
            &intervals[..recent_start]
        };

        let recent_pace = Statistics::mean(&recent_paces);
        let older_pace = if older.is_empty() {
            recent_pace
        } else {
            Statistics::mean(older.iter().map(|w| Self::pace_seconds(w)).collect::<Vec<_>>())
        };

        // Improvement means getting faster: fewer seconds per km
        let trend_pct = if older_pace > 0.0 {
            (older_pace - recent_pace) / older_pace * 100.0
        } else {
            0.0
        };

        SpeedEvolution {
            trend_pct,
            average_pace_seconds: recent_pace,
            best_pace_seconds: Statistics::min(&recent_paces),
        }
    }

    fn volume_analysis(workouts: &[WorkoutRecord]) -> VolumeAnalysis {
        let total_distance_km: f64 = workouts.iter().map(|w| w.distance_f64()).sum();
        let total_duration_minutes: f64 = workouts
            .iter()
            .map(|w| f64::from(w.duration_minutes))
            .sum();
        let count = workouts.len() as f64;

        VolumeAnalysis {
            total_distance_km,
            total_duration_minutes,
            average_distance_per_workout_km: total_distance_km / count,
            weekly_projection_km: total_distance_km * (7.0 / f64::max(1.0, count)),
        }
    }

    /// Rule-based recommendations from the last 10 workouts' type mix
    fn recommendations(workouts: &[WorkoutRecord]) -> Vec<String> {
        let start = workouts.len().saturating_sub(10);
        let recent = &workouts[start..];
        let total = recent.len() as f64;

        let share = |workout_type: WorkoutType| {
            recent
                .iter()
                .filter(|w| w.workout_type == workout_type)
                .count() as f64
                / total
        };

        let mut recommendations = Vec::new();

        if share(WorkoutType::Endurance) < 0.6 {
            recommendations
                .push("Increase the share of endurance training (target 60-70%)".to_string());
        }
        if share(WorkoutType::Interval) > 0.3 {
            recommendations
                .push("Reduce the frequency of interval sessions (max 20-30%)".to_string());
        }
        if share(WorkoutType::Recovery) < 0.1 {
            recommendations.push("Add active recovery sessions".to_string());
        }

        if recommendations.is_empty() {
            recommendations.push("Keep your current program, it is well balanced".to_string());
        }

        recommendations
    }

    /// Risky patterns within the last 7 days
    fn risk_factors(workouts: &[WorkoutRecord], now: DateTime<Utc>) -> Vec<String> {
        let cutoff = now - Duration::days(7);
        let recent: Vec<&WorkoutRecord> =
            workouts.iter().filter(|w| w.date > cutoff).collect();

        let mut risks = Vec::new();

        if recent.len() > 5 {
            risks.push("High training frequency - overtraining risk".to_string());
        }

        let high_intensity = recent
            .iter()
            .filter(|w| w.workout_type == WorkoutType::Interval)
            .count();
        if high_intensity > 2 {
            risks.push("Too many high intensity sessions clustered together".to_string());
        }

        risks
    }

    fn mean_distance(workouts: &[WorkoutRecord]) -> f64 {
        Statistics::mean(workouts.iter().map(|w| w.distance_f64()).collect::<Vec<_>>())
    }

    fn pace_seconds(workout: &WorkoutRecord) -> f64 {
        f64::from(pace::pace_seconds_or_default(
            &workout.pace,
            pace::DEFAULT_PACE_SECONDS,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn workout(day: u32, workout_type: WorkoutType, distance: Decimal, pace: &str) -> WorkoutRecord {
        WorkoutRecord {
            id: format!("w{day}"),
            date: Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap()
                + Duration::days(i64::from(day) - 1),
            workout_type,
            duration_minutes: 40,
            distance_km: distance,
            pace: pace.to_string(),
            heart_rate: None,
            elevation_gain: None,
            notes: None,
            splits: None,
            weather: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_two_workouts_rejected() {
        let workouts = vec![
            workout(1, WorkoutType::Endurance, dec!(5), "5:30"),
            workout(2, WorkoutType::Endurance, dec!(6), "5:30"),
        ];
        let result = TrendAnalyzer::analyze(&workouts, now());
        assert!(matches!(
            result,
            Err(AnalyticsError::InsufficientData {
                required: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_three_workouts_yield_insufficient_fitness_trend() {
        let workouts = vec![
            workout(1, WorkoutType::Endurance, dec!(5), "5:30"),
            workout(2, WorkoutType::Endurance, dec!(6), "5:30"),
            workout(3, WorkoutType::Endurance, dec!(7), "5:30"),
        ];
        let trend = TrendAnalyzer::analyze(&workouts, now()).unwrap();
        assert_eq!(trend.fitness_trend, FitnessTrend::Insufficient);
        assert_eq!(trend.period, "last 3 workouts");
    }

    #[test]
    fn test_strong_improvement_detected() {
        // 10 older at 5 km, 10 recent at 8 km: +60%
        let mut workouts: Vec<_> = (1..=10)
            .map(|d| workout(d, WorkoutType::Endurance, dec!(5), "5:30"))
            .collect();
        workouts.extend((11..=20).map(|d| workout(d, WorkoutType::Endurance, dec!(8), "5:30")));

        let trend = TrendAnalyzer::analyze(&workouts, now()).unwrap();
        assert_eq!(trend.fitness_trend, FitnessTrend::StrongImprovement);
    }

    #[test]
    fn test_regression_detected() {
        let mut workouts: Vec<_> = (1..=10)
            .map(|d| workout(d, WorkoutType::Endurance, dec!(10), "5:30"))
            .collect();
        workouts.extend((11..=20).map(|d| workout(d, WorkoutType::Endurance, dec!(6), "5:30")));

        let trend = TrendAnalyzer::analyze(&workouts, now()).unwrap();
        assert_eq!(trend.fitness_trend, FitnessTrend::Regression);
    }

    #[test]
    fn test_ten_or_fewer_workouts_stay_stable() {
        // All records fall in the recent window, the older one is empty
        let workouts: Vec<_> = (1..=8)
            .map(|d| workout(d, WorkoutType::Endurance, Decimal::from(5 + d), "5:30"))
            .collect();
        let trend = TrendAnalyzer::analyze(&workouts, now()).unwrap();
        assert_eq!(trend.fitness_trend, FitnessTrend::Stable);
    }

    #[test]
    fn test_endurance_evolution_windows() {
        // 5 older endurance at 6 km, 5 recent at 9 km: +50%
        let mut workouts: Vec<_> = (1..=5)
            .map(|d| workout(d, WorkoutType::Endurance, dec!(6), "5:40"))
            .collect();
        workouts.extend((6..=10).map(|d| workout(d, WorkoutType::Tempo, dec!(9), "5:00")));

        let trend = TrendAnalyzer::analyze(&workouts, now()).unwrap();
        assert!((trend.endurance_evolution.trend_pct - 50.0).abs() < 1e-9);
        assert!((trend.endurance_evolution.average_distance_km - 9.0).abs() < 1e-9);
        assert_eq!(trend.endurance_evolution.dispersion_km, 0.0);
    }

    #[test]
    fn test_endurance_evolution_ignores_intervals() {
        let workouts: Vec<_> = (1..=6)
            .map(|d| workout(d, WorkoutType::Interval, dec!(6), "4:30"))
            .collect();
        let trend = TrendAnalyzer::analyze(&workouts, now()).unwrap();
        assert_eq!(trend.endurance_evolution.average_distance_km, 0.0);
        assert_eq!(trend.endurance_evolution.trend_pct, 0.0);
    }

    #[test]
    fn test_speed_evolution_positive_when_faster() {
        // Older intervals at 4:40 (280s), recent at 4:20 (260s)
        let mut workouts: Vec<_> = (1..=3)
            .map(|d| workout(d, WorkoutType::Interval, dec!(6), "4:40"))
            .collect();
        workouts.extend((4..=6).map(|d| workout(d, WorkoutType::Interval, dec!(6), "4:20")));

        let trend = TrendAnalyzer::analyze(&workouts, now()).unwrap();
        let expected = (280.0 - 260.0) / 280.0 * 100.0;
        assert!((trend.speed_evolution.trend_pct - expected).abs() < 1e-9);
        assert_eq!(trend.speed_evolution.best_pace_seconds, 260.0);
    }

    #[test]
    fn test_volume_analysis_projection() {
        let workouts: Vec<_> = (1..=7)
            .map(|d| workout(d, WorkoutType::Endurance, dec!(6), "5:30"))
            .collect();
        let trend = TrendAnalyzer::analyze(&workouts, now()).unwrap();
        assert!((trend.volume_analysis.total_distance_km - 42.0).abs() < 1e-9);
        assert!((trend.volume_analysis.weekly_projection_km - 42.0).abs() < 1e-9);
        assert!((trend.volume_analysis.average_distance_per_workout_km - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_recommendations_for_unbalanced_mix() {
        // All intervals: endurance share too low, interval share too high,
        // no recovery sessions
        let workouts: Vec<_> = (1..=6)
            .map(|d| workout(d, WorkoutType::Interval, dec!(6), "4:30"))
            .collect();
        let trend = TrendAnalyzer::analyze(&workouts, now()).unwrap();
        assert_eq!(trend.recommendations.len(), 3);
    }

    #[test]
    fn test_balanced_mix_single_recommendation() {
        let mut workouts: Vec<_> = (1..=7)
            .map(|d| workout(d, WorkoutType::Endurance, dec!(8), "5:30"))
            .collect();
        workouts.push(workout(8, WorkoutType::Interval, dec!(6), "4:30"));
        workouts.push(workout(9, WorkoutType::Recovery, dec!(4), "6:30"));
        workouts.push(workout(10, WorkoutType::Tempo, dec!(7), "5:00"));

        let trend = TrendAnalyzer::analyze(&workouts, now()).unwrap();
        assert_eq!(
            trend.recommendations,
            vec!["Keep your current program, it is well balanced".to_string()]
        );
    }

    #[test]
    fn test_risk_factors_in_dense_week() {
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap();
        // Days 4-9: six workouts within the last 7 days, three intervals
        let workouts: Vec<_> = (4..=9)
            .map(|d| {
                let workout_type = if d % 2 == 0 {
                    WorkoutType::Interval
                } else {
                    WorkoutType::Endurance
                };
                workout(d, workout_type, dec!(6), "5:00")
            })
            .collect();

        let trend = TrendAnalyzer::analyze(&workouts, now).unwrap();
        assert_eq!(trend.risk_factors.len(), 2);
        assert!(trend.risk_factors[0].contains("overtraining"));
    }

    #[test]
    fn test_quiet_week_no_risk_factors() {
        let workouts: Vec<_> = (1..=5)
            .map(|d| workout(d, WorkoutType::Endurance, dec!(6), "5:30"))
            .collect();
        let trend = TrendAnalyzer::analyze(&workouts, now()).unwrap();
        assert!(trend.risk_factors.is_empty());
    }
}
