//! Feature extraction over workout histories
//!
//! Reduces an ordered-by-date (but not necessarily pre-sorted) sequence of
//! workouts into the flat set of named statistics consumed by every analyzer
//! and by the race predictor. All values are recomputed on every call;
//! nothing is cached or persisted.

use chrono::{DateTime, Utc};
use statrs::statistics::Statistics;
use tracing::warn;

use crate::models::{WorkoutRecord, WorkoutType};
use crate::pace;

/// Baseline pace (seconds/km) representing decent current form
const BASELINE_FORM_PACE: f64 = 330.0;

/// Window size for the recent-form calculation
const RECENT_FORM_WINDOW: usize = 5;

/// Window size for the best-recent-pace calculation
const BEST_PACE_WINDOW: usize = 10;

/// Flat named feature set derived from a workout history
///
/// Scores and ratios carry documented ranges: `consistency_score` and
/// `recent_form` are in [0, 1], and the four type ratios sum to 1.0 over the
/// window they were computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    /// Mean pace in seconds/km
    pub avg_pace: f64,
    /// Fastest pace in seconds/km
    pub best_pace: f64,
    /// Pace standard deviation in seconds/km
    pub pace_std: f64,
    /// Mean distance in km
    pub avg_distance: f64,
    /// Longest distance in km
    pub max_distance: f64,
    /// Total distance in km
    pub total_distance: f64,
    /// Mean duration in minutes
    pub avg_duration: f64,
    /// Number of workouts in the window
    pub workout_count: usize,

    /// Inverse of the combined pace/distance coefficient of variation, [0, 1]
    pub consistency_score: f64,
    /// Cumulative distance x intensity x duration-hours load
    pub training_load: f64,
    /// Recent pace relative to the form baseline, [0, 1]
    pub recent_form: f64,

    /// Days between the earliest and latest record; None with < 2 dated records
    pub training_period_days: Option<f64>,
    /// Workouts per week over the training period
    pub training_frequency: Option<f64>,
    /// Days between the latest record and `now`
    pub days_since_last_workout: Option<f64>,

    /// Fraction of endurance workouts
    pub endurance_ratio: f64,
    /// Fraction of interval workouts
    pub interval_ratio: f64,
    /// Fraction of tempo workouts
    pub tempo_ratio: f64,
    /// Fraction of recovery workouts
    pub recovery_ratio: f64,

    /// Relative pace gain of the last 4 workouts vs the preceding ones
    /// (positive = faster); 0 when the older window is empty
    pub pace_improvement: f64,
    /// Relative distance change of the last 4 workouts vs the preceding ones;
    /// 0 when the older window is empty
    pub distance_trend: f64,

    /// Fastest pace over the last 10 workouts
    pub best_recent_pace: f64,
    /// Total distance scaled to a weekly figure
    pub avg_weekly_distance: f64,
}

impl Default for FeatureSet {
    /// Generic beginner profile used when no workout history exists
    ///
    /// Downstream components rely on this so they never special-case "no
    /// data" beyond their own minimum-length checks.
    fn default() -> Self {
        Self {
            avg_pace: 360.0,
            best_pace: 330.0,
            pace_std: 30.0,
            avg_distance: 5.0,
            max_distance: 8.0,
            total_distance: 50.0,
            avg_duration: 30.0,
            workout_count: 10,
            consistency_score: 0.3,
            training_load: 50.0,
            recent_form: 0.5,
            training_period_days: Some(30.0),
            training_frequency: Some(2.5),
            days_since_last_workout: Some(3.0),
            endurance_ratio: 0.7,
            interval_ratio: 0.2,
            tempo_ratio: 0.0,
            recovery_ratio: 0.1,
            pace_improvement: 0.0,
            distance_trend: 0.0,
            best_recent_pace: 330.0,
            avg_weekly_distance: 15.0,
        }
    }
}

/// Feature extraction engine
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Extract the full feature set from a workout history
    ///
    /// `now` must be passed explicitly so results stay deterministic.
    /// Records whose pace fails to parse are skipped and logged; if nothing
    /// parses, the default beginner profile is returned. Out-of-order dates
    /// are tolerated: span and frequency derive from min/max, not position.
    pub fn extract(workouts: &[WorkoutRecord], now: DateTime<Utc>) -> FeatureSet {
        if workouts.is_empty() {
            return FeatureSet::default();
        }

        let mut paces: Vec<f64> = Vec::with_capacity(workouts.len());
        let mut distances: Vec<f64> = Vec::with_capacity(workouts.len());
        let mut durations: Vec<f64> = Vec::with_capacity(workouts.len());
        let mut dates: Vec<DateTime<Utc>> = Vec::with_capacity(workouts.len());
        let mut parsed: Vec<&WorkoutRecord> = Vec::with_capacity(workouts.len());

        for workout in workouts {
            match pace::pace_to_seconds(&workout.pace) {
                Ok(seconds) => {
                    paces.push(f64::from(seconds));
                    distances.push(workout.distance_f64());
                    durations.push(f64::from(workout.duration_minutes));
                    dates.push(workout.date);
                    parsed.push(workout);
                }
                Err(_) => {
                    warn!(id = %workout.id, pace = %workout.pace, "skipping workout with malformed pace");
                }
            }
        }

        if paces.is_empty() {
            return FeatureSet::default();
        }

        let workout_count = parsed.len();
        let total_distance: f64 = distances.iter().sum();

        let mut features = FeatureSet {
            avg_pace: Statistics::mean(&paces),
            best_pace: Statistics::min(&paces),
            pace_std: Statistics::population_std_dev(&paces),
            avg_distance: Statistics::mean(&distances),
            max_distance: Statistics::max(&distances),
            total_distance,
            avg_duration: Statistics::mean(&durations),
            workout_count,
            consistency_score: Self::consistency_score(&paces, &distances),
            training_load: Self::training_load(&parsed),
            recent_form: Self::recent_form(&paces),
            training_period_days: None,
            training_frequency: None,
            days_since_last_workout: None,
            endurance_ratio: Self::type_ratio(&parsed, WorkoutType::Endurance),
            interval_ratio: Self::type_ratio(&parsed, WorkoutType::Interval),
            tempo_ratio: Self::type_ratio(&parsed, WorkoutType::Tempo),
            recovery_ratio: Self::type_ratio(&parsed, WorkoutType::Recovery),
            pace_improvement: 0.0,
            distance_trend: 0.0,
            best_recent_pace: 0.0,
            avg_weekly_distance: 0.0,
        };

        if dates.len() >= 2 {
            let earliest = dates.iter().min().copied().unwrap_or(now);
            let latest = dates.iter().max().copied().unwrap_or(now);
            let period_days = (latest - earliest).num_days() as f64;
            features.training_period_days = Some(period_days);
            features.training_frequency =
                Some(workout_count as f64 / f64::max(1.0, period_days / 7.0));
            features.days_since_last_workout = Some((now - latest).num_days() as f64);
        }

        if workout_count >= 4 {
            let (pace_improvement, distance_trend) =
                Self::recent_trends(&paces, &distances);
            features.pace_improvement = pace_improvement;
            features.distance_trend = distance_trend;
        }

        let recent_start = paces.len().saturating_sub(BEST_PACE_WINDOW);
        features.best_recent_pace = Statistics::min(&paces[recent_start..]);

        let period_days = features.training_period_days.unwrap_or(30.0);
        features.avg_weekly_distance = total_distance / f64::max(1.0, period_days / 7.0);

        features
    }

    /// Consistency as the inverse of the combined coefficient of variation
    ///
    /// `max(0, 1 - avg(paceCV, distanceCV))`; fewer than 3 records give the
    /// neutral beginner value.
    fn consistency_score(paces: &[f64], distances: &[f64]) -> f64 {
        if paces.len() < 3 {
            return 0.3;
        }

        let pace_cv = Statistics::population_std_dev(paces) / Statistics::mean(paces);
        let distance_cv =
            Statistics::population_std_dev(distances) / Statistics::mean(distances);

        (1.0 - f64::min(1.0, (pace_cv + distance_cv) / 2.0)).max(0.0)
    }

    /// Cumulative training load: distance x intensity factor x duration-hours
    fn training_load(workouts: &[&WorkoutRecord]) -> f64 {
        workouts
            .iter()
            .map(|w| {
                w.distance_f64()
                    * w.workout_type.intensity_factor()
                    * (f64::from(w.duration_minutes) / 60.0)
            })
            .sum()
    }

    /// Recent form in [0, 1]: baseline pace over the mean of the last 5 paces
    fn recent_form(paces: &[f64]) -> f64 {
        let start = paces.len().saturating_sub(RECENT_FORM_WINDOW);
        let recent = &paces[start..];
        if recent.is_empty() {
            return 0.5;
        }

        let avg_recent = Statistics::mean(recent);
        (BASELINE_FORM_PACE / avg_recent).clamp(0.0, 1.0)
    }

    /// Fraction of the window made up of the given workout type
    fn type_ratio(workouts: &[&WorkoutRecord], workout_type: WorkoutType) -> f64 {
        let count = workouts
            .iter()
            .filter(|w| w.workout_type == workout_type)
            .count();
        count as f64 / workouts.len() as f64
    }

    /// Pace and distance deltas of the last 4 workouts vs the preceding 4
    /// (or all earlier records when fewer than 8 exist)
    ///
    /// An empty older window degrades to neutral zero trends.
    fn recent_trends(paces: &[f64], distances: &[f64]) -> (f64, f64) {
        let len = paces.len();
        let recent_start = len - 4;
        let older_start = len.saturating_sub(8);
        let older_paces = &paces[older_start..recent_start];
        let older_distances = &distances[older_start..recent_start];

        if older_paces.is_empty() {
            return (0.0, 0.0);
        }

        let recent_pace = Statistics::mean(&paces[recent_start..]);
        let older_pace = Statistics::mean(older_paces);
        let pace_improvement = (older_pace - recent_pace) / older_pace;

        let recent_distance = Statistics::mean(&distances[recent_start..]);
        let older_distance = Statistics::mean(older_distances);
        let distance_trend = (recent_distance - older_distance) / older_distance;

        (pace_improvement, distance_trend)
    }
}
