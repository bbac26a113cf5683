//! Race prediction and benchmark comparison integration tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use runsight::benchmark::BenchmarkComparator;
use runsight::config::PredictionSettings;
use runsight::features::FeatureSet;
use runsight::models::{AthleteProfile, ExperienceLevel, WorkoutRecord, WorkoutType};
use runsight::prediction::{
    DistanceBucket, FitnessLevel, PerformancePredictor, TrainedModelRegistry,
};

fn workout(n: u32, distance: Decimal, pace: &str) -> WorkoutRecord {
    WorkoutRecord {
        id: format!("w{n}"),
        date: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap() + Duration::days(i64::from(n) * 2),
        workout_type: if n % 4 == 0 {
            WorkoutType::Interval
        } else {
            WorkoutType::Endurance
        },
        duration_minutes: 45,
        distance_km: distance,
        pace: pace.to_string(),
        heart_rate: Some(150),
        elevation_gain: None,
        notes: None,
        splits: None,
        weather: None,
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn race_date(days: i64) -> String {
    (now() + Duration::days(days)).to_rfc3339()
}

#[test]
fn empty_history_prediction_is_reproducible() {
    // Default beginner profile through the empirical path:
    // 330 s/km * 0.98 (10k band) * 1.05 (low volume) * 10 km
    let predictor = PerformancePredictor::default();
    let first = predictor.predict(&[], 10.0, &race_date(60), now());
    let second = predictor.predict(&[], 10.0, &race_date(60), now());

    assert_eq!(first, second);
    assert_eq!(first.predicted_seconds, 330.0 * 0.98 * 1.05 * 10.0);
    assert_eq!(first.predicted_time, "56:35");
    assert_eq!(first.current_fitness_level, FitnessLevel::Beginner);
}

#[test]
fn confidence_never_exceeds_cap() {
    let history: Vec<_> = (0..30).map(|n| workout(n, dec!(10), "5:00")).collect();
    let prediction =
        PerformancePredictor::default().predict(&history, 10.0, &race_date(60), now());
    assert!(prediction.confidence_level <= 0.95);
    assert!(prediction.confidence_level >= 0.5);
}

#[test]
fn longer_races_predict_longer_times() {
    let history: Vec<_> = (0..15).map(|n| workout(n, dec!(8), "5:15")).collect();
    let predictor = PerformancePredictor::default();

    let five = predictor.predict(&history, 5.0, &race_date(60), now());
    let ten = predictor.predict(&history, 10.0, &race_date(60), now());
    let half = predictor.predict(&history, 21.1, &race_date(60), now());

    assert!(five.predicted_seconds < ten.predicted_seconds);
    assert!(ten.predicted_seconds < half.predicted_seconds);
}

#[test]
fn custom_settings_change_the_prediction() {
    let settings = PredictionSettings {
        factor_10k: 1.10,
        ..PredictionSettings::default()
    };
    let default_prediction =
        PerformancePredictor::default().predict(&[], 10.0, &race_date(60), now());
    let tuned_prediction =
        PerformancePredictor::new(settings).predict(&[], 10.0, &race_date(60), now());

    assert!(tuned_prediction.predicted_seconds > default_prediction.predicted_seconds);
}

#[test]
fn registry_is_consulted_per_bucket() {
    struct MarathonOnly;
    impl TrainedModelRegistry for MarathonOnly {
        fn has_model(&self, bucket: DistanceBucket) -> bool {
            bucket == DistanceBucket::Marathon
        }
        fn predict(&self, _features: &FeatureSet, _bucket: DistanceBucket) -> f64 {
            14400.0
        }
    }

    let predictor = PerformancePredictor::default().with_registry(Box::new(MarathonOnly));

    let marathon = predictor.predict(&[], 42.2, &race_date(90), now());
    assert_eq!(marathon.predicted_seconds, 14400.0);
    assert_eq!(marathon.predicted_time, "4:00:00");

    // Other buckets fall back to the empirical formula
    let ten_k = predictor.predict(&[], 10.0, &race_date(90), now());
    assert_eq!(ten_k.predicted_seconds, 330.0 * 0.98 * 1.05 * 10.0);
}

#[test]
fn milestones_precede_race_day() {
    let prediction =
        PerformancePredictor::default().predict(&[], 21.1, &race_date(100), now());

    assert!(!prediction.milestone_predictions.is_empty());
    for milestone in &prediction.milestone_predictions {
        assert!(milestone.checkpoint_days > 0);
        assert!(milestone.checkpoint_days < 100);
        assert!((0.0..=0.7).contains(&milestone.confidence));
    }
}

#[test]
fn benchmark_comparison_percentile_bounds() {
    let strong: Vec<_> = (0..25).map(|n| workout(n, dec!(14), "4:20")).collect();
    let comparison = BenchmarkComparator::compare(
        &strong,
        &AthleteProfile {
            age: 32,
            gender: "F".to_string(),
            experience_level: ExperienceLevel::Advanced,
        },
        None,
        now(),
    );

    assert!((5.0..=95.0).contains(&comparison.user_percentile));
    assert_eq!(comparison.user_percentile, 85.0);
    assert_eq!(comparison.peer_comparison.peer_group, "F, 27-37 years, advanced");
}

#[test]
fn prediction_serializes_to_json() {
    let prediction = PerformancePredictor::default().predict(&[], 10.0, &race_date(60), now());
    let json = serde_json::to_string_pretty(&prediction).unwrap();
    assert!(json.contains("\"predicted_time\""));
    assert!(json.contains("\"milestone_predictions\""));
}
