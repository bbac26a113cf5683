//! End-to-end analytics tests over the public library interface

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;

use runsight::analysis::{PaceTrend, WorkoutAnalyzer};
use runsight::error::AnalyticsError;
use runsight::import;
use runsight::injury::{InjuryRiskAssessor, RiskLevel};
use runsight::models::{WorkoutRecord, WorkoutType};
use runsight::trends::{FitnessTrend, TrendAnalyzer};
use runsight::zones::ZoneAnalyzer;

fn workout(
    n: u32,
    workout_type: WorkoutType,
    distance: Decimal,
    duration: u32,
    pace: &str,
) -> WorkoutRecord {
    WorkoutRecord {
        id: format!("w{n}"),
        date: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap() + Duration::days(i64::from(n) * 3),
        workout_type,
        duration_minutes: duration,
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

#[test]
fn identical_workout_scores_seventy_with_stable_trend() {
    // 10 endurance runs at 5 km / 30:00 (6:00/km), then an identical 11th:
    // base 50 + distance bonus 10 + progression bonus 10
    let history: Vec<_> = (0..11)
        .map(|n| {
            let mut w = workout(n, WorkoutType::Endurance, dec!(5), 30, "6:00");
            w.heart_rate = None;
            w
        })
        .collect();

    let analyzer = WorkoutAnalyzer::default();
    let analysis = analyzer.analyze(&history, now()).unwrap();
    assert_eq!(analysis.overall_score, 70.0);
    assert_eq!(analysis.pace_analysis.trend, Some(PaceTrend::Stable));
}

#[test]
fn analyzer_results_stay_in_documented_ranges() {
    let history: Vec<_> = (0..15)
        .map(|n| {
            workout(
                n,
                match n % 4 {
                    0 => WorkoutType::Interval,
                    1 => WorkoutType::Recovery,
                    2 => WorkoutType::Tempo,
                    _ => WorkoutType::Endurance,
                },
                Decimal::from(4 + n % 8),
                40,
                "5:15",
            )
        })
        .collect();

    let analysis = WorkoutAnalyzer::default().analyze(&history, now()).unwrap();
    assert!((0.0..=100.0).contains(&analysis.overall_score));
    assert!((0.0..=1.0).contains(&analysis.effort_consistency));

    let zones = ZoneAnalyzer::analyze(&history).unwrap();
    assert!((0.0..=100.0).contains(&zones.polarization_index));

    let risk = InjuryRiskAssessor::assess(&history);
    assert!((0.0..=100.0).contains(&risk.risk_score));
}

#[test]
fn trend_analysis_needs_three_workouts() {
    let history: Vec<_> = (0..2)
        .map(|n| workout(n, WorkoutType::Endurance, dec!(5), 30, "6:00"))
        .collect();

    let result = TrendAnalyzer::analyze(&history, now());
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
fn three_workouts_yield_insufficient_fitness_trend() {
    // Enough for trend analysis, not enough for a fitness verdict
    let history = vec![
        workout(0, WorkoutType::Endurance, dec!(5), 30, "6:00"),
        workout(1, WorkoutType::Endurance, dec!(6), 35, "5:55"),
        workout(2, WorkoutType::Endurance, dec!(7), 40, "5:50"),
    ];

    let trend = TrendAnalyzer::analyze(&history, now()).unwrap();
    assert_eq!(trend.fitness_trend, FitnessTrend::Insufficient);
}

#[test]
fn overloaded_window_is_high_risk() {
    // 11 same-type records in the scoring window, no recovery, ending with
    // a >30% distance jump
    let mut history: Vec<_> = (0..9)
        .map(|n| workout(n, WorkoutType::Endurance, dec!(6), 40, "5:30"))
        .collect();
    history.push(workout(9, WorkoutType::Endurance, dec!(10), 60, "5:30"));
    history.push(workout(10, WorkoutType::Endurance, dec!(10), 60, "5:30"));

    let assessment = InjuryRiskAssessor::assess(&history);
    assert_eq!(assessment.risk_score, 90.0);
    assert_eq!(assessment.overall_risk, RiskLevel::High);
}

#[test]
fn analyzers_are_idempotent() {
    let history: Vec<_> = (0..12)
        .map(|n| {
            workout(
                n,
                if n % 3 == 0 {
                    WorkoutType::Interval
                } else {
                    WorkoutType::Endurance
                },
                Decimal::from(5 + n % 6),
                45,
                "5:20",
            )
        })
        .collect();

    let analyzer = WorkoutAnalyzer::default();
    assert_eq!(
        analyzer.analyze(&history, now()).unwrap(),
        analyzer.analyze(&history, now()).unwrap()
    );
    assert_eq!(
        TrendAnalyzer::analyze(&history, now()).unwrap(),
        TrendAnalyzer::analyze(&history, now()).unwrap()
    );
    assert_eq!(
        ZoneAnalyzer::analyze(&history).unwrap(),
        ZoneAnalyzer::analyze(&history).unwrap()
    );
    assert_eq!(
        InjuryRiskAssessor::assess(&history),
        InjuryRiskAssessor::assess(&history)
    );
}

#[test]
fn imported_history_flows_through_analyzers() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "id,date,type,duration_minutes,distance_km,pace,heart_rate").unwrap();
    for n in 0..6 {
        writeln!(
            file,
            ",2024-02-{:02},endurance,45,8.0,5:30,145",
            2 + n * 3
        )
        .unwrap();
    }

    let workouts = import::load_workouts(file.path()).unwrap();
    assert_eq!(workouts.len(), 6);
    // Generated UUIDs are unique
    let mut ids: Vec<&str> = workouts.iter().map(|w| w.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 6);

    let analysis = WorkoutAnalyzer::default().analyze(&workouts, now()).unwrap();
    assert!(analysis.overall_score >= 50.0);
}

#[test]
fn zone_shares_sum_to_hundred_for_any_nonempty_mix() {
    for (e, i, t, r) in [(1, 0, 0, 0), (3, 1, 1, 1), (10, 5, 2, 3), (0, 0, 0, 7)] {
        let mut history = Vec::new();
        let mut n = 0;
        for (count, workout_type) in [
            (e, WorkoutType::Endurance),
            (i, WorkoutType::Interval),
            (t, WorkoutType::Tempo),
            (r, WorkoutType::Recovery),
        ] {
            for _ in 0..count {
                history.push(workout(n, workout_type, dec!(6), 40, "5:30"));
                n += 1;
            }
        }

        let analysis = ZoneAnalyzer::analyze(&history).unwrap();
        let d = &analysis.zone_distribution;
        let sum = d.recovery_pct + d.endurance_pct + d.tempo_pct + d.interval_pct;
        assert!((sum - 100.0).abs() < 1e-9);
    }
}

#[test]
fn analysis_serializes_to_json() {
    let history: Vec<_> = (0..5)
        .map(|n| workout(n, WorkoutType::Endurance, dec!(8), 45, "5:30"))
        .collect();

    let analysis = WorkoutAnalyzer::default().analyze(&history, now()).unwrap();
    let json = serde_json::to_string(&analysis).unwrap();
    assert!(json.contains("\"overall_score\""));
    assert!(json.contains("\"pace_analysis\""));
}
