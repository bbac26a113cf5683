use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use runsight::analysis::WorkoutAnalyzer;
use runsight::features::FeatureExtractor;
use runsight::injury::InjuryRiskAssessor;
use runsight::models::{WorkoutRecord, WorkoutType};
use runsight::prediction::PerformancePredictor;
use runsight::trends::TrendAnalyzer;

/// Performance benchmarks for the analytics engine
///
/// These benchmarks test the performance of core calculations
/// with varying history sizes to ensure scalability.

fn benchmark_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn create_workout_history(size: usize) -> Vec<WorkoutRecord> {
    (0..size)
        .map(|n| WorkoutRecord {
            id: format!("w{n}"),
            date: Utc.with_ymd_and_hms(2023, 1, 1, 8, 0, 0).unwrap()
                + Duration::days(n as i64),
            workout_type: match n % 5 {
                0 => WorkoutType::Interval,
                1 => WorkoutType::Recovery,
                2 => WorkoutType::Tempo,
                _ => WorkoutType::Endurance,
            },
            duration_minutes: 30 + (n % 60) as u32,
            distance_km: Decimal::from(4 + (n % 12) as u32),
            pace: format!("{}:{:02}", 4 + n % 3, (n * 7) % 60),
            heart_rate: Some(130 + (n % 50) as u16),
            elevation_gain: None,
            notes: None,
            splits: None,
            weather: None,
        })
        .collect()
}

fn bench_feature_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Feature Extraction");

    for &size in &[10, 100, 1000] {
        let history = create_workout_history(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("extract", size),
            &history,
            |b, history| {
                b.iter(|| FeatureExtractor::extract(black_box(history), benchmark_now()));
            },
        );
    }

    group.finish();
}

fn bench_workout_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("Workout Analysis");
    let analyzer = WorkoutAnalyzer::default();

    for &size in &[10, 100, 1000] {
        let history = create_workout_history(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("analyze", size),
            &history,
            |b, history| {
                b.iter(|| analyzer.analyze(black_box(history), benchmark_now()));
            },
        );
    }

    group.finish();
}

fn bench_trend_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("Trend Analysis");

    for &size in &[10, 100, 1000] {
        let history = create_workout_history(size);

        group.bench_with_input(
            BenchmarkId::new("analyze_trend", size),
            &history,
            |b, history| {
                b.iter(|| TrendAnalyzer::analyze(black_box(history), benchmark_now()));
            },
        );
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Race Prediction");
    let predictor = PerformancePredictor::default();

    for &size in &[10, 100, 1000] {
        let history = create_workout_history(size);

        group.bench_with_input(
            BenchmarkId::new("predict_10k", size),
            &history,
            |b, history| {
                b.iter(|| {
                    predictor.predict(
                        black_box(history),
                        10.0,
                        "2024-08-01",
                        benchmark_now(),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_injury_assessment(c: &mut Criterion) {
    let mut group = c.benchmark_group("Injury Risk");

    for &size in &[10, 100, 1000] {
        let history = create_workout_history(size);

        group.bench_with_input(
            BenchmarkId::new("assess", size),
            &history,
            |b, history| {
                b.iter(|| InjuryRiskAssessor::assess(black_box(history)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_feature_extraction,
    bench_workout_analysis,
    bench_trend_analysis,
    bench_prediction,
    bench_injury_assessment
);
criterion_main!(benches);
