use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{Table, Tabled};

use runsight::analysis::WorkoutAnalyzer;
use runsight::benchmark::BenchmarkComparator;
use runsight::config::AnalyticsConfig;
use runsight::import;
use runsight::injury::InjuryRiskAssessor;
use runsight::logging::{init_logging, LogConfig, LogLevel};
use runsight::models::{AthleteProfile, ExperienceLevel, WorkoutRecord};
use runsight::prediction::PerformancePredictor;
use runsight::trends::TrendAnalyzer;
use runsight::zones::ZoneAnalyzer;

/// RunSight - Training Analytics CLI
///
/// Analyzes runner workout histories: workout scoring, performance trends,
/// training zone balance, injury risk, race-time prediction, and peer
/// benchmarking.
#[derive(Parser)]
#[command(name = "runsight")]
#[command(version = "0.1.0")]
#[command(about = "Running Analytics CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit results as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the most recent workout against its history
    Analyze {
        /// Workout history file (CSV or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Analyze performance trends over the history
    Trend {
        /// Workout history file (CSV or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show training zone distribution and intensity balance
    Zones {
        /// Workout history file (CSV or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Assess injury risk from recent training patterns
    Risk {
        /// Workout history file (CSV or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Predict a race time for a target distance and date
    Predict {
        /// Workout history file (CSV or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Target race distance in kilometers
        #[arg(short, long)]
        distance: f64,

        /// Target race date (YYYY-MM-DD or RFC 3339)
        #[arg(short = 'D', long)]
        date: String,
    },

    /// Compare the athlete profile against peer benchmarks
    Compare {
        /// Workout history file (CSV or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Athlete age in years
        #[arg(short, long)]
        age: u8,

        /// Athlete gender (matches benchmark table keys)
        #[arg(short, long)]
        gender: String,

        /// Experience level (beginner, intermediate, advanced)
        #[arg(short, long, default_value = "intermediate")]
        experience: ExperienceLevel,

        /// Optional benchmark reference table (JSON)
        #[arg(short, long)]
        benchmarks: Option<PathBuf>,
    },
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    zone: &'static str,
    #[tabled(rename = "Share")]
    share: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };
    init_logging(&LogConfig {
        level: log_level,
        ..LogConfig::default()
    })?;

    let config = AnalyticsConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    let now = Utc::now();

    match cli.command {
        Commands::Analyze { file } => {
            let workouts = load(&file)?;
            let analyzer = WorkoutAnalyzer::new(config.analyzer);
            let analysis = analyzer
                .analyze(&workouts, now)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            if cli.json {
                return print_json(&analysis);
            }

            println!("{}", "Workout Analysis".cyan().bold());
            println!("  Workout: {}", analysis.workout_id);
            println!("  Overall score: {:.0}/100", analysis.overall_score);
            println!(
                "  Pace: {} ({})",
                analysis.pace_analysis.current_pace, analysis.pace_analysis.category
            );
            if let Some(trend) = analysis.pace_analysis.trend {
                println!("  Pace trend: {trend}");
            }
            if let Some(zones) = &analysis.heart_rate_zones {
                println!(
                    "  HR zone proximity: z1 {:.0} / z2 {:.0} / z3 {:.0} / z4 {:.0}",
                    zones.zone1, zones.zone2, zones.zone3, zones.zone4
                );
            }
            println!("  Fatigue: {}", analysis.fatigue_level);
            println!("  Recovery: {}", analysis.recovery_recommendation);
            for insight in &analysis.performance_insights {
                println!("  - {insight}");
            }
            if let Some(comparison) = &analysis.comparison_to_history {
                println!(
                    "  Distance vs average: {:+.1}%",
                    comparison.distance_vs_average_pct
                );
                if let Some(pace_delta) = comparison.pace_vs_average_pct {
                    println!("  Pace vs average: {:+.1}%", pace_delta);
                }
            } else {
                println!("  {}", "First recorded workout".dimmed());
            }
        }

        Commands::Trend { file } => {
            let workouts = load(&file)?;
            let trend = TrendAnalyzer::analyze(&workouts, now)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            if cli.json {
                return print_json(&trend);
            }

            println!("{}", "Performance Trends".blue().bold());
            println!("  Period: {}", trend.period);
            println!("  Fitness: {}", trend.fitness_trend);
            println!(
                "  Endurance: {:+.1}% (avg {:.1} km, dispersion {:.1} km)",
                trend.endurance_evolution.trend_pct,
                trend.endurance_evolution.average_distance_km,
                trend.endurance_evolution.dispersion_km
            );
            println!(
                "  Speed: {:+.1}% (avg pace {:.0}s, best {:.0}s)",
                trend.speed_evolution.trend_pct,
                trend.speed_evolution.average_pace_seconds,
                trend.speed_evolution.best_pace_seconds
            );
            println!(
                "  Volume: {:.1} km total, {:.1} km/week projected",
                trend.volume_analysis.total_distance_km,
                trend.volume_analysis.weekly_projection_km
            );
            for recommendation in &trend.recommendations {
                println!("  - {recommendation}");
            }
            for risk in &trend.risk_factors {
                println!("  {} {risk}", "!".yellow().bold());
            }
        }

        Commands::Zones { file } => {
            let workouts = load(&file)?;
            let analysis = ZoneAnalyzer::analyze(&workouts)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            if cli.json {
                return print_json(&analysis);
            }

            println!("{}", "Training Zones".magenta().bold());
            let d = &analysis.zone_distribution;
            let rows = vec![
                ZoneRow {
                    zone: "Recovery",
                    share: format!("{:.1}%", d.recovery_pct),
                },
                ZoneRow {
                    zone: "Endurance",
                    share: format!("{:.1}%", d.endurance_pct),
                },
                ZoneRow {
                    zone: "Tempo",
                    share: format!("{:.1}%", d.tempo_pct),
                },
                ZoneRow {
                    zone: "Interval",
                    share: format!("{:.1}%", d.interval_pct),
                },
            ];
            println!("{}", Table::new(rows));
            println!(
                "  Polarization: {:.1}% low intensity",
                analysis.polarization_index
            );
            println!("  Balance: {}", analysis.intensity_balance);
            for recommendation in [
                &analysis.recommendations.endurance,
                &analysis.recommendations.interval,
                &analysis.recommendations.recovery,
            ]
            .into_iter()
            .flatten()
            {
                println!("  - {recommendation}");
            }
        }

        Commands::Risk { file } => {
            let workouts = load(&file)?;
            let assessment = InjuryRiskAssessor::assess(&workouts);

            if cli.json {
                return print_json(&assessment);
            }

            println!("{}", "Injury Risk".red().bold());
            println!(
                "  Risk: {} (score {:.0}/100)",
                assessment.overall_risk, assessment.risk_score
            );
            for factor in &assessment.risk_factors {
                println!("  {} {} ({})", "!".yellow().bold(), factor.description, factor.value);
            }
            println!("  {}", "Prevention".bold());
            for tip in &assessment.prevention_tips {
                println!("  - {tip}");
            }
            println!("  {}", "Actions".bold());
            for action in &assessment.recommended_actions {
                println!("  - {action}");
            }
        }

        Commands::Predict {
            file,
            distance,
            date,
        } => {
            let workouts = load(&file)?;
            let predictor = PerformancePredictor::new(config.prediction);
            let prediction = predictor.predict(&workouts, distance, &date, now);

            if cli.json {
                return print_json(&prediction);
            }

            println!("{}", "Race Prediction".green().bold());
            println!(
                "  {:.1} km on {}: {}",
                prediction.target_distance_km,
                prediction.target_date,
                prediction.predicted_time.bold()
            );
            println!(
                "  Confidence: {:.0}%",
                prediction.confidence_level * 100.0
            );
            println!("  Fitness: {}", prediction.current_fitness_level);
            println!("  Potential: {}", prediction.improvement_potential);
            for recommendation in &prediction.training_recommendations {
                println!("  - {recommendation}");
            }
            if !prediction.milestone_predictions.is_empty() {
                println!("  {}", "Milestones".bold());
                for milestone in &prediction.milestone_predictions {
                    println!(
                        "  - J-{}: {} ({:.1}% improvement, {:.0}% confidence)",
                        milestone.checkpoint_days,
                        milestone.predicted_time,
                        milestone.expected_improvement_pct,
                        milestone.confidence * 100.0
                    );
                }
            }
        }

        Commands::Compare {
            file,
            age,
            gender,
            experience,
            benchmarks,
        } => {
            let workouts = load(&file)?;
            let table = benchmarks
                .map(|path| -> Result<serde_json::Value> {
                    let contents = std::fs::read_to_string(&path)
                        .with_context(|| format!("cannot read {}", path.display()))?;
                    serde_json::from_str(&contents)
                        .with_context(|| format!("invalid benchmark table {}", path.display()))
                })
                .transpose()?;
            let profile = AthleteProfile {
                age,
                gender,
                experience_level: experience,
            };
            let comparison = BenchmarkComparator::compare(&workouts, &profile, table, now);

            if cli.json {
                return print_json(&comparison);
            }

            println!("{}", "Athlete Comparison".yellow().bold());
            println!("  Percentile: {:.0}", comparison.user_percentile);
            println!("  Peer group: {}", comparison.peer_comparison.peer_group);
            println!("  {}", "Strengths".bold());
            for strength in &comparison.strengths {
                println!("  - {strength}");
            }
            println!("  {}", "Areas for improvement".bold());
            for area in &comparison.areas_for_improvement {
                println!("  - {area}");
            }
            println!("  Potential: {}", comparison.progression_potential);
        }
    }

    Ok(())
}

fn load(file: &PathBuf) -> Result<Vec<WorkoutRecord>> {
    import::load_workouts(file).map_err(|e| anyhow::anyhow!(e.user_message()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
