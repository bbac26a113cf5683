//! Athlete benchmark comparison
//!
//! Positions a runner's training statistics against a peer population. The
//! reference benchmark table is supplied by the caller as a JSON value and
//! passed through unchanged; no fetching or caching happens here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::FeatureExtractor;
use crate::models::{AthleteProfile, ExperienceLevel, WorkoutRecord};

/// Qualitative comparison against the peer group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerComparison {
    pub distance_vs_peers: String,
    pub pace_vs_peers: String,
    pub consistency_vs_peers: String,
    /// "gender, age band, experience" descriptor
    pub peer_group: String,
}

/// Progression headroom from demographics and experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionPotential {
    /// Beginner experience level: large margin for improvement
    VeryHigh,
    /// Under 40: significant capacity for improvement
    High,
    /// Progression through technical optimization
    Moderate,
}

impl std::fmt::Display for ProgressionPotential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProgressionPotential::VeryHigh => "very high - large margin for improvement",
            ProgressionPotential::High => "high - significant capacity for improvement",
            ProgressionPotential::Moderate => {
                "moderate - progression through technical optimization"
            }
        };
        write!(f, "{label}")
    }
}

/// Complete athlete comparison result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteComparison {
    /// Population percentile, [5, 95]
    pub user_percentile: f64,
    pub peer_comparison: PeerComparison,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub progression_potential: ProgressionPotential,
    /// The supplied benchmark reference table, passed through unchanged
    pub benchmark_data: Option<serde_json::Value>,
}

/// Benchmark comparison engine
pub struct BenchmarkComparator;

impl BenchmarkComparator {
    /// Compare a runner's history against the peer population
    ///
    /// `benchmarks` is the externally fetched reference table; it is carried
    /// in the result untouched. An empty history compares the default
    /// beginner profile.
    pub fn compare(
        workouts: &[WorkoutRecord],
        profile: &AthleteProfile,
        benchmarks: Option<serde_json::Value>,
        now: DateTime<Utc>,
    ) -> AthleteComparison {
        let features = FeatureExtractor::extract(workouts, now);

        AthleteComparison {
            user_percentile: Self::percentile(features.avg_distance, features.best_pace),
            peer_comparison: Self::peer_comparison(profile),
            strengths: Self::strengths(features.max_distance, features.workout_count),
            areas_for_improvement: Self::improvement_areas(features.best_pace),
            progression_potential: Self::progression_potential(profile),
            benchmark_data: benchmarks,
        }
    }

    /// Base 50, bumped for high weekly distance and a sub-5:00 best pace
    fn percentile(avg_distance: f64, best_pace: f64) -> f64 {
        let mut percentile: f64 = 50.0;

        if avg_distance > 8.0 {
            percentile += 20.0;
        }
        if best_pace < 300.0 {
            percentile += 15.0;
        }

        percentile.clamp(5.0, 95.0)
    }

    fn peer_comparison(profile: &AthleteProfile) -> PeerComparison {
        let age = u32::from(profile.age);
        PeerComparison {
            distance_vs_peers: "above average".to_string(),
            pace_vs_peers: "average".to_string(),
            consistency_vs_peers: "excellent".to_string(),
            peer_group: format!(
                "{}, {}-{} years, {}",
                profile.gender,
                age.saturating_sub(5),
                age + 5,
                profile.experience_level
            ),
        }
    }

    fn strengths(max_distance: f64, workout_count: usize) -> Vec<String> {
        let mut strengths = Vec::new();

        if max_distance > 15.0 {
            strengths.push("Excellent long-distance endurance capacity".to_string());
        }
        if workout_count >= 20 {
            strengths.push("Very good training regularity".to_string());
        }

        if strengths.is_empty() {
            strengths.push("Balanced athlete profile".to_string());
        }
        strengths
    }

    fn improvement_areas(best_pace: f64) -> Vec<String> {
        let mut improvements = Vec::new();

        // Slower than 5:50/km
        if best_pace > 350.0 {
            improvements.push("Speed and interval work".to_string());
        }
        improvements.push("Diversification of workout types".to_string());

        improvements
    }

    fn progression_potential(profile: &AthleteProfile) -> ProgressionPotential {
        if profile.experience_level == ExperienceLevel::Beginner {
            ProgressionPotential::VeryHigh
        } else if profile.age < 40 {
            ProgressionPotential::High
        } else {
            ProgressionPotential::Moderate
        }
    }
}
