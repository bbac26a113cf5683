use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Workout types for categorizing training sessions
///
/// Closed classification: every record carries exactly one of these, and the
/// type drives the intensity factor used for training-load calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    /// Steady aerobic running
    Endurance,
    /// Interval or speed work
    Interval,
    /// Tempo or race-pace running
    Tempo,
    /// Active recovery running
    Recovery,
}

impl WorkoutType {
    /// Intensity factor used when computing training load
    pub fn intensity_factor(&self) -> f64 {
        match self {
            WorkoutType::Recovery => 0.5,
            WorkoutType::Endurance => 1.0,
            WorkoutType::Tempo => 1.2,
            WorkoutType::Interval => 1.5,
        }
    }

    /// True for the low-intensity types counted by the polarization index
    pub fn is_low_intensity(&self) -> bool {
        matches!(self, WorkoutType::Endurance | WorkoutType::Recovery)
    }
}

impl std::fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WorkoutType::Endurance => "endurance",
            WorkoutType::Interval => "interval",
            WorkoutType::Tempo => "tempo",
            WorkoutType::Recovery => "recovery",
        };
        write!(f, "{label}")
    }
}

/// A single recorded workout
///
/// Immutable input record: created by the caller, never mutated by the
/// engine. Splits and weather detail are carried through for serialization
/// but not analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Unique identifier for the workout
    pub id: String,

    /// Date and time of the workout
    pub date: DateTime<Utc>,

    /// Type/category of the workout
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,

    /// Duration in minutes (> 0)
    pub duration_minutes: u32,

    /// Distance in kilometers (> 0)
    pub distance_km: Decimal,

    /// Average pace in "MM:SS" per kilometer
    pub pace: String,

    /// Average heart rate in beats per minute
    pub heart_rate: Option<u16>,

    /// Elevation gain in meters
    pub elevation_gain: Option<Decimal>,

    /// Free-text notes
    pub notes: Option<String>,

    /// Per-split detail, carried through untouched
    pub splits: Option<serde_json::Value>,

    /// Weather conditions, carried through untouched
    pub weather: Option<serde_json::Value>,
}

impl WorkoutRecord {
    /// Distance as f64 for statistical aggregation
    pub fn distance_f64(&self) -> f64 {
        self.distance_km.to_f64().unwrap_or(0.0)
    }
}

/// Self-reported experience level used for benchmark comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            _ => Err(format!("Invalid experience level: {}", s)),
        }
    }
}

/// Athlete demographics supplied to the benchmark comparator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Age in years
    pub age: u8,

    /// Gender as reported by the athlete (matches benchmark table keys)
    pub gender: String,

    /// Self-reported experience level
    pub experience_level: ExperienceLevel,
}
