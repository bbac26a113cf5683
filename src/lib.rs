// Library interface for RunSight modules
// This allows integration tests to access the core functionality

pub mod analysis;
pub mod benchmark;
pub mod config;
pub mod error;
pub mod features;
pub mod import;
pub mod injury;
pub mod logging;
pub mod models;
pub mod pace;
pub mod prediction;
pub mod trends;
pub mod zones;

// Re-export commonly used types for convenience
pub use analysis::{WorkoutAnalysis, WorkoutAnalyzer};
pub use benchmark::{AthleteComparison, BenchmarkComparator};
pub use config::{AnalyticsConfig, AnalyzerSettings, PredictionSettings};
pub use error::{AnalyticsError, Result};
pub use features::{FeatureExtractor, FeatureSet};
pub use injury::{InjuryRiskAssessment, InjuryRiskAssessor};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::{AthleteProfile, ExperienceLevel, WorkoutRecord, WorkoutType};
pub use prediction::{
    DistanceBucket, PerformancePrediction, PerformancePredictor, TrainedModelRegistry,
};
pub use trends::{PerformanceTrend, TrendAnalyzer};
pub use zones::{TrainingZoneAnalysis, ZoneAnalyzer};
