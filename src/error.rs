//! Unified error hierarchy for RunSight
//!
//! Maps each failure mode of the analytics engine to a structured, typed
//! variant. Recoverable defaults (pace fallback, race-date fallback) are
//! handled at the call sites that are allowed to use them; everything else
//! propagates through these types.

use thiserror::Error;

/// Top-level error type for all RunSight operations
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Malformed pace string (expected "MM:SS" with seconds < 60)
    #[error("Invalid pace format: {value:?}")]
    InvalidPaceFormat { value: String },

    /// Zero records supplied where at least one is required
    #[error("No workout data supplied for {analysis}")]
    EmptyInput { analysis: &'static str },

    /// Fewer records than the component's stated minimum
    #[error("Insufficient data for {analysis}: need {required}, got {actual}")]
    InsufficientData {
        analysis: &'static str,
        required: usize,
        actual: usize,
    },

    /// Unparsable date string outside the predictor's sanctioned fallback
    #[error("Invalid date: {value:?}")]
    InvalidDate { value: String },

    /// Import/export errors from the boundary layer
    #[error("Import error: {reason}")]
    Import { reason: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for RunSight operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

impl AnalyticsError {
    /// User-friendly message for CLI display
    pub fn user_message(&self) -> String {
        match self {
            AnalyticsError::InvalidPaceFormat { value } => {
                format!("Pace {value:?} is not in MM:SS format")
            }
            AnalyticsError::EmptyInput { analysis } => {
                format!("At least one workout is required for {analysis}")
            }
            AnalyticsError::InsufficientData {
                analysis,
                required,
                actual,
            } => {
                format!(
                    "{analysis} needs at least {required} workouts, but only {actual} were provided"
                )
            }
            AnalyticsError::InvalidDate { value } => {
                format!("Could not parse date {value:?} (expected ISO 8601)")
            }
            _ => self.to_string(),
        }
    }
}
