//! Pace and time unit conversions
//!
//! Pace is always represented internally as non-negative integer seconds per
//! kilometer. Display format is "MM:SS", or "H:MM:SS" for totals of an hour
//! or more.

use crate::error::{AnalyticsError, Result};
use tracing::warn;

/// Documented fallback pace (5:00/km) for convenience substitution paths
pub const DEFAULT_PACE_SECONDS: u32 = 300;

/// Parse a "MM:SS" pace string into seconds per kilometer
///
/// Rejects anything that is not exactly two colon-separated non-negative
/// integers with seconds < 60. Malformed input is fully invalid: no partial
/// parse, no silent default. Callers that want a fallback use
/// [`pace_seconds_or_default`].
pub fn pace_to_seconds(pace: &str) -> Result<u32> {
    let invalid = || AnalyticsError::InvalidPaceFormat {
        value: pace.to_string(),
    };

    let mut parts = pace.split(':');
    let minutes: u32 = parts
        .next()
        .filter(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    let seconds: u32 = parts
        .next()
        .filter(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;

    if parts.next().is_some() || seconds >= 60 {
        return Err(invalid());
    }

    Ok(minutes * 60 + seconds)
}

/// Parse a pace string, substituting a documented default on failure
///
/// The substitution is logged so it is never silent; only convenience paths
/// (display, non-scoring summaries) should use this.
pub fn pace_seconds_or_default(pace: &str, default: u32) -> u32 {
    match pace_to_seconds(pace) {
        Ok(seconds) => seconds,
        Err(_) => {
            warn!(pace = %pace, default, "unparsable pace, substituting default");
            default
        }
    }
}

/// Format seconds per kilometer as a "MM:SS" pace string
pub fn seconds_to_pace(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Format a total duration in seconds as "MM:SS", or "H:MM:SS" from one hour
///
/// Fractional seconds are truncated.
pub fn seconds_to_time_string(total_seconds: f64) -> String {
    let total = total_seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
