//! Workout history import
//!
//! Loads workout records from CSV or JSON files at the CLI boundary. Records
//! without an id get a generated UUID. Semantic sanity (positive distance
//! and duration, parseable dates) is checked here so the analyzers can
//! assume well-formed records; pace strings are validated downstream where
//! each analyzer decides between rejection and a logged default.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::error::{AnalyticsError, Result};
use crate::models::{WorkoutRecord, WorkoutType};

/// A record as it appears on disk, before id fill-in and validation
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<String>,
    date: String,
    #[serde(rename = "type")]
    workout_type: WorkoutType,
    duration_minutes: u32,
    distance_km: Decimal,
    pace: String,
    #[serde(default)]
    heart_rate: Option<u16>,
    #[serde(default)]
    elevation_gain: Option<Decimal>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    splits: Option<serde_json::Value>,
    #[serde(default)]
    weather: Option<serde_json::Value>,
}

/// Load a workout history file, dispatching on the extension
pub fn load_workouts(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let workouts = match extension.as_deref() {
        Some("csv") => load_csv(path)?,
        Some("json") => load_json(path)?,
        other => {
            return Err(AnalyticsError::Import {
                reason: format!(
                    "unsupported file format {:?} for {}",
                    other.unwrap_or("none"),
                    path.display()
                ),
            })
        }
    };

    info!(count = workouts.len(), path = %path.display(), "loaded workout history");
    Ok(workouts)
}

/// Load workout records from a CSV file with a header row
pub fn load_csv(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| AnalyticsError::Import {
        reason: format!("cannot read {}: {e}", path.display()),
    })?;

    let mut workouts = Vec::new();
    for (line, row) in reader.deserialize::<RawRecord>().enumerate() {
        let raw = row.map_err(|e| AnalyticsError::Import {
            reason: format!("row {}: {e}", line + 2),
        })?;
        workouts.push(finalize(raw)?);
    }

    Ok(workouts)
}

/// Load workout records from a JSON array file
pub fn load_json(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let contents = fs::read_to_string(path)?;
    let raw: Vec<RawRecord> =
        serde_json::from_str(&contents).map_err(|e| AnalyticsError::Import {
            reason: format!("{}: {e}", path.display()),
        })?;

    raw.into_iter().map(finalize).collect()
}

/// Fill in a missing id and run the semantic sanity checks
fn finalize(raw: RawRecord) -> Result<WorkoutRecord> {
    if raw.distance_km <= Decimal::ZERO {
        return Err(AnalyticsError::Import {
            reason: format!("non-positive distance {} km", raw.distance_km),
        });
    }
    if raw.duration_minutes == 0 {
        return Err(AnalyticsError::Import {
            reason: "zero duration workout".to_string(),
        });
    }

    Ok(WorkoutRecord {
        id: raw
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        date: parse_date(&raw.date)?,
        workout_type: raw.workout_type,
        duration_minutes: raw.duration_minutes,
        distance_km: raw.distance_km,
        pace: raw.pace,
        heart_rate: raw.heart_rate,
        elevation_gain: raw.elevation_gain,
        notes: raw.notes,
        splits: raw.splits,
        weather: raw.weather,
    })
}

/// Parse an RFC 3339 timestamp or a bare "YYYY-MM-DD" date
fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
        })
        .map_err(|_| AnalyticsError::InvalidDate {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_csv_import() {
        let file = temp_file(
            ".csv",
            "id,date,type,duration_minutes,distance_km,pace,heart_rate,elevation_gain,notes\n\
             w1,2024-03-01T08:00:00Z,endurance,50,8.5,5:30,148,120,morning run\n\
             ,2024-03-03,interval,35,6.0,4:45,,,\n",
        );

        let workouts = load_workouts(file.path()).unwrap();
        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].id, "w1");
        assert_eq!(workouts[0].workout_type, WorkoutType::Endurance);
        assert_eq!(workouts[0].heart_rate, Some(148));
        // Missing id gets a generated UUID
        assert_eq!(workouts[1].id.len(), 36);
        assert_eq!(workouts[1].heart_rate, None);
    }

    #[test]
    fn test_json_import() {
        let file = temp_file(
            ".json",
            r#"[
                {"date": "2024-03-01T08:00:00Z", "type": "recovery",
                 "duration_minutes": 30, "distance_km": 4.0, "pace": "6:30",
                 "splits": [310, 305, 300]}
            ]"#,
        );

        let workouts = load_workouts(file.path()).unwrap();
        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0].workout_type, WorkoutType::Recovery);
        assert!(workouts[0].splits.is_some());
    }

    #[test]
    fn test_rejects_non_positive_distance() {
        let file = temp_file(
            ".csv",
            "id,date,type,duration_minutes,distance_km,pace\n\
             w1,2024-03-01,endurance,50,0,5:30\n",
        );

        let result = load_workouts(file.path());
        assert!(matches!(result, Err(AnalyticsError::Import { .. })));
    }

    #[test]
    fn test_rejects_bad_date() {
        let file = temp_file(
            ".csv",
            "id,date,type,duration_minutes,distance_km,pace\n\
             w1,yesterday,endurance,50,8,5:30\n",
        );

        let result = load_workouts(file.path());
        assert!(matches!(result, Err(AnalyticsError::InvalidDate { .. })));
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let file = temp_file(".xml", "<workouts/>");
        let result = load_workouts(file.path());
        assert!(matches!(result, Err(AnalyticsError::Import { .. })));
    }

    #[test]
    fn test_bare_date_parses_to_midnight() {
        let date = parse_date("2024-03-15").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-15T00:00:00+00:00");
    }
}
