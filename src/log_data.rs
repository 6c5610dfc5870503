//! # Fishing Log Files
//!
//! Reads one day's fishing log from JSON: the catch records to plot and the
//! high/low tide events a tide-info provider published for the spot.
//!
//! ## Format
//!
//! ```json
//! {
//!   "records": [
//!     { "id": "1", "time": "05:42", "species": "aji", "size": 21.5 }
//!   ],
//!   "events": [
//!     { "time": "2024-06-15T06:12:00+09:00", "type": "high", "level": 182.0 }
//!   ]
//! }
//! ```
//!
//! Both arrays are optional. Record times are local `HH:mm`; event times are
//! RFC 3339 with an explicit offset.
//!
//! ## Error Handling
//!
//! All failures surface as [`DataError`]:
//! - **IO**: missing file, permissions
//! - **JSON**: malformed document or a bad event timestamp
//! - **Invalid event**: a level outside ±[`MAX_EVENT_LEVEL_CM`]

use crate::markers::FishingMarkerRecord;
use crate::TideEvent;
use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error;

/// Largest plausible tide level, in cm either side of chart datum.
pub const MAX_EVENT_LEVEL_CM: f64 = 1000.0;

/// Errors that can occur while reading or writing a fishing log.
#[derive(Error, Debug)]
pub enum DataError {
    /// File could not be read or written
    #[error("log file IO: {0}")]
    Io(#[from] io::Error),

    /// Document is not a valid fishing log
    #[error("log file JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Event level is outside the plausible tide range
    #[error("tide event at {time} has implausible level {level} cm")]
    InvalidEvent { time: String, level: f64 },
}

/// One day of catches plus the tide events around them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FishingLog {
    #[serde(default)]
    pub records: Vec<FishingMarkerRecord>,
    #[serde(default)]
    pub events: Vec<TideEvent>,
}

impl FishingLog {
    /// Catch instants on the day starting at `midnight`, for chart markers.
    ///
    /// Records with malformed times are skipped.
    pub fn catch_times(&self, midnight: DateTime<FixedOffset>) -> Vec<DateTime<FixedOffset>> {
        self.records
            .iter()
            .filter_map(|record| record.minutes())
            .map(|minutes| midnight + Duration::minutes(i64::from(minutes)))
            .collect()
    }
}

/// Parse a fishing log from JSON text.
pub fn parse(json: &str) -> Result<FishingLog, DataError> {
    let log: FishingLog = serde_json::from_str(json)?;

    let plausible = -MAX_EVENT_LEVEL_CM..=MAX_EVENT_LEVEL_CM;
    if let Some(event) = log.events.iter().find(|event| !plausible.contains(&event.level)) {
        return Err(DataError::InvalidEvent {
            time: event.time.to_rfc3339(),
            level: event.level,
        });
    }

    Ok(log)
}

/// Load a fishing log file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<FishingLog, DataError> {
    let json = fs::read_to_string(path)?;
    parse(&json)
}

/// Write a fishing log file as pretty JSON.
pub fn save<P: AsRef<Path>>(path: P, log: &FishingLog) -> Result<(), DataError> {
    let json = serde_json::to_string_pretty(log)?;
    fs::write(path, json)?;
    Ok(())
}
