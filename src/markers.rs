//! # Fishing Marker Grouping
//!
//! Catches logged a few minutes apart would draw overlapping markers on the tide
//! chart. This module folds them into marker groups that the chart can draw as a
//! single, expandable marker.
//!
//! ## Algorithm
//! 1. Drop records whose time is not strict `HH:mm` (lossy, never an error)
//! 2. Stable-sort the rest by minutes since midnight
//! 3. One greedy pass: a record joins the open group when it is at most
//!    `threshold` minutes after the group's *first* record, otherwise it opens
//!    a new group
//!
//! Anchoring on the first record keeps a slow drip of catches from chaining
//! into one group spanning hours.

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Default proximity window in minutes.
pub const DEFAULT_THRESHOLD_MINUTES: u32 = 5;

const MINUTES_PER_DAY: i32 = 24 * 60;

/// A single catch as it arrives from the log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FishingMarkerRecord {
    pub id: String,
    /// Local catch time, `"HH:mm"`
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    /// Size in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl FishingMarkerRecord {
    pub fn new(id: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            time: time.into(),
            species: None,
            size: None,
        }
    }

    /// Minutes since midnight, `None` when `time` is malformed.
    pub fn minutes(&self) -> Option<u32> {
        parse_time_to_minutes(&self.time)
    }
}

/// Records drawn as one marker.
///
/// `x`/`y` are screen positions filled in by whatever draws the chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerGroup {
    /// Time of the earliest record, `"HH:mm"`
    pub time: String,
    pub records: Vec<FishingMarkerRecord>,
    pub is_expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl MarkerGroup {
    fn anchored_at(record: FishingMarkerRecord) -> Self {
        Self {
            time: record.time.clone(),
            records: vec![record],
            is_expanded: false,
            x: None,
            y: None,
        }
    }

    /// Minutes since midnight of the group's anchor record.
    pub fn minutes(&self) -> Option<u32> {
        parse_time_to_minutes(&self.time)
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn toggle_expanded(&mut self) {
        self.is_expanded = !self.is_expanded;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("time pattern should be valid")
    })
}

/// Parse strict `HH:mm` (00:00 to 23:59, both fields two digits).
///
/// # Example
/// ```
/// use fishing_tide_lib::markers::parse_time_to_minutes;
///
/// assert_eq!(parse_time_to_minutes("07:45"), Some(465));
/// assert_eq!(parse_time_to_minutes("24:00"), None);
/// assert_eq!(parse_time_to_minutes("7:45"), None);
/// ```
pub fn parse_time_to_minutes(time: &str) -> Option<u32> {
    let captures = time_pattern().captures(time)?;
    let hours: u32 = captures[1].parse().ok()?;
    let minutes: u32 = captures[2].parse().ok()?;
    Some(hours * 60 + minutes)
}

/// Format minutes since midnight as `HH:mm`, wrapping into a single day.
pub fn minutes_to_time_string(minutes: i32) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Group records whose times are within `threshold_minutes` of a group's
/// first record.
///
/// Groups come back in ascending time order, each with its records ascending
/// and `is_expanded == false`. Every record with a valid time lands in exactly
/// one group; records with malformed times are dropped.
///
/// # Example
/// ```
/// use fishing_tide_lib::markers::{group_by_proximity, FishingMarkerRecord};
///
/// let records = vec![
///     FishingMarkerRecord::new("1", "12:00"),
///     FishingMarkerRecord::new("2", "12:03"),
///     FishingMarkerRecord::new("3", "14:00"),
/// ];
/// let groups = group_by_proximity(&records, 5);
///
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].time, "12:00");
/// assert_eq!(groups[0].records.len(), 2);
/// assert_eq!(groups[1].time, "14:00");
/// ```
pub fn group_by_proximity(
    records: &[FishingMarkerRecord],
    threshold_minutes: u32,
) -> Vec<MarkerGroup> {
    let mut valid: Vec<(u32, &FishingMarkerRecord)> = records
        .iter()
        .filter_map(|record| record.minutes().map(|minutes| (minutes, record)))
        .collect();

    let dropped = records.len() - valid.len();
    if dropped > 0 {
        debug!("Dropped {dropped} fishing record(s) with malformed HH:mm times");
    }

    valid.sort_by_key(|(minutes, _)| *minutes);

    let mut groups = Vec::new();
    let mut current: Option<(u32, MarkerGroup)> = None;

    for (minutes, record) in valid {
        current = match current.take() {
            Some((anchor, mut group)) if minutes - anchor <= threshold_minutes => {
                group.records.push(record.clone());
                Some((anchor, group))
            }
            Some((_, group)) => {
                groups.push(group);
                Some((minutes, MarkerGroup::anchored_at(record.clone())))
            }
            None => Some((minutes, MarkerGroup::anchored_at(record.clone()))),
        };
    }

    if let Some((_, group)) = current {
        groups.push(group);
    }

    debug!(
        "Grouped {} fishing record(s) into {} marker group(s) with a {threshold_minutes} min threshold",
        records.len() - dropped,
        groups.len()
    );

    groups
}
