//! # Fishing Tide Log Core Library
//!
//! Data structures and pure algorithms behind the fishing log's tide chart.
//! Nothing in this crate owns UI state: every function takes its inputs
//! explicitly and returns a fresh value, so repeated calls with the same
//! inputs give bit-identical results.
//!
//! ## Components
//!
//! - [`harmonic`]: synthesizes a tide level (cm) for any instant and location
//!   from four stylized tidal constituents (M2, S2, K1, O1)
//! - [`curve`]: samples the synthesizer across one local calendar day and
//!   merges externally supplied high/low [`TideEvent`]s into a [`TideCurve`]
//! - [`analysis`]: rates how close a catch was to the next tide extremum
//! - [`markers`]: clusters catch records into chart marker groups
//!
//! ## Time Model
//!
//! All instants carry a fixed UTC offset (`DateTime<FixedOffset>`). A fixed
//! offset pins the local day to exactly 24 hours, so a curve always spans
//! `[00:00, 24:00)` local time with no daylight-saving seams.
//!
//! ## Data Flow
//! 1. **Curve**: date + coordinates + tide events → [`curve::build_day_curve`] → chart
//! 2. **Markers**: catch records → [`markers::group_by_proximity`] → marker layer

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod config;
pub mod curve;
pub mod harmonic;
pub mod log_data;
pub mod markers;
pub mod renderer;

/// A geographic position in decimal degrees.
///
/// Latitude is expected in `[-90, 90]` and longitude in `[-180, 180]`.
/// The core never validates the range; callers check upstream.
///
/// # Example
/// ```
/// use fishing_tide_lib::Coordinates;
///
/// let osaka_bay = Coordinates::new(34.65, 135.2);
/// assert_eq!(osaka_bay.latitude, 34.65);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Direction of the water at a sampled instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideState {
    #[default]
    Rising,
    Falling,
    High,
    Low,
}

/// Kind of tide extremum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideEventKind {
    High,
    Low,
}

impl TideEventKind {
    /// Label used in chart legends and analysis messages.
    pub fn as_str(self) -> &'static str {
        match self {
            TideEventKind::High => "high",
            TideEventKind::Low => "low",
        }
    }
}

impl From<TideEventKind> for TideState {
    fn from(kind: TideEventKind) -> Self {
        match kind {
            TideEventKind::High => TideState::High,
            TideEventKind::Low => TideState::Low,
        }
    }
}

/// A discrete high or low water, supplied by a tide-info provider.
///
/// The synthesizer never produces these; it only draws the continuous curve
/// around them.
///
/// # Example
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use fishing_tide_lib::{TideEvent, TideEventKind};
///
/// let jst = FixedOffset::east_opt(9 * 3600).unwrap();
/// let high = TideEvent {
///     time: jst.with_ymd_and_hms(2024, 6, 15, 6, 12, 0).unwrap(),
///     kind: TideEventKind::High,
///     level: 182.0,
/// };
/// assert_eq!(high.kind.as_str(), "high");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideEvent {
    pub time: DateTime<FixedOffset>,
    #[serde(rename = "type")]
    pub kind: TideEventKind,
    /// Water level in centimeters
    pub level: f64,
}

/// One sampled point on a day's tide curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideSample {
    pub time: DateTime<FixedOffset>,
    /// Synthesized water level in centimeters
    pub level: f64,
    pub state: TideState,
    /// True when a tide event snapped onto this sample
    pub is_event: bool,
}

impl TideSample {
    /// Local wall-clock time as `"HH:mm"`, the label the chart plots.
    pub fn label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// Half-open window `[start, end)` covered by a curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateRange {
    pub fn contains(&self, time: &DateTime<FixedOffset>) -> bool {
        self.start <= *time && *time < self.end
    }
}

/// A full local day of tide samples plus the data overlaid on the chart.
///
/// `min_level`/`max_level` are always the extremes of `points`, so a chart
/// scaled to them fits the data exactly.
///
/// # Example
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use fishing_tide_lib::{curve::build_day_curve, Coordinates};
///
/// let jst = FixedOffset::east_opt(9 * 3600).unwrap();
/// let day = jst.with_ymd_and_hms(2024, 6, 15, 14, 0, 0).unwrap();
/// let curve = build_day_curve(day, Coordinates::new(35.0, 135.0), &[], &[]);
///
/// assert_eq!(curve.points.len(), 96);
/// assert_eq!(curve.points[0].label(), "00:00");
/// assert!(curve.min_level <= curve.max_level);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideCurve {
    /// Chronological samples covering `date_range`
    pub points: Vec<TideSample>,
    pub date_range: DateRange,
    pub min_level: f64,
    pub max_level: f64,
    pub events: Vec<TideEvent>,
    pub fishing_markers: Vec<DateTime<FixedOffset>>,
}

impl TideCurve {
    /// Vertical extent of the curve in centimeters.
    pub fn range(&self) -> f64 {
        self.max_level - self.min_level
    }

    /// Sample closest to `time`, or `None` for an empty curve.
    pub fn level_at(&self, time: &DateTime<FixedOffset>) -> Option<&TideSample> {
        self.points
            .iter()
            .min_by_key(|sample| (sample.time - *time).num_seconds().abs())
    }

    /// The supplied event closest to `sample`, for labelling event samples.
    pub fn nearest_event(&self, sample: &TideSample) -> Option<&TideEvent> {
        self.events
            .iter()
            .min_by_key(|event| (event.time - sample.time).num_milliseconds().abs())
    }

    /// Samples that a tide event snapped onto.
    pub fn event_samples(&self) -> impl Iterator<Item = &TideSample> {
        self.points.iter().filter(|sample| sample.is_event)
    }
}
