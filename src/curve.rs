//! # Day Tide Curve Builder
//!
//! Turns the point-wise [`harmonic`](crate::harmonic) synthesizer into a chart-ready
//! [`TideCurve`] covering one local calendar day.
//!
//! ## Sampling
//! - **Window**: `[00:00, 24:00)` in the offset of the requested date
//! - **Interval**: 15 minutes by default, giving 96 samples
//! - **Order**: samples are produced strictly in chronological order
//!
//! ## Tide Events
//! High/low events come from an external provider. They are not fed into the
//! synthesizer; instead they annotate the samples:
//! - A sample is an event sample when an event lies within half a sampling
//!   interval of it. The snap distance is derived from the interval, so changing
//!   one changes the other.
//! - Every sample, event sample or not, is classified from the next upcoming
//!   event: rising toward a high, falling toward a low.
//!
//! ## Vertical Scale
//! `min_level` and `max_level` are the actual extremes of the generated samples.

use crate::harmonic::compute_tide_level;
use crate::{Coordinates, DateRange, TideCurve, TideEvent, TideEventKind, TideSample, TideState};
use chrono::{DateTime, Duration, FixedOffset, NaiveTime};
use log::debug;
use std::time::Instant;

/// Default spacing between samples.
pub const DEFAULT_SAMPLE_INTERVAL_MINUTES: u32 = 15;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Bookkeeping for one curve build, returned next to the curve.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CurveMetrics {
    /// Number of samples generated
    pub samples: usize,
    /// Samples flagged as event samples
    pub events_snapped: usize,
    /// Supplied events that fall outside the day window
    pub events_outside_window: usize,
    /// Wall-clock time spent building
    pub elapsed: std::time::Duration,
}

/// Configurable builder for day curves.
///
/// # Example
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use fishing_tide_lib::{curve::TideCurveBuilder, Coordinates, TideState};
///
/// let jst = FixedOffset::east_opt(9 * 3600).unwrap();
/// let day = jst.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
///
/// let builder = TideCurveBuilder::new()
///     .with_interval_minutes(30)
///     .with_fallback_state(TideState::Falling);
/// let (curve, metrics) = builder.build_with_metrics(day, Coordinates::new(35.0, 135.0), &[], &[]);
///
/// assert_eq!(curve.points.len(), 48);
/// assert_eq!(metrics.samples, 48);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TideCurveBuilder {
    interval_minutes: u32,
    fallback_state: TideState,
}

impl Default for TideCurveBuilder {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_SAMPLE_INTERVAL_MINUTES,
            fallback_state: TideState::default(),
        }
    }
}

impl TideCurveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sampling interval. Values below one minute are raised to one.
    pub fn with_interval_minutes(mut self, minutes: u32) -> Self {
        self.interval_minutes = minutes.max(1);
        self
    }

    /// State used for samples after the last known tide event.
    pub fn with_fallback_state(mut self, state: TideState) -> Self {
        self.fallback_state = state;
        self
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    /// Maximum distance at which an event snaps onto a sample: half the interval.
    pub fn snap_distance(&self) -> Duration {
        Duration::seconds(i64::from(self.interval_minutes) * 60 / 2)
    }

    /// Samples in one day at the configured interval.
    pub fn sample_count(&self) -> usize {
        MINUTES_PER_DAY.div_ceil(self.interval_minutes) as usize
    }

    /// Build the curve for the local day containing `date`.
    pub fn build(
        &self,
        date: DateTime<FixedOffset>,
        coordinates: Coordinates,
        events: &[TideEvent],
        fishing_markers: &[DateTime<FixedOffset>],
    ) -> TideCurve {
        self.build_with_metrics(date, coordinates, events, fishing_markers).0
    }

    /// Build the curve and report what happened while building it.
    pub fn build_with_metrics(
        &self,
        date: DateTime<FixedOffset>,
        coordinates: Coordinates,
        events: &[TideEvent],
        fishing_markers: &[DateTime<FixedOffset>],
    ) -> (TideCurve, CurveMetrics) {
        let started = Instant::now();

        let start = local_midnight(date);
        let date_range = DateRange {
            start,
            end: start + Duration::days(1),
        };

        let count = self.sample_count();
        let snap_ms = self.snap_distance().num_milliseconds();
        let mut points = Vec::with_capacity(count);
        let mut min_level = f64::INFINITY;
        let mut max_level = f64::NEG_INFINITY;

        for step in 0..count {
            let time = start + Duration::minutes(step as i64 * i64::from(self.interval_minutes));
            let level = compute_tide_level(&time, coordinates);

            let is_event = events
                .iter()
                .any(|event| (event.time - time).num_milliseconds().abs() <= snap_ms);
            let state = determine_tide_state(&time, events, Some(self.fallback_state));

            min_level = min_level.min(level);
            max_level = max_level.max(level);

            points.push(TideSample {
                time,
                level,
                state,
                is_event,
            });
        }

        let mut events = events.to_vec();
        events.sort_by_key(|event| event.time);
        let mut fishing_markers = fishing_markers.to_vec();
        fishing_markers.sort();

        let metrics = CurveMetrics {
            samples: points.len(),
            events_snapped: points.iter().filter(|sample| sample.is_event).count(),
            events_outside_window: events
                .iter()
                .filter(|event| !date_range.contains(&event.time))
                .count(),
            elapsed: started.elapsed(),
        };

        debug!(
            "Built tide curve for {} at ({:.4}, {:.4}): {} samples, {:.1}-{:.1} cm, {} event samples",
            start.format("%Y-%m-%d"),
            coordinates.latitude,
            coordinates.longitude,
            metrics.samples,
            min_level,
            max_level,
            metrics.events_snapped
        );

        let curve = TideCurve {
            points,
            date_range,
            min_level,
            max_level,
            events,
            fishing_markers,
        };

        (curve, metrics)
    }
}

/// Build the 15-minute curve for the local day containing `date`.
///
/// Samples after the last known event fall back to [`TideState::Rising`].
pub fn build_day_curve(
    date: DateTime<FixedOffset>,
    coordinates: Coordinates,
    events: &[TideEvent],
    fishing_markers: &[DateTime<FixedOffset>],
) -> TideCurve {
    TideCurveBuilder::new().build(date, coordinates, events, fishing_markers)
}

/// Midnight at the start of the local day containing `time`, same offset.
pub fn local_midnight(time: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    time - (time.time() - NaiveTime::MIN)
}

/// Earliest event strictly after `time`.
pub fn next_event_after<'a>(
    time: &DateTime<FixedOffset>,
    events: &'a [TideEvent],
) -> Option<&'a TideEvent> {
    events
        .iter()
        .filter(|event| event.time > *time)
        .min_by_key(|event| event.time)
}

/// Classify the water at `time` from the next upcoming event.
///
/// Rising when the next event is a high, falling when it is a low. With no
/// upcoming event the `current` hint is returned, or rising if there is none.
pub fn determine_tide_state(
    time: &DateTime<FixedOffset>,
    events: &[TideEvent],
    current: Option<TideState>,
) -> TideState {
    match next_event_after(time, events) {
        Some(event) => match event.kind {
            TideEventKind::High => TideState::Rising,
            TideEventKind::Low => TideState::Falling,
        },
        None => current.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<FixedOffset> {
        jst().with_ymd_and_hms(2024, 6, 15, hour, minute, second).unwrap()
    }

    fn event(time: DateTime<FixedOffset>, kind: TideEventKind) -> TideEvent {
        TideEvent {
            time,
            kind,
            level: 150.0,
        }
    }

    fn baseline() -> Coordinates {
        Coordinates::new(35.0, 135.0)
    }

    #[test]
    fn test_default_day_has_96_quarter_hour_samples() {
        let curve = build_day_curve(at(13, 27, 5), baseline(), &[], &[]);

        assert_eq!(curve.points.len(), 96);
        assert_eq!(curve.points[0].label(), "00:00");
        assert_eq!(curve.points[95].label(), "23:45");
        for pair in curve.points.windows(2) {
            assert_eq!(pair[1].time - pair[0].time, Duration::minutes(15));
        }
    }

    #[test]
    fn test_window_is_truncated_to_local_midnight() {
        let curve = build_day_curve(at(23, 59, 59), baseline(), &[], &[]);
        assert_eq!(curve.date_range.start, at(0, 0, 0));
        assert_eq!(curve.date_range.end, at(0, 0, 0) + Duration::days(1));
        assert_eq!(curve.date_range.start.offset(), &jst());
    }

    #[test]
    fn test_local_midnight_respects_offset() {
        // 2024-06-15T02:00+09:00 is still June 14 in UTC
        let utc = FixedOffset::east_opt(0).unwrap();
        let early = at(2, 0, 0);
        assert_eq!(local_midnight(early), at(0, 0, 0));
        assert_eq!(
            local_midnight(early.with_timezone(&utc)),
            utc.with_ymd_and_hms(2024, 6, 14, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_min_max_match_points() {
        let curve = build_day_curve(at(0, 0, 0), Coordinates::new(43.0, 141.3), &[], &[]);
        let min = curve
            .points
            .iter()
            .map(|p| p.level)
            .fold(f64::INFINITY, f64::min);
        let max = curve
            .points
            .iter()
            .map(|p| p.level)
            .fold(f64::NEG_INFINITY, f64::max);

        assert_eq!(curve.min_level, min);
        assert_eq!(curve.max_level, max);
        assert!(curve.range() > 0.0);
    }

    #[test]
    fn test_state_follows_next_event() {
        let events = vec![
            event(at(6, 0, 0), TideEventKind::High),
            event(at(12, 0, 0), TideEventKind::Low),
        ];
        let curve = build_day_curve(at(0, 0, 0), baseline(), &events, &[]);

        let state_at = |label: &str| {
            curve
                .points
                .iter()
                .find(|p| p.label() == label)
                .map(|p| p.state)
                .unwrap()
        };

        assert_eq!(state_at("03:00"), TideState::Rising);
        // An event sample still points at the following event
        assert_eq!(state_at("06:00"), TideState::Falling);
        assert_eq!(state_at("09:00"), TideState::Falling);
        assert_eq!(state_at("12:00"), TideState::Rising);
        // No more events: fallback hint
        assert_eq!(state_at("18:00"), TideState::Rising);
    }

    #[test]
    fn test_event_samples_agree_with_determine_tide_state() {
        let events = vec![
            event(at(6, 0, 0), TideEventKind::High),
            event(at(12, 0, 0), TideEventKind::Low),
        ];
        let curve = build_day_curve(at(0, 0, 0), baseline(), &events, &[]);

        assert_eq!(curve.event_samples().count(), 2);
        for sample in &curve.points {
            assert_eq!(
                sample.state,
                determine_tide_state(&sample.time, &events, None),
                "State mismatch at {}",
                sample.label()
            );
        }
    }

    #[test]
    fn test_fallback_state_is_configurable() {
        let curve = TideCurveBuilder::new()
            .with_fallback_state(TideState::Falling)
            .build(at(0, 0, 0), baseline(), &[], &[]);
        assert!(curve.points.iter().all(|p| p.state == TideState::Falling));
    }

    #[test]
    fn test_determine_tide_state_without_hint() {
        assert_eq!(determine_tide_state(&at(1, 0, 0), &[], None), TideState::Rising);

        // Event exactly at the sample time is not "upcoming"
        let events = vec![event(at(1, 0, 0), TideEventKind::Low)];
        assert_eq!(
            determine_tide_state(&at(1, 0, 0), &events, Some(TideState::High)),
            TideState::High
        );
    }

    #[test]
    fn test_next_event_picks_nearest_regardless_of_order() {
        let events = vec![
            event(at(18, 0, 0), TideEventKind::Low),
            event(at(9, 0, 0), TideEventKind::High),
            event(at(3, 0, 0), TideEventKind::Low),
        ];
        let next = next_event_after(&at(4, 0, 0), &events).unwrap();
        assert_eq!(next.time, at(9, 0, 0));
        assert!(next_event_after(&at(18, 0, 0), &events).is_none());
    }

    #[test]
    fn test_event_snaps_within_half_interval() {
        let builder = TideCurveBuilder::new();
        assert_eq!(builder.snap_distance(), Duration::seconds(450));

        // 7m30s after 06:00: equidistant from 06:00 and 06:15, snaps to both
        let events = vec![event(at(6, 7, 30), TideEventKind::High)];
        let curve = builder.build(at(0, 0, 0), baseline(), &events, &[]);
        let labels: Vec<String> = curve.event_samples().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["06:00", "06:15"]);

        // One second further only reaches 06:15
        let events = vec![event(at(6, 7, 31), TideEventKind::High)];
        let curve = builder.build(at(0, 0, 0), baseline(), &events, &[]);
        let labels: Vec<String> = curve.event_samples().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["06:15"]);
    }

    #[test]
    fn test_custom_interval_scales_snap_distance() {
        let builder = TideCurveBuilder::new().with_interval_minutes(30);
        assert_eq!(builder.sample_count(), 48);
        assert_eq!(builder.snap_distance(), Duration::minutes(15));

        let events = vec![event(at(6, 15, 0), TideEventKind::Low)];
        let curve = builder.build(at(0, 0, 0), baseline(), &events, &[]);
        let snapped: Vec<String> = curve.event_samples().map(|p| p.label()).collect();
        assert_eq!(snapped, vec!["06:00", "06:30"]);

        let zero = TideCurveBuilder::new().with_interval_minutes(0);
        assert_eq!(zero.interval_minutes(), 1);
        assert_eq!(zero.sample_count(), 1440);
    }

    #[test]
    fn test_metrics_report_build() {
        let events = vec![
            event(at(6, 0, 0), TideEventKind::High),
            event(at(6, 0, 0) - Duration::days(1), TideEventKind::Low),
        ];
        let (curve, metrics) =
            TideCurveBuilder::new().build_with_metrics(at(0, 0, 0), baseline(), &events, &[]);

        assert_eq!(metrics.samples, 96);
        assert_eq!(metrics.events_snapped, 1);
        assert_eq!(metrics.events_outside_window, 1);
        // Events come back in chronological order
        assert!(curve.events[0].time < curve.events[1].time);
    }

    #[test]
    fn test_markers_and_levels_carried_through() {
        let markers = vec![at(14, 0, 0), at(9, 30, 0)];
        let curve = build_day_curve(at(0, 0, 0), baseline(), &[], &markers);
        assert_eq!(curve.fishing_markers, vec![at(9, 30, 0), at(14, 0, 0)]);

        let sample = curve.level_at(&at(9, 37, 0)).unwrap();
        assert_eq!(sample.label(), "09:30");
        assert_eq!(sample.level, compute_tide_level(&at(9, 30, 0), baseline()));
    }

    #[test]
    fn test_build_is_idempotent() {
        let events = vec![event(at(6, 0, 0), TideEventKind::High)];
        let first = build_day_curve(at(8, 0, 0), baseline(), &events, &[]);
        let second = build_day_curve(at(8, 0, 0), baseline(), &events, &[]);
        assert_eq!(first, second);
    }
}
