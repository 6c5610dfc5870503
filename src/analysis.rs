//! # Catch Timing Analysis
//!
//! Rates a catch by how close it came to the next tide extremum, and suggests
//! when to be on the water for the next one. Fish tend to feed around turning
//! tides, so a catch within an hour of a high or low counts as well timed.

use crate::curve::next_event_after;
use crate::{TideEvent, TideEventKind};
use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

/// A catch this close to an extremum (minutes, inclusive) is well timed.
pub const OPTIMAL_WINDOW_MINUTES: i64 = 60;

/// How long before an extremum the suggested window opens.
pub const OPTIMAL_LEAD_MINUTES: i64 = 30;

/// Which extremum the water was heading toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TidePhase {
    BeforeHigh,
    BeforeLow,
}

impl From<TideEventKind> for TidePhase {
    fn from(kind: TideEventKind) -> Self {
        match kind {
            TideEventKind::High => TidePhase::BeforeHigh,
            TideEventKind::Low => TidePhase::BeforeLow,
        }
    }
}

/// Suggested start of the next fishing window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimalWindow {
    pub time: DateTime<FixedOffset>,
    /// The extremum this window leads into
    pub precedes: TideEventKind,
}

/// Result of [`analyze_relation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideRelation {
    /// Absolute minutes between the catch and the next event
    pub time_to_next_tide_minutes: Option<i64>,
    pub optimal_timing: bool,
    pub tide_phase: Option<TidePhase>,
    pub next_optimal: Option<OptimalWindow>,
    pub message: String,
}

impl TideRelation {
    fn no_data() -> Self {
        Self {
            time_to_next_tide_minutes: None,
            optimal_timing: false,
            tide_phase: None,
            next_optimal: None,
            message: "No upcoming tide event data".to_string(),
        }
    }
}

/// Relate a catch to `next_event` and propose the next window from `all_events`.
///
/// The proposal is relative to `now`, not to the catch: it is the first event
/// strictly after `now`, minus [`OPTIMAL_LEAD_MINUTES`]. Without a `next_event`
/// the result is a no-data analysis rather than an error.
pub fn analyze_relation(
    catch_time: &DateTime<FixedOffset>,
    next_event: Option<&TideEvent>,
    all_events: &[TideEvent],
    now: &DateTime<FixedOffset>,
) -> TideRelation {
    let Some(next_event) = next_event else {
        return TideRelation::no_data();
    };

    let minutes = (next_event.time - *catch_time).num_minutes().abs();
    let optimal_timing = minutes <= OPTIMAL_WINDOW_MINUTES;
    let kind = next_event.kind.as_str();

    let message = if optimal_timing {
        format!("Caught {minutes} min from the {kind} tide, inside the one-hour window")
    } else {
        format!("Caught {minutes} min from the next {kind} tide")
    };

    let next_optimal = next_event_after(now, all_events).map(|event| OptimalWindow {
        time: event.time - Duration::minutes(OPTIMAL_LEAD_MINUTES),
        precedes: event.kind,
    });

    TideRelation {
        time_to_next_tide_minutes: Some(minutes),
        optimal_timing,
        tide_phase: Some(next_event.kind.into()),
        next_optimal,
        message,
    }
}

/// [`analyze_relation`] against the first event after the catch itself.
pub fn analyze_catch(
    catch_time: &DateTime<FixedOffset>,
    events: &[TideEvent],
    now: &DateTime<FixedOffset>,
) -> TideRelation {
    analyze_relation(catch_time, next_event_after(catch_time, events), events, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 15, hour, minute, 0)
            .unwrap()
    }

    fn events() -> Vec<TideEvent> {
        vec![
            TideEvent {
                time: at(5, 40),
                kind: TideEventKind::High,
                level: 171.0,
            },
            TideEvent {
                time: at(11, 55),
                kind: TideEventKind::Low,
                level: 32.0,
            },
            TideEvent {
                time: at(18, 10),
                kind: TideEventKind::High,
                level: 165.0,
            },
        ]
    }

    #[test]
    fn test_catch_within_hour_is_optimal() {
        let events = events();
        let relation = analyze_relation(&at(5, 0), Some(&events[0]), &events, &at(4, 0));

        assert_eq!(relation.time_to_next_tide_minutes, Some(40));
        assert!(relation.optimal_timing);
        assert_eq!(relation.tide_phase, Some(TidePhase::BeforeHigh));
        assert!(relation.message.contains("high"));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let events = events();
        let exactly = analyze_relation(&at(10, 55), Some(&events[1]), &events, &at(10, 0));
        assert_eq!(exactly.time_to_next_tide_minutes, Some(60));
        assert!(exactly.optimal_timing);

        let past = analyze_relation(&at(10, 54), Some(&events[1]), &events, &at(10, 0));
        assert_eq!(past.time_to_next_tide_minutes, Some(61));
        assert!(!past.optimal_timing);
        assert_eq!(past.tide_phase, Some(TidePhase::BeforeLow));
    }

    #[test]
    fn test_next_optimal_is_relative_to_now() {
        let events = events();
        // Catch was early in the day but "now" is mid-afternoon
        let relation = analyze_relation(&at(5, 0), Some(&events[0]), &events, &at(15, 0));
        let window = relation.next_optimal.unwrap();
        assert_eq!(window.time, at(17, 40));
        assert_eq!(window.precedes, TideEventKind::High);
    }

    #[test]
    fn test_no_future_event_leaves_no_suggestion() {
        let events = events();
        let relation = analyze_relation(&at(17, 0), Some(&events[2]), &events, &at(20, 0));
        assert!(relation.next_optimal.is_none());
        assert_eq!(relation.time_to_next_tide_minutes, Some(70));
    }

    #[test]
    fn test_missing_event_is_degenerate() {
        let relation = analyze_relation(&at(9, 0), None, &events(), &at(8, 0));
        assert!(!relation.optimal_timing);
        assert_eq!(relation.time_to_next_tide_minutes, None);
        assert_eq!(relation.tide_phase, None);
        assert_eq!(relation.message, "No upcoming tide event data");
    }

    #[test]
    fn test_analyze_catch_finds_next_event() {
        let relation = analyze_catch(&at(11, 30), &events(), &at(11, 30));
        assert_eq!(relation.time_to_next_tide_minutes, Some(25));
        assert_eq!(relation.tide_phase, Some(TidePhase::BeforeLow));
        assert_eq!(relation.next_optimal.unwrap().time, at(11, 25));

        let late = analyze_catch(&at(19, 0), &events(), &at(19, 0));
        assert_eq!(late.time_to_next_tide_minutes, None);
    }
}
