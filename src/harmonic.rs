//! # Harmonic Tide Synthesizer
//!
//! Produces a stylized water level (centimeters) for any instant and location by
//! superposing four tidal constituents. It is not a prediction model: there is no
//! station data or bathymetry behind it, only a smooth, periodic curve with the
//! diurnal/semidiurnal beat patterns a fishing chart needs.
//!
//! ## Model
//!
//! ```text
//! level = 100 + 30 * Σ Aᵢ cos((ωᵢ t + φᵢ) · π/180)
//! ```
//!
//! where `t` is hours since 2000-01-01T12:00:00Z and, for each constituent:
//!
//! | Constituent | ω (°/h)   | A                         | φ (°)                       |
//! |-------------|-----------|---------------------------|-----------------------------|
//! | M2          | 28.984104 | 1.0  · lat · m2 seasonal  | lon · 15                    |
//! | S2          | 30.0      | 0.5  · lon · s2 seasonal  | lat · 20                    |
//! | K1          | 15.041069 | 0.3  · lat · k1 seasonal  | lat · 80 + lon · 25         |
//! | O1          | 13.943035 | 0.25 · lon · o1 seasonal  | lon · 120 + lat · 35        |
//!
//! `lat`/`lon` are coordinate variation factors measured from a 35°N 135°E
//! baseline. The seasonal multipliers swing with the day of year and grow with
//! distance from the equator.
//!
//! ### Output Range
//! Near the baseline the level stays inside roughly 0-200 cm. Nothing is clamped:
//! coordinates far from the baseline can push it outside that band.

use chrono::{DateTime, Datelike, TimeZone};

/// Milliseconds from the Unix epoch to 2000-01-01T12:00:00Z.
const REFERENCE_EPOCH_MS: i64 = 946_728_000_000;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Mean water level in centimeters.
pub const MEAN_LEVEL_CM: f64 = 100.0;

/// Centimeters per unit of summed constituent amplitude.
pub const LEVEL_SCALE_CM: f64 = 30.0;

const BASELINE_LATITUDE: f64 = 35.0;
const BASELINE_LONGITUDE: f64 = 135.0;

/// Day of year used as the zero of the seasonal cycle (spring equinox).
const EQUINOX_DAY: f64 = 80.0;

/// One evaluated constituent: amplitude and phase already adjusted for the
/// location and season of a particular instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstituentTerm {
    pub name: &'static str,
    /// Angular speed in degrees per hour
    pub speed_deg_per_hour: f64,
    pub amplitude: f64,
    /// Phase in degrees
    pub phase_deg: f64,
}

impl ConstituentTerm {
    /// Contribution of this constituent `hours` after the reference epoch.
    pub fn evaluate(&self, hours: f64) -> f64 {
        let angle = (self.speed_deg_per_hour * hours + self.phase_deg).to_radians();
        self.amplitude * angle.cos()
    }
}

/// Hours elapsed between 2000-01-01T12:00:00Z and `time` (negative before it).
pub fn hours_from_epoch<Tz: TimeZone>(time: &DateTime<Tz>) -> f64 {
    (time.timestamp_millis() - REFERENCE_EPOCH_MS) as f64 / MS_PER_HOUR
}

/// Evaluate the four constituents for `time` at the given location.
///
/// The day of year is taken from the instant's own calendar date, so callers
/// control which local day a timestamp belongs to through its offset.
pub fn constituent_terms<Tz: TimeZone>(
    time: &DateTime<Tz>,
    coordinates: crate::Coordinates,
) -> [ConstituentTerm; 4] {
    let latitude_factor = 1.0 + (coordinates.latitude - BASELINE_LATITUDE) * 0.1;
    let longitude_factor = 1.0 + (coordinates.longitude - BASELINE_LONGITUDE) * 0.05;

    let day_of_year = time.ordinal() as f64;
    let seasonal_angle = (day_of_year - EQUINOX_DAY) / 365.0 * 360.0;
    let latitude_effect = coordinates.latitude.abs() / 90.0;

    let m2_seasonal = 1.0 + seasonal_angle.to_radians().cos() * 0.4 * latitude_effect;
    let s2_seasonal = 1.0 + (seasonal_angle + 45.0).to_radians().cos() * 0.5 * latitude_effect;
    let k1_seasonal = 1.0 + seasonal_angle.to_radians().sin() * 0.6 * latitude_effect;
    let o1_seasonal = 1.0 + (seasonal_angle + 90.0).to_radians().sin() * 0.45 * latitude_effect;

    [
        ConstituentTerm {
            name: "M2",
            speed_deg_per_hour: 28.984104,
            amplitude: latitude_factor * m2_seasonal,
            phase_deg: longitude_factor * 15.0,
        },
        ConstituentTerm {
            name: "S2",
            speed_deg_per_hour: 30.0,
            amplitude: 0.5 * longitude_factor * s2_seasonal,
            phase_deg: latitude_factor * 20.0,
        },
        ConstituentTerm {
            name: "K1",
            speed_deg_per_hour: 15.041069,
            amplitude: 0.3 * latitude_factor * k1_seasonal,
            phase_deg: latitude_factor * 80.0 + longitude_factor * 25.0,
        },
        ConstituentTerm {
            name: "O1",
            speed_deg_per_hour: 13.943035,
            amplitude: 0.25 * longitude_factor * o1_seasonal,
            phase_deg: longitude_factor * 120.0 + latitude_factor * 35.0,
        },
    ]
}

/// Synthesized tide level in centimeters for `time` at `coordinates`.
///
/// Total and deterministic: finite inputs always give a finite value, and the
/// same inputs always give the same value.
///
/// # Example
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use fishing_tide_lib::{harmonic::compute_tide_level, Coordinates};
///
/// let jst = FixedOffset::east_opt(9 * 3600).unwrap();
/// let noon = jst.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
/// let level = compute_tide_level(&noon, Coordinates::new(35.0, 135.0));
/// assert!((0.0..=200.0).contains(&level));
/// ```
pub fn compute_tide_level<Tz: TimeZone>(
    time: &DateTime<Tz>,
    coordinates: crate::Coordinates,
) -> f64 {
    let hours = hours_from_epoch(time);
    let sum: f64 = constituent_terms(time, coordinates)
        .iter()
        .map(|term| term.evaluate(hours))
        .sum();

    MEAN_LEVEL_CM + sum * LEVEL_SCALE_CM
}
