//! Unix time, Julian Dates and Julian centuries.

use chrono::{DateTime, Utc};

use super::delta_t::delta_t_seconds;

/// Julian Date of the Unix epoch (1970-01-01 00:00:00 UTC)
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Date of J2000.0 (2000-01-01 12:00:00 TT)
pub const J2000_JD: f64 = 2_451_545.0;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Convert a Unix timestamp (seconds, may be fractional or negative) to a
/// Julian Date on the UT axis.
///
/// # Example
/// ```
/// use lunar_elongation::time::unix_to_jd_ut;
/// assert_eq!(unix_to_jd_ut(0.0), 2_440_587.5);
/// ```
#[inline]
pub fn unix_to_jd_ut(unix_seconds: f64) -> f64 {
    UNIX_EPOCH_JD + unix_seconds / SECONDS_PER_DAY
}

/// Convert a Unix timestamp to a Julian Date in Terrestrial Time (TT = UT + ΔT).
#[inline]
pub fn unix_to_jd_tt(unix_seconds: f64) -> f64 {
    let jd_ut = unix_to_jd_ut(unix_seconds);
    jd_ut + delta_t_seconds(jd_ut) / SECONDS_PER_DAY
}

/// Julian centuries of TT elapsed since J2000.0.
#[inline]
pub fn julian_centuries_tt(jd_tt: f64) -> f64 {
    (jd_tt - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}

/// Unix seconds of a UTC datetime, keeping sub-second precision.
pub fn datetime_to_unix(datetime: &DateTime<Utc>) -> f64 {
    datetime.timestamp() as f64 + f64::from(datetime.timestamp_subsec_nanos()) * 1e-9
}
