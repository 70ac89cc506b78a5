//! Degree normalization and sexagesimal angles.

use std::fmt;

/// Reduce an angle in degrees into `[0, 360)`.
///
/// `rem_euclid` can return exactly 360.0 for tiny negative inputs; that case
/// collapses to 0.0.
///
/// # Example
/// ```
/// use lunar_elongation::ephemeris::normalize_degrees;
/// assert_eq!(normalize_degrees(-10.0), 350.0);
/// assert_eq!(normalize_degrees(720.0), 0.0);
/// ```
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let reduced = degrees.rem_euclid(360.0);
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

/// A signed angle in sexagesimal form (degrees, arcminutes, arcseconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedDms {
    pub negative: bool,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl SignedDms {
    pub fn new(negative: bool, degrees: u32, minutes: u32, seconds: f64) -> Self {
        Self {
            negative,
            degrees,
            minutes,
            seconds,
        }
    }

    /// Split signed decimal degrees into sign, degrees, minutes and seconds.
    pub fn from_degrees(value: f64) -> Self {
        let negative = value < 0.0;
        let magnitude = value.abs();
        let degrees = magnitude.trunc();
        let minutes_total = (magnitude - degrees) * 60.0;
        let minutes = minutes_total.trunc();
        let seconds = (minutes_total - minutes) * 60.0;
        Self {
            negative,
            degrees: degrees as u32,
            minutes: minutes as u32,
            seconds,
        }
    }

    /// Signed decimal degrees: `sign · (d + (60·m + s) / 3600)`.
    pub fn to_degrees(&self) -> f64 {
        let sign = if self.negative { -1.0 } else { 1.0 };
        sign * (f64::from(self.degrees) + (self.seconds + 60.0 * f64::from(self.minutes)) / 3600.0)
    }
}

impl fmt::Display for SignedDms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        write!(
            f,
            "{}{}°{:02}'{:05.2}\"",
            sign, self.degrees, self.minutes, self.seconds
        )
    }
}
