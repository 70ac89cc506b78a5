//! ΔT = TT − UT.
//!
//! Piecewise polynomials of Espenak & Meeus (2006). Before 1900 and after 2150
//! the long-term parabola `−20 + 32·u²` (u in centuries since 1820) is used.

use super::julian::J2000_JD;

const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Decimal year of a Julian Date, close enough for ΔT purposes.
#[inline]
fn decimal_year(jd_ut: f64) -> f64 {
    2000.0 + (jd_ut - J2000_JD) / DAYS_PER_JULIAN_YEAR
}

#[inline]
fn long_term(year: f64) -> f64 {
    let u = (year - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

fn early_twentieth_century(year: f64) -> f64 {
    let t = year - 1900.0;
    -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3) - 0.000197 * t.powi(4)
}

fn interwar(year: f64) -> f64 {
    let t = year - 1920.0;
    21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
}

fn mid_century(year: f64) -> f64 {
    let t = year - 1950.0;
    29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
}

fn late_century(year: f64) -> f64 {
    let t = year - 1975.0;
    45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
}

fn millennium(year: f64) -> f64 {
    let t = year - 2000.0;
    63.86 + 0.3345 * t - 0.060374 * t.powi(2)
        + 0.0017275 * t.powi(3)
        + 0.000651814 * t.powi(4)
        + 0.00002373599 * t.powi(5)
}

fn near_future(year: f64) -> f64 {
    let t = year - 2000.0;
    62.92 + 0.32217 * t + 0.005589 * t.powi(2)
}

fn far_future(year: f64) -> f64 {
    long_term(year) - 0.5628 * (2150.0 - year)
}

/// Returns ΔT in seconds for a Julian Date on the UT axis.
pub fn delta_t_seconds(jd_ut: f64) -> f64 {
    match decimal_year(jd_ut) {
        y if y < 1900.0 => long_term(y),
        y if y < 1920.0 => early_twentieth_century(y),
        y if y < 1941.0 => interwar(y),
        y if y < 1961.0 => mid_century(y),
        y if y < 1986.0 => late_century(y),
        y if y < 2005.0 => millennium(y),
        y if y < 2050.0 => near_future(y),
        y if y < 2150.0 => far_future(y),
        y => long_term(y),
    }
}
