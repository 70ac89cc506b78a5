//! Analytic solar and lunar longitudes.
//!
//! Implements the low-accuracy solar theory (Meeus, *Astronomical Algorithms*,
//! ch. 25), the truncated ELP-2000/82 lunar series (ch. 47) and the short
//! nutation-in-longitude expression (ch. 22). Apparent longitudes are referred
//! to the true equinox of date; accuracy is about 0.01° for the Sun and a few
//! arcseconds for the Moon over several millennia around J2000.
//!
//! Nutation affects both bodies equally, so it cancels in the elongation; it
//! is kept so that each longitude is meaningful on its own.

use log::debug;

use super::angle::normalize_degrees;
use super::{EphemerisError, EphemerisOracle, EphemerisResult, LongitudeSeries};
use crate::time::{julian_centuries_tt, unix_to_jd_tt};

/// Supported range in Julian centuries from J2000 (years -1000 to 5000).
const MAX_ABS_CENTURIES: f64 = 30.0;

/// Constant of aberration in degrees (20.4898 arcseconds).
const ABERRATION_DEG: f64 = 20.4898 / 3600.0;

/// Periodic terms for the Moon's longitude, Meeus table 47.A.
///
/// Columns: multiples of D, M, M', F and the sine coefficient in 1e-6 degrees.
#[rustfmt::skip]
const MOON_LONGITUDE_TERMS: [(i8, i8, i8, i8, i32); 59] = [
    (0, 0, 1, 0, 6_288_774), (2, 0, -1, 0, 1_274_027), (2, 0, 0, 0, 658_314),
    (0, 0, 2, 0, 213_618),   (0, 1, 0, 0, -185_116),   (0, 0, 0, 2, -114_332),
    (2, 0, -2, 0, 58_793),   (2, -1, -1, 0, 57_066),   (2, 0, 1, 0, 53_322),
    (2, -1, 0, 0, 45_758),   (0, 1, -1, 0, -40_923),   (1, 0, 0, 0, -34_720),
    (0, 1, 1, 0, -30_383),   (2, 0, 0, -2, 15_327),    (0, 0, 1, 2, -12_528),
    (0, 0, 1, -2, 10_980),   (4, 0, -1, 0, 10_675),    (0, 0, 3, 0, 10_034),
    (4, 0, -2, 0, 8_548),    (2, 1, -1, 0, -7_888),    (2, 1, 0, 0, -6_766),
    (1, 0, -1, 0, -5_163),   (1, 1, 0, 0, 4_987),      (2, -1, 1, 0, 4_036),
    (2, 0, 2, 0, 3_994),     (4, 0, 0, 0, 3_861),      (2, 0, -3, 0, 3_665),
    (0, 1, -2, 0, -2_689),   (2, 0, -1, 2, -2_602),    (2, -1, -2, 0, 2_390),
    (1, 0, 1, 0, -2_348),    (2, -2, 0, 0, 2_236),     (0, 1, 2, 0, -2_120),
    (0, 2, 0, 0, -2_069),    (2, -2, -1, 0, 2_048),    (2, 0, 1, -2, -1_773),
    (2, 0, 0, 2, -1_595),    (4, -1, -1, 0, 1_215),    (0, 0, 2, 2, -1_110),
    (3, 0, -1, 0, -892),     (2, 1, 1, 0, -810),       (4, -1, -2, 0, 759),
    (0, 2, -1, 0, -713),     (2, 2, -1, 0, -700),      (2, 1, -2, 0, 691),
    (2, -1, 0, -2, 596),     (4, 0, 1, 0, 549),        (0, 0, 4, 0, 537),
    (4, -1, 0, 0, 520),      (1, 0, -2, 0, -487),      (2, 1, 0, -2, -399),
    (0, 0, 2, -2, -381),     (1, 1, 1, 0, 351),        (3, 0, -2, 0, -340),
    (4, 0, -3, 0, 330),      (2, -1, 2, 0, 327),       (0, 2, 1, 0, -323),
    (1, 1, -1, 0, 299),      (2, 0, 3, 0, 294),
];

#[inline]
fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

#[inline]
fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

/// Longitude of the Moon's mean ascending node, degrees.
fn lunar_node_longitude(t: f64) -> f64 {
    125.04452 - 1934.136261 * t + 0.0020708 * t * t + t.powi(3) / 450_000.0
}

/// Nutation in longitude Δψ in degrees (accuracy ~0.5").
pub fn nutation_in_longitude(t: f64) -> f64 {
    let omega = lunar_node_longitude(t);
    let sun_mean = 280.4665 + 36_000.7698 * t;
    let moon_mean = 218.3165 + 481_267.8813 * t;
    let arcseconds = -17.20 * sin_deg(omega) - 1.32 * sin_deg(2.0 * sun_mean)
        - 0.23 * sin_deg(2.0 * moon_mean)
        + 0.21 * sin_deg(2.0 * omega);
    arcseconds / 3600.0
}

/// Geometric longitude of the Sun referred to the mean equinox of date, and
/// the Earth–Sun distance in AU.
fn sun_true_longitude_and_distance(t: f64) -> (f64, f64) {
    let mean_longitude = 280.46646 + 36_000.76983 * t + 0.0003032 * t * t;
    let mean_anomaly = 357.52911 + 35_999.05029 * t - 0.0001537 * t * t;
    let eccentricity = 0.016708634 - 0.000042037 * t - 0.0000001267 * t * t;

    let center = (1.914602 - 0.004817 * t - 0.000014 * t * t) * sin_deg(mean_anomaly)
        + (0.019993 - 0.000101 * t) * sin_deg(2.0 * mean_anomaly)
        + 0.000289 * sin_deg(3.0 * mean_anomaly);

    let true_anomaly = mean_anomaly + center;
    let distance = 1.000001018 * (1.0 - eccentricity * eccentricity)
        / (1.0 + eccentricity * cos_deg(true_anomaly));

    (normalize_degrees(mean_longitude + center), distance)
}

/// True geometric longitude of the Sun (mean equinox of date), degrees.
///
/// # Arguments
/// * `t` - Julian centuries of TT since J2000.0
pub fn sun_true_longitude(t: f64) -> f64 {
    sun_true_longitude_and_distance(t).0
}

/// Apparent longitude of the Sun (true equinox of date, aberration applied).
pub fn sun_apparent_longitude(t: f64) -> f64 {
    let (longitude, distance) = sun_true_longitude_and_distance(t);
    normalize_degrees(longitude + nutation_in_longitude(t) - ABERRATION_DEG / distance)
}

/// Geocentric longitude of the Moon referred to the mean equinox of date.
///
/// # Arguments
/// * `t` - Julian centuries of TT since J2000.0
pub fn moon_geometric_longitude(t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let mean_longitude = 218.3164477 + 481_267.88123421 * t - 0.0015786 * t2 + t3 / 538_841.0
        - t4 / 65_194_000.0;
    let elongation = 297.8501921 + 445_267.1114034 * t - 0.0018819 * t2 + t3 / 545_868.0
        - t4 / 113_065_000.0;
    let sun_anomaly = 357.5291092 + 35_999.0502909 * t - 0.0001536 * t2 + t3 / 24_490_000.0;
    let moon_anomaly = 134.9633964 + 477_198.8675055 * t + 0.0087414 * t2 + t3 / 69_699.0
        - t4 / 14_712_000.0;
    let latitude_argument = 93.2720950 + 483_202.0175233 * t - 0.0036539 * t2
        - t3 / 3_526_000.0
        + t4 / 863_310_000.0;

    let a1 = 119.75 + 131.849 * t;
    let a2 = 53.09 + 479_264.290 * t;

    // Terms involving the Sun's anomaly shrink with the Earth's eccentricity.
    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;

    let mut sum: f64 = MOON_LONGITUDE_TERMS
        .iter()
        .map(|&(d, m, mp, f, coefficient)| {
            let argument = f64::from(d) * elongation
                + f64::from(m) * sun_anomaly
                + f64::from(mp) * moon_anomaly
                + f64::from(f) * latitude_argument;
            let scale = match m.abs() {
                0 => 1.0,
                1 => e,
                _ => e * e,
            };
            f64::from(coefficient) * scale * sin_deg(argument)
        })
        .sum();

    sum += 3958.0 * sin_deg(a1)
        + 1962.0 * sin_deg(mean_longitude - latitude_argument)
        + 318.0 * sin_deg(a2);

    normalize_degrees(mean_longitude + sum / 1_000_000.0)
}

/// Apparent longitude of the Moon (true equinox of date).
pub fn moon_apparent_longitude(t: f64) -> f64 {
    normalize_degrees(moon_geometric_longitude(t) + nutation_in_longitude(t))
}

/// Analytic ephemeris oracle.
///
/// Converts each Unix timestamp to TT (applying ΔT) and evaluates the series
/// directly. Instants outside years -1000..5000 are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }

    fn centuries_for(unix_seconds: f64) -> EphemerisResult<f64> {
        if !unix_seconds.is_finite() {
            return Err(EphemerisError::InvalidTime(format!(
                "non-finite timestamp {}",
                unix_seconds
            )));
        }
        let t = julian_centuries_tt(unix_to_jd_tt(unix_seconds));
        if t.abs() > MAX_ABS_CENTURIES {
            return Err(EphemerisError::OutOfRange(format!(
                "timestamp {} is {:.1} centuries from J2000",
                unix_seconds, t
            )));
        }
        Ok(t)
    }
}

impl EphemerisOracle for AnalyticEphemeris {
    fn ecliptic_longitudes(&self, unix_seconds: &[f64]) -> EphemerisResult<LongitudeSeries> {
        debug!(
            "Evaluating analytic ephemeris for {} instants",
            unix_seconds.len()
        );

        let mut series = LongitudeSeries::with_capacity(unix_seconds.len());
        for &instant in unix_seconds {
            let t = Self::centuries_for(instant)?;
            series.sun.push(sun_apparent_longitude(t));
            series.moon.push(moon_apparent_longitude(t));
        }
        Ok(series)
    }
}
