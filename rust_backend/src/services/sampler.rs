//! Elongation sampling.
//!
//! The sampler turns a start time, a duration in years and a resolution in
//! minutes into a window of evenly spaced Unix instants covering a whole
//! number of synodic months, asks the ephemeris oracle for the Sun and Moon
//! longitudes at all of them in one call, and reduces each Moon − Sun
//! difference into `[0, 360)`.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::ephemeris::{normalize_degrees, EphemerisError, EphemerisOracle, LongitudeSeries};
use crate::error::{AnalysisError, AnalysisResult};
use crate::services::statistics::{compute_stats, ElongationStats};
use crate::time::{datetime_to_unix, SECONDS_PER_DAY};

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530588;

/// Julian year in days.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Calendar constants used to size a sampling window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub synodic_month_days: f64,
    pub days_per_year: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            synodic_month_days: SYNODIC_MONTH_DAYS,
            days_per_year: DAYS_PER_YEAR,
        }
    }
}

/// Evenly spaced instants covering a whole number of synodic months.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingWindow {
    /// First instant (inclusive), Unix seconds
    pub start_unix: f64,
    /// End of the window (exclusive), Unix seconds truncated toward zero
    pub end_unix: f64,
    pub step_seconds: f64,
    pub synodic_months: u64,
}

impl SamplingWindow {
    /// Number of instants in the window.
    pub fn len(&self) -> usize {
        if self.end_unix <= self.start_unix {
            return 0;
        }
        ((self.end_unix - self.start_unix) / self.step_seconds).ceil() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `start + k·step` for `k` in `0..len()`.
    pub fn instants(&self) -> Vec<f64> {
        (0..self.len())
            .map(|k| self.start_unix + k as f64 * self.step_seconds)
            .collect()
    }
}

/// Fold an elongation in `[0, 360)` onto `[0, 180]`.
///
/// 350° and 10° describe the same Moon–Sun separation.
#[inline]
pub fn fold_elongation(elongation: f64) -> f64 {
    elongation.min(360.0 - elongation)
}

/// Signed Moon − Sun differences reduced into `[0, 360)`.
///
/// # Returns
/// * `Ok(Vec<f64>)` with one elongation per longitude pair
/// * `Err(AnalysisError::Ephemeris)` if the two series differ in length
pub fn elongations_from_longitudes(series: &LongitudeSeries) -> AnalysisResult<Vec<f64>> {
    if series.sun.len() != series.moon.len() {
        return Err(EphemerisError::CalculationError(format!(
            "oracle returned {} solar and {} lunar longitudes",
            series.sun.len(),
            series.moon.len()
        ))
        .into());
    }

    Ok(series
        .moon
        .iter()
        .zip(&series.sun)
        .map(|(moon, sun)| normalize_degrees(moon - sun))
        .collect())
}

/// Arithmetic mean of the folded elongations of a sequence.
///
/// # Examples
///
/// ```
/// use lunar_elongation::services::sampler::mean_folded_elongation;
///
/// assert_eq!(mean_folded_elongation(&[10.0, 10.0]).unwrap(), 10.0);
/// assert_eq!(mean_folded_elongation(&[350.0, 350.0]).unwrap(), 10.0);
/// ```
pub fn mean_folded_elongation(elongations: &[f64]) -> AnalysisResult<f64> {
    if elongations.is_empty() {
        return Err(AnalysisError::EmptySequence);
    }
    let sum: f64 = elongations.iter().map(|&x| fold_elongation(x)).sum();
    Ok(sum / elongations.len() as f64)
}

/// Samples Moon–Sun elongations through an ephemeris oracle.
#[derive(Debug, Clone)]
pub struct Sampler<O> {
    oracle: O,
    config: SamplerConfig,
}

impl<O: EphemerisOracle> Sampler<O> {
    pub fn new(oracle: O, config: SamplerConfig) -> Self {
        Self { oracle, config }
    }

    /// Sampler with the standard synodic month and Julian year.
    pub fn with_defaults(oracle: O) -> Self {
        Self::new(oracle, SamplerConfig::default())
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Compute the sampling window without querying the oracle.
    ///
    /// # Arguments
    /// * `start_time` - First instant (inclusive)
    /// * `duration_years` - Requested span; rounded down to whole synodic months
    /// * `resolution_minutes` - Step between instants
    pub fn window(
        &self,
        start_time: &DateTime<Utc>,
        duration_years: f64,
        resolution_minutes: u32,
    ) -> AnalysisResult<SamplingWindow> {
        if resolution_minutes == 0 {
            return Err(AnalysisError::InvalidParameter(
                "resolution_minutes must be positive".to_string(),
            ));
        }
        if !duration_years.is_finite() || duration_years < 0.0 {
            return Err(AnalysisError::InvalidParameter(format!(
                "duration_years must be a non-negative number, got {}",
                duration_years
            )));
        }

        let synodic_month = self.config.synodic_month_days;
        let synodic_months = ((duration_years * self.config.days_per_year) / synodic_month).floor();
        let span_seconds = synodic_months * synodic_month * SECONDS_PER_DAY;
        let start_unix = datetime_to_unix(start_time);

        Ok(SamplingWindow {
            start_unix,
            end_unix: (start_unix + span_seconds).trunc(),
            step_seconds: f64::from(resolution_minutes) * 60.0,
            synodic_months: synodic_months as u64,
        })
    }

    /// Elongations in `[0, 360)` at every instant of the window, in order.
    pub fn sample(
        &self,
        start_time: &DateTime<Utc>,
        duration_years: f64,
        resolution_minutes: u32,
    ) -> AnalysisResult<Vec<f64>> {
        let window = self.window(start_time, duration_years, resolution_minutes)?;
        let instants = window.instants();

        debug!(
            "Sampling {} instants over {} synodic months from {}",
            instants.len(),
            window.synodic_months,
            start_time
        );

        if instants.is_empty() {
            return Ok(Vec::new());
        }

        let series = self.oracle.ecliptic_longitudes(&instants)?;
        if series.len() != instants.len() {
            return Err(EphemerisError::CalculationError(format!(
                "oracle returned {} longitudes for {} instants",
                series.len(),
                instants.len()
            ))
            .into());
        }

        elongations_from_longitudes(&series)
    }

    /// Mean of the folded elongations over the window, in `[0, 180]`.
    pub fn mean_elongation(
        &self,
        start_time: &DateTime<Utc>,
        duration_years: f64,
        resolution_minutes: u32,
    ) -> AnalysisResult<f64> {
        let elongations = self.sample(start_time, duration_years, resolution_minutes)?;
        mean_folded_elongation(&elongations)
    }

    /// Summary statistics of the folded elongations over the window.
    pub fn elongation_stats(
        &self,
        start_time: &DateTime<Utc>,
        duration_years: f64,
        resolution_minutes: u32,
    ) -> AnalysisResult<ElongationStats> {
        let folded: Vec<f64> = self
            .sample(start_time, duration_years, resolution_minutes)?
            .into_iter()
            .map(fold_elongation)
            .collect();
        if folded.is_empty() {
            return Err(AnalysisError::EmptySequence);
        }
        Ok(compute_stats(&folded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{AnalyticEphemeris, EphemerisResult};
    use chrono::TimeZone;

    /// Sun fixed at 0°, Moon at a constant longitude.
    struct FixedOracle {
        moon: f64,
    }

    impl EphemerisOracle for FixedOracle {
        fn ecliptic_longitudes(&self, unix_seconds: &[f64]) -> EphemerisResult<LongitudeSeries> {
            Ok(LongitudeSeries {
                sun: vec![0.0; unix_seconds.len()],
                moon: vec![self.moon; unix_seconds.len()],
            })
        }
    }

    /// Returns one fewer longitude than requested.
    struct ShortOracle;

    impl EphemerisOracle for ShortOracle {
        fn ecliptic_longitudes(&self, unix_seconds: &[f64]) -> EphemerisResult<LongitudeSeries> {
            let n = unix_seconds.len().saturating_sub(1);
            Ok(LongitudeSeries {
                sun: vec![0.0; n],
                moon: vec![0.0; n],
            })
        }
    }

    fn epoch_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1971, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_window_whole_synodic_months() {
        let sampler = Sampler::with_defaults(FixedOracle { moon: 0.0 });
        let window = sampler.window(&epoch_start(), 1.0, 60).unwrap();

        // 365.25 / 29.530588 = 12.37 -> 12 months
        assert_eq!(window.synodic_months, 12);
        let expected_end = (window.start_unix + 12.0 * SYNODIC_MONTH_DAYS * 86_400.0).trunc();
        assert_eq!(window.end_unix, expected_end);
        assert_eq!(window.step_seconds, 3_600.0);

        let instants = window.instants();
        assert_eq!(instants[0], window.start_unix);
        assert!(*instants.last().unwrap() < window.end_unix);
        assert!(instants.last().unwrap() + window.step_seconds >= window.end_unix);
    }

    #[test]
    fn test_window_shorter_than_a_month_is_empty() {
        let sampler = Sampler::with_defaults(FixedOracle { moon: 0.0 });
        let window = sampler.window(&epoch_start(), 0.05, 60).unwrap();
        assert_eq!(window.synodic_months, 0);
        assert!(window.is_empty());
        assert!(sampler.sample(&epoch_start(), 0.05, 60).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        let sampler = Sampler::with_defaults(FixedOracle { moon: 0.0 });
        assert!(matches!(
            sampler.sample(&epoch_start(), 1.0, 0),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(matches!(
            sampler.sample(&epoch_start(), -1.0, 60),
            Err(AnalysisError::InvalidParameter(_))
        ));
        assert!(matches!(
            sampler.sample(&epoch_start(), f64::NAN, 60),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_sample_reduces_negative_differences() {
        let sampler = Sampler::with_defaults(FixedOracle { moon: 350.0 });
        let values = sampler.sample(&epoch_start(), 0.1, 60).unwrap();
        assert!(!values.is_empty());
        assert!(values.iter().all(|&v| v == 350.0));
    }

    #[test]
    fn test_mean_elongation_fold_symmetry() {
        let near = Sampler::with_defaults(FixedOracle { moon: 10.0 });
        let far = Sampler::with_defaults(FixedOracle { moon: 350.0 });
        assert_eq!(near.mean_elongation(&epoch_start(), 0.1, 60).unwrap(), 10.0);
        assert_eq!(far.mean_elongation(&epoch_start(), 0.1, 60).unwrap(), 10.0);
    }

    #[test]
    fn test_mean_elongation_of_empty_window_is_error() {
        let sampler = Sampler::with_defaults(FixedOracle { moon: 10.0 });
        assert!(matches!(
            sampler.mean_elongation(&epoch_start(), 0.0, 60),
            Err(AnalysisError::EmptySequence)
        ));
    }

    #[test]
    fn test_length_mismatch_is_ephemeris_error() {
        let sampler = Sampler::with_defaults(ShortOracle);
        assert!(matches!(
            sampler.sample(&epoch_start(), 0.1, 60),
            Err(AnalysisError::Ephemeris(_))
        ));
    }

    #[test]
    fn test_elongations_from_longitudes() {
        let series = LongitudeSeries {
            sun: vec![10.0, 350.0, 180.0],
            moon: vec![5.0, 10.0, 0.0],
        };
        let values = elongations_from_longitudes(&series).unwrap();
        assert!((values[0] - 355.0).abs() < 1e-12);
        assert!((values[1] - 20.0).abs() < 1e-12);
        assert!((values[2] - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_analytic_year_is_roughly_uniform() {
        let sampler = Sampler::with_defaults(AnalyticEphemeris);
        let values = sampler.sample(&epoch_start(), 1.0, 360).unwrap();
        assert!(values.iter().all(|v| (0.0..360.0).contains(v)));

        // Over whole synodic months the folded mean sits near 90°.
        let mean = mean_folded_elongation(&values).unwrap();
        assert!((mean - 90.0).abs() < 3.0, "mean {}", mean);
    }

    #[test]
    fn test_elongation_stats() {
        let sampler = Sampler::with_defaults(FixedOracle { moon: 270.0 });
        let stats = sampler.elongation_stats(&epoch_start(), 0.1, 60).unwrap();
        assert_eq!(stats.mean, 90.0);
        assert_eq!(stats.min, 90.0);
        assert_eq!(stats.max, 90.0);
        assert_eq!(stats.std_dev, 0.0);
    }
}
