//! Solar and lunar position lookup.
//!
//! The rest of the crate only sees the [`EphemerisOracle`] trait: given a batch
//! of instants it returns the geocentric apparent ecliptic longitude of the Sun
//! and of the Moon at each one. [`AnalyticEphemeris`] is the bundled
//! implementation.
//!
//! # Components
//!
//! - [`analytic`]: Low-precision analytic solar/lunar theory
//! - [`angle`]: Degree normalization and sexagesimal (DMS) angles

pub mod analytic;
pub mod angle;

pub use analytic::AnalyticEphemeris;
pub use angle::{normalize_degrees, SignedDms};

/// Result type for ephemeris lookups
pub type EphemerisResult<T> = Result<T, EphemerisError>;

/// Error type for ephemeris lookups
#[derive(Debug, thiserror::Error)]
pub enum EphemerisError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Time out of supported range: {0}")]
    OutOfRange(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Sun and Moon ecliptic longitudes for a batch of instants.
///
/// Both vectors are in degrees in `[0, 360)` and are index-aligned with the
/// instants passed to [`EphemerisOracle::ecliptic_longitudes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongitudeSeries {
    pub sun: Vec<f64>,
    pub moon: Vec<f64>,
}

impl LongitudeSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sun: Vec::with_capacity(capacity),
            moon: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.sun.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sun.is_empty()
    }
}

/// Source of geocentric solar and lunar ecliptic longitudes.
///
/// Implementations receive every instant of an epoch in a single call.
pub trait EphemerisOracle {
    /// Ecliptic longitudes of the Sun and Moon at each instant.
    ///
    /// # Arguments
    /// * `unix_seconds` - Instants as Unix timestamps (UTC seconds)
    ///
    /// # Returns
    /// * `Ok(LongitudeSeries)` with one entry per instant, in input order
    /// * `Err(EphemerisError)` if any instant cannot be evaluated
    fn ecliptic_longitudes(&self, unix_seconds: &[f64]) -> EphemerisResult<LongitudeSeries>;
}

impl<O: EphemerisOracle + ?Sized> EphemerisOracle for &O {
    fn ecliptic_longitudes(&self, unix_seconds: &[f64]) -> EphemerisResult<LongitudeSeries> {
        (**self).ecliptic_longitudes(unix_seconds)
    }
}

impl<O: EphemerisOracle + ?Sized> EphemerisOracle for Box<O> {
    fn ecliptic_longitudes(&self, unix_seconds: &[f64]) -> EphemerisResult<LongitudeSeries> {
        (**self).ecliptic_longitudes(unix_seconds)
    }
}
