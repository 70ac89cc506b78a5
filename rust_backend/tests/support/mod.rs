//! Deterministic ephemeris oracles shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;

use lunar_elongation::ephemeris::{EphemerisError, EphemerisOracle, EphemerisResult, LongitudeSeries};

/// Mean synodic rate of the Moon relative to the Sun, degrees per second.
pub const SYNODIC_RATE: f64 = 360.0 / (29.530588 * 86_400.0);

/// Sun fixed at 0°, Moon at a constant longitude.
pub struct ConstantOracle {
    pub moon: f64,
}

impl EphemerisOracle for ConstantOracle {
    fn ecliptic_longitudes(&self, unix_seconds: &[f64]) -> EphemerisResult<LongitudeSeries> {
        Ok(LongitudeSeries {
            sun: vec![0.0; unix_seconds.len()],
            moon: vec![self.moon; unix_seconds.len()],
        })
    }
}

/// Moon advancing uniformly at the mean synodic rate, new moon at Unix 0.
pub struct UniformOracle;

impl EphemerisOracle for UniformOracle {
    fn ecliptic_longitudes(&self, unix_seconds: &[f64]) -> EphemerisResult<LongitudeSeries> {
        let mut series = LongitudeSeries::with_capacity(unix_seconds.len());
        for &t in unix_seconds {
            series.sun.push(0.0);
            series.moon.push((t * SYNODIC_RATE).rem_euclid(360.0));
        }
        Ok(series)
    }
}

/// Wraps an oracle and counts bulk calls.
pub struct CountingOracle<O> {
    pub inner: O,
    calls: Cell<usize>,
}

impl<O> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<O: EphemerisOracle> EphemerisOracle for CountingOracle<O> {
    fn ecliptic_longitudes(&self, unix_seconds: &[f64]) -> EphemerisResult<LongitudeSeries> {
        self.calls.set(self.calls.get() + 1);
        self.inner.ecliptic_longitudes(unix_seconds)
    }
}

/// Always fails.
pub struct FailingOracle;

impl EphemerisOracle for FailingOracle {
    fn ecliptic_longitudes(&self, _unix_seconds: &[f64]) -> EphemerisResult<LongitudeSeries> {
        Err(EphemerisError::CalculationError("kernel unavailable".to_string()))
    }
}
