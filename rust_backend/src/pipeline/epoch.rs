//! Single-epoch pipeline with a key-existence cache check.

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::core::domain::{EpochKey, FrequencyDistribution};
use crate::ephemeris::EphemerisOracle;
use crate::error::AnalysisResult;
use crate::services::{bin_elongations, Sampler};
use crate::store::DistributionStore;

/// One epoch to sample and bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochRequest {
    pub start_time: DateTime<Utc>,
    pub cycle_multiplier: u32,
    pub duration_years: f64,
    pub resolution_minutes: u32,
}

impl EpochRequest {
    /// Store key of this epoch.
    pub fn key(&self) -> EpochKey {
        EpochKey::from_start_time(&self.start_time, self.cycle_multiplier, self.resolution_minutes)
    }
}

/// Result of running the pipeline for one epoch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpochOutcome {
    /// Sampled, binned and stored
    Computed { key: EpochKey, samples: usize },
    /// Already present in the store; nothing was computed
    Skipped { key: EpochKey },
}

impl EpochOutcome {
    pub fn key(&self) -> &EpochKey {
        match self {
            EpochOutcome::Computed { key, .. } | EpochOutcome::Skipped { key } => key,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, EpochOutcome::Skipped { .. })
    }
}

/// Cached sample → bin → store pipeline.
pub struct EpochPipeline<O, S> {
    sampler: Sampler<O>,
    store: S,
}

impl<O: EphemerisOracle, S: DistributionStore> EpochPipeline<O, S> {
    pub fn new(sampler: Sampler<O>, store: S) -> Self {
        Self { sampler, store }
    }

    pub fn sampler(&self) -> &Sampler<O> {
        &self.sampler
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one epoch unless its key is already stored.
    ///
    /// # Returns
    /// * `Ok(EpochOutcome::Skipped)` if the store already holds the key; the
    ///   oracle is not queried
    /// * `Ok(EpochOutcome::Computed)` once the new distribution is stored
    /// * `Err(AnalysisError)` on oracle, binning or store failure
    pub fn run(&self, request: &EpochRequest) -> AnalysisResult<EpochOutcome> {
        let key = request.key();

        // Step 1: Cache check
        if self.store.contains(&key)? {
            info!("Epoch {} already stored in {}, skipping", key, self.store.describe());
            return Ok(EpochOutcome::Skipped { key });
        }

        // Step 2: Sample and bin
        let (distribution, samples) = self.compute(request)?;

        // Step 3: Persist
        self.store.store(&key, &distribution)?;
        info!("Epoch {} stored ({} samples)", key, samples);

        Ok(EpochOutcome::Computed { key, samples })
    }

    /// Sample and bin one epoch without touching the store.
    ///
    /// Returns the distribution and the number of samples it was built from.
    pub fn compute(&self, request: &EpochRequest) -> AnalysisResult<(FrequencyDistribution, usize)> {
        let elongations = self.sampler.sample(
            &request.start_time,
            request.duration_years,
            request.resolution_minutes,
        )?;
        debug!("Binning {} elongations for {}", elongations.len(), request.key());

        let distribution = bin_elongations(&elongations)?;
        Ok((distribution, elongations.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{EphemerisResult, LongitudeSeries};
    use crate::error::AnalysisError;
    use crate::store::LocalStore;
    use chrono::TimeZone;
    use std::cell::Cell;

    /// Sun fixed at 0°, Moon at a constant longitude; counts oracle calls.
    struct ConstantOracle {
        moon: f64,
        calls: Cell<usize>,
    }

    impl ConstantOracle {
        fn new(moon: f64) -> Self {
            Self {
                moon,
                calls: Cell::new(0),
            }
        }
    }

    impl EphemerisOracle for ConstantOracle {
        fn ecliptic_longitudes(&self, unix_seconds: &[f64]) -> EphemerisResult<LongitudeSeries> {
            self.calls.set(self.calls.get() + 1);
            Ok(LongitudeSeries {
                sun: vec![0.0; unix_seconds.len()],
                moon: vec![self.moon; unix_seconds.len()],
            })
        }
    }

    fn request() -> EpochRequest {
        EpochRequest {
            start_time: Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap(),
            cycle_multiplier: 1,
            duration_years: 0.5,
            resolution_minutes: 720,
        }
    }

    #[test]
    fn test_request_key() {
        assert_eq!(request().key().file_stem(), "20000101_1_720");
    }

    #[test]
    fn test_run_then_skip() {
        let pipeline = EpochPipeline::new(
            Sampler::with_defaults(ConstantOracle::new(90.0)),
            LocalStore::new(),
        );

        let first = pipeline.run(&request()).unwrap();
        assert!(matches!(first, EpochOutcome::Computed { samples, .. } if samples > 0));
        assert_eq!(pipeline.sampler().oracle().calls.get(), 1);

        let second = pipeline.run(&request()).unwrap();
        assert!(second.is_skipped());
        assert_eq!(second.key(), first.key());
        assert_eq!(pipeline.sampler().oracle().calls.get(), 1);

        let stored = pipeline.store().load(&request().key()).unwrap();
        assert_eq!(stored.get(90), Some(1.0));
    }

    #[test]
    fn test_empty_window_is_error() {
        let pipeline = EpochPipeline::new(
            Sampler::with_defaults(ConstantOracle::new(10.0)),
            LocalStore::new(),
        );
        let short = EpochRequest {
            duration_years: 0.01,
            ..request()
        };

        assert!(matches!(pipeline.run(&short), Err(AnalysisError::EmptySequence)));
        assert!(pipeline.store().is_empty().unwrap());
    }

    #[test]
    fn test_compute_does_not_store() {
        let pipeline = EpochPipeline::new(
            Sampler::with_defaults(ConstantOracle::new(180.0)),
            LocalStore::new(),
        );
        let (distribution, samples) = pipeline.compute(&request()).unwrap();
        assert!(samples > 0);
        assert_eq!(distribution.peak(), (180, 1.0));
        assert!(pipeline.store().is_empty().unwrap());
    }
}
