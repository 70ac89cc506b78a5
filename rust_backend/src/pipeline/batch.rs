//! Metonic-aligned batches of epochs.
//!
//! A [`BatchPlan`] lays out the start times; the functions below run every
//! epoch of a plan, combine the stored results or report per-epoch means.

use chrono::{DateTime, Duration, Utc};
use log::info;
use serde::Serialize;

use super::epoch::{EpochOutcome, EpochPipeline, EpochRequest};
use crate::config::AnalysisConfig;
use crate::core::domain::{EpochKey, FrequencyDistribution};
use crate::ephemeris::EphemerisOracle;
use crate::error::{AnalysisError, AnalysisResult};
use crate::services::{combine_distributions, Sampler};
use crate::store::DistributionStore;

/// Epochs spaced by whole multiples of the Metonic cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPlan {
    pub initial_time: DateTime<Utc>,
    pub epoch_count: u32,
    pub metonic_multiplier: u32,
    pub metonic_cycle_months: u32,
    pub synodic_month_days: f64,
    pub duration_years: f64,
    pub resolution_minutes: u32,
}

impl BatchPlan {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            initial_time: config.batch.initial_time,
            epoch_count: config.batch.epoch_count,
            metonic_multiplier: config.batch.metonic_multiplier,
            metonic_cycle_months: config.astronomy.metonic_cycle_months,
            synodic_month_days: config.astronomy.synodic_month_days,
            duration_years: config.duration_years(),
            resolution_minutes: config.sampling.resolution_minutes,
        }
    }

    /// Spacing between consecutive start times, in days.
    pub fn epoch_length_days(&self) -> f64 {
        self.synodic_month_days
            * f64::from(self.metonic_cycle_months)
            * f64::from(self.metonic_multiplier)
    }

    /// `initial_time + i × epoch_length` for `i` in `0..epoch_count`.
    ///
    /// The spacing is rounded once to whole microseconds and then multiplied,
    /// so start times do not accumulate rounding drift.
    pub fn start_times(&self) -> AnalysisResult<Vec<DateTime<Utc>>> {
        let spacing_us = (self.epoch_length_days() * 86_400e6).round();
        if !spacing_us.is_finite() || spacing_us.abs() > i64::MAX as f64 {
            return Err(AnalysisError::InvalidParameter(format!(
                "epoch length of {} days is out of range",
                self.epoch_length_days()
            )));
        }
        let spacing_us = spacing_us as i64;

        (0..i64::from(self.epoch_count))
            .map(|i| {
                spacing_us
                    .checked_mul(i)
                    .map(Duration::microseconds)
                    .and_then(|offset| self.initial_time.checked_add_signed(offset))
                    .ok_or_else(|| {
                        AnalysisError::InvalidParameter(format!(
                            "start time of epoch {} is out of range",
                            i
                        ))
                    })
            })
            .collect()
    }

    pub fn requests(&self) -> AnalysisResult<Vec<EpochRequest>> {
        Ok(self
            .start_times()?
            .into_iter()
            .map(|start_time| EpochRequest {
                start_time,
                cycle_multiplier: self.metonic_multiplier,
                duration_years: self.duration_years,
                resolution_minutes: self.resolution_minutes,
            })
            .collect())
    }

    pub fn keys(&self) -> AnalysisResult<Vec<EpochKey>> {
        Ok(self.requests()?.iter().map(EpochRequest::key).collect())
    }
}

/// Keys computed and skipped by a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub computed: Vec<EpochKey>,
    pub skipped: Vec<EpochKey>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.computed.len() + self.skipped.len()
    }
}

/// Mean folded elongation of one epoch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochMean {
    pub start_time: DateTime<Utc>,
    pub mean: f64,
}

/// Run the cached pipeline for every epoch of the plan, in order.
///
/// Stops at the first failing epoch; epochs stored before the failure stay
/// stored and are skipped on the next run.
pub fn run_batch<O, S>(pipeline: &EpochPipeline<O, S>, plan: &BatchPlan) -> AnalysisResult<BatchReport>
where
    O: EphemerisOracle,
    S: DistributionStore,
{
    let requests = plan.requests()?;
    let mut report = BatchReport::default();

    for (i, request) in requests.iter().enumerate() {
        info!("Epoch {}/{} starting {}", i + 1, requests.len(), request.start_time);
        match pipeline.run(request)? {
            EpochOutcome::Computed { key, .. } => report.computed.push(key),
            EpochOutcome::Skipped { key } => report.skipped.push(key),
        }
    }

    info!(
        "Batch finished: {} computed, {} skipped",
        report.computed.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Load every epoch of the plan from the store and combine them.
///
/// # Returns
/// * `Err(AnalysisError::Store(StoreError::NotFound))` if any epoch is missing
/// * `Err(AnalysisError::EmptyAggregation)` if the plan has no epochs
pub fn aggregate_plan<S: DistributionStore>(
    store: &S,
    plan: &BatchPlan,
) -> AnalysisResult<FrequencyDistribution> {
    let distributions = plan
        .keys()?
        .iter()
        .map(|key| store.load(key))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Combining {} distributions from {}", distributions.len(), store.describe());
    combine_distributions(&distributions)
}

/// Mean folded elongation of every epoch of the plan. Nothing is cached.
pub fn mean_elongations<O: EphemerisOracle>(
    sampler: &Sampler<O>,
    plan: &BatchPlan,
) -> AnalysisResult<Vec<EpochMean>> {
    plan.requests()?
        .iter()
        .map(|request| {
            let mean = sampler.mean_elongation(
                &request.start_time,
                request.duration_years,
                request.resolution_minutes,
            )?;
            info!("{}: mean elongation {:.6}°", request.start_time, mean);
            Ok(EpochMean {
                start_time: request.start_time,
                mean,
            })
        })
        .collect()
}
