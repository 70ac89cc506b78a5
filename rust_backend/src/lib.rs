//! Lunar elongation analysis.
//!
//! Samples the Moon–Sun elongation over long time spans, bins the samples into
//! a 360-bucket frequency distribution and caches one distribution per epoch
//! so that many Metonic-aligned epochs can be combined offline.
//!
//! # Modules
//!
//! - [`time`]: Unix / Julian date conversions and ΔT
//! - [`ephemeris`]: The ephemeris oracle trait and an analytic solar/lunar theory
//! - [`core`]: Epoch keys and frequency distributions
//! - [`services`]: Sampling, binning, combination and statistics
//! - [`store`]: Distribution stores (flat files, in-memory)
//! - [`pipeline`]: The cached epoch pipeline and the batch driver
//! - [`config`]: TOML configuration

pub mod config;
pub mod core;
pub mod ephemeris;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod store;
pub mod time;

pub use config::AnalysisConfig;
pub use core::domain::{EpochKey, FrequencyDistribution, BUCKET_COUNT};
pub use ephemeris::{AnalyticEphemeris, EphemerisOracle, LongitudeSeries};
pub use error::{AnalysisError, AnalysisResult};
pub use pipeline::{BatchPlan, BatchReport, EpochOutcome, EpochPipeline, EpochRequest};
pub use services::{bin_elongations, combine_distributions, Sampler, SamplerConfig};
pub use store::{DistributionStore, FileStore, LocalStore, StoreError};
