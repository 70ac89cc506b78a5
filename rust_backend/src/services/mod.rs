//! Sampling and aggregation services.
//!
//! # Components
//!
//! - [`sampler`]: Elongation sampling through an ephemeris oracle
//! - [`aggregator`]: Binning into 360 buckets and unweighted combination
//! - [`statistics`]: Summary statistics of elongation sequences

pub mod aggregator;
pub mod sampler;
pub mod statistics;


pub use aggregator::{bin_elongations, bucket_index, combine_distributions};
pub use sampler::{
    elongations_from_longitudes, fold_elongation, mean_folded_elongation, Sampler,
    SamplerConfig, SamplingWindow, DAYS_PER_YEAR, SYNODIC_MONTH_DAYS,
};
pub use statistics::{compute_stats, ElongationStats};
