//! Error types for elongation analysis.

use crate::core::domain::DistributionError;
use crate::ephemeris::EphemerisError;
use crate::store::StoreError;

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type for sampling, binning, combination and the epoch pipeline
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Elongation sequence is empty")]
    EmptySequence,

    #[error("Invalid elongation sample at index {index}: {value}")]
    InvalidSample { index: usize, value: f64 },

    #[error("Cannot combine an empty list of distributions")]
    EmptyAggregation,

    #[error("Invalid distribution: {0}")]
    Distribution(#[from] DistributionError),

    #[error("Ephemeris error: {0}")]
    Ephemeris(#[from] EphemerisError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
