//! Elongation binning and distribution combination.
//!
//! ## Binning
//! Each sample is rounded half away from zero and reduced modulo 360, so the
//! bucket `i` covers `[i - 0.5, i + 0.5)` and bucket 0 also receives values in
//! `[359.5, 360)`. Counts are divided by the sample count.
//!
//! ## Combination
//! Distributions from different epochs are averaged bucket by bucket without
//! weights. The sum is taken first and divided once, so combining copies of
//! one distribution returns it exactly.

use log::debug;

use crate::core::domain::{FrequencyDistribution, BUCKET_COUNT};
use crate::error::{AnalysisError, AnalysisResult};

/// Bucket index of a single elongation.
///
/// # Examples
///
/// ```
/// use lunar_elongation::services::aggregator::bucket_index;
///
/// assert_eq!(bucket_index(0.4), 0);
/// assert_eq!(bucket_index(179.5), 180);
/// assert_eq!(bucket_index(359.6), 0);
/// ```
#[inline]
pub fn bucket_index(elongation: f64) -> usize {
    (elongation.round() as i64).rem_euclid(BUCKET_COUNT as i64) as usize
}

/// Bin a sequence of elongations into a normalized 360-bucket distribution.
///
/// # Arguments
/// * `elongations` - Samples in degrees, nominally in `[0, 360)`
///
/// # Returns
/// * `Ok(FrequencyDistribution)` whose buckets sum to 1.0
/// * `Err(AnalysisError::EmptySequence)` for an empty input
/// * `Err(AnalysisError::InvalidSample)` for a NaN or infinite sample
pub fn bin_elongations(elongations: &[f64]) -> AnalysisResult<FrequencyDistribution> {
    if elongations.is_empty() {
        return Err(AnalysisError::EmptySequence);
    }

    let mut counts = [0u64; BUCKET_COUNT];
    for (index, &value) in elongations.iter().enumerate() {
        if !value.is_finite() {
            return Err(AnalysisError::InvalidSample { index, value });
        }
        counts[bucket_index(value)] += 1;
    }

    let total = elongations.len() as f64;
    let buckets = counts.iter().map(|&c| c as f64 / total).collect();

    debug!("Binned {} elongation samples", elongations.len());
    Ok(FrequencyDistribution::from_buckets(buckets)?)
}

/// Unweighted bucket-wise mean of several distributions.
///
/// # Returns
/// * `Ok(FrequencyDistribution)` with `combined[i] = Σ_k d_k[i] / n`
/// * `Err(AnalysisError::EmptyAggregation)` when `distributions` is empty
pub fn combine_distributions(
    distributions: &[FrequencyDistribution],
) -> AnalysisResult<FrequencyDistribution> {
    if distributions.is_empty() {
        return Err(AnalysisError::EmptyAggregation);
    }

    let mut sums = vec![0.0; BUCKET_COUNT];
    for distribution in distributions {
        for (sum, value) in sums.iter_mut().zip(distribution.buckets()) {
            *sum += value;
        }
    }

    let n = distributions.len() as f64;
    let buckets = sums.into_iter().map(|s| s / n).collect();

    debug!("Combined {} distributions", distributions.len());
    Ok(FrequencyDistribution::from_buckets(buckets)?)
}
