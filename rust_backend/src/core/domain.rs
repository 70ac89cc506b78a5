//! Domain models for epochs and elongation frequency distributions.
//!
//! This module provides the data structures shared by the sampler, the
//! aggregator and the distribution stores.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of one-degree buckets in a frequency distribution.
pub const BUCKET_COUNT: usize = 360;

/// Tolerance on the bucket sum accepted when validating a distribution.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-6;

/// Identifies one sampling run and addresses its cached distribution.
///
/// The key is made of the start date (day granularity), the Metonic cycle
/// multiplier of the batch and the sampling resolution in minutes.
///
/// # Examples
///
/// ```
/// use lunar_elongation::core::domain::EpochKey;
/// use chrono::NaiveDate;
///
/// let key = EpochKey::new(NaiveDate::from_ymd_opt(1971, 1, 1).unwrap(), 4, 400);
/// assert_eq!(key.file_name(), "19710101_4_400.json");
/// assert_eq!("19710101_4_400".parse::<EpochKey>().unwrap(), key);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EpochKey {
    pub start_date: NaiveDate,
    pub cycle_multiplier: u32,
    pub resolution_minutes: u32,
}

impl EpochKey {
    /// File extension of cached distributions.
    pub const EXTENSION: &'static str = "json";

    pub fn new(start_date: NaiveDate, cycle_multiplier: u32, resolution_minutes: u32) -> Self {
        Self {
            start_date,
            cycle_multiplier,
            resolution_minutes,
        }
    }

    /// Build a key from a start instant, truncating it to its UTC date.
    pub fn from_start_time(
        start_time: &DateTime<Utc>,
        cycle_multiplier: u32,
        resolution_minutes: u32,
    ) -> Self {
        Self::new(start_time.date_naive(), cycle_multiplier, resolution_minutes)
    }

    /// `YYYYMMDD_<multiplier>_<resolution>`
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}_{}",
            self.start_date.format("%Y%m%d"),
            self.cycle_multiplier,
            self.resolution_minutes
        )
    }

    /// File stem plus the `.json` extension.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.file_stem(), Self::EXTENSION)
    }
}

impl fmt::Display for EpochKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}

impl FromStr for EpochKey {
    type Err = String;

    /// Parse a file stem or file name back into a key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stem = s
            .strip_suffix(".json")
            .unwrap_or(s);

        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() != 3 {
            return Err(format!(
                "Invalid epoch key '{}': expected YYYYMMDD_<multiplier>_<resolution>",
                s
            ));
        }

        let start_date = NaiveDate::parse_from_str(parts[0], "%Y%m%d")
            .map_err(|e| format!("Invalid epoch date '{}': {}", parts[0], e))?;
        let cycle_multiplier = parts[1]
            .parse::<u32>()
            .map_err(|e| format!("Invalid cycle multiplier '{}': {}", parts[1], e))?;
        let resolution_minutes = parts[2]
            .parse::<u32>()
            .map_err(|e| format!("Invalid resolution '{}': {}", parts[2], e))?;

        Ok(Self::new(start_date, cycle_multiplier, resolution_minutes))
    }
}

/// Reasons a bucket vector is not a valid frequency distribution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistributionError {
    #[error("expected {expected} buckets, found {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("bucket {index} holds invalid value {value}")]
    InvalidBucket { index: usize, value: f64 },

    #[error("buckets sum to {sum}, expected 1.0")]
    NotNormalized { sum: f64 },
}

/// Normalized histogram of elongations over 360 one-degree buckets.
///
/// Bucket `i` approximates the probability that a sample rounds to `i`
/// degrees. Every instance has exactly [`BUCKET_COUNT`] finite, non-negative
/// buckets summing to 1.0 within [`NORMALIZATION_TOLERANCE`]. It serializes
/// as a bare JSON array and deserialization re-checks these invariants.
///
/// # Examples
///
/// ```
/// use lunar_elongation::core::domain::FrequencyDistribution;
///
/// let uniform = FrequencyDistribution::uniform();
/// assert_eq!(uniform.buckets().len(), 360);
/// assert!((uniform.total() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct FrequencyDistribution {
    buckets: Vec<f64>,
}

impl FrequencyDistribution {
    /// Validate and wrap a bucket vector.
    pub fn from_buckets(buckets: Vec<f64>) -> Result<Self, DistributionError> {
        if buckets.len() != BUCKET_COUNT {
            return Err(DistributionError::WrongLength {
                expected: BUCKET_COUNT,
                actual: buckets.len(),
            });
        }

        if let Some((index, &value)) = buckets
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(DistributionError::InvalidBucket { index, value });
        }

        let sum: f64 = buckets.iter().sum();
        if (sum - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(DistributionError::NotNormalized { sum });
        }

        Ok(Self { buckets })
    }

    /// The distribution with every bucket equal to 1/360.
    pub fn uniform() -> Self {
        Self {
            buckets: vec![Self::uniform_level(); BUCKET_COUNT],
        }
    }

    /// Height of a bucket in the uniform distribution.
    #[inline]
    pub fn uniform_level() -> f64 {
        1.0 / BUCKET_COUNT as f64
    }

    pub fn buckets(&self) -> &[f64] {
        &self.buckets
    }

    /// Probability mass of bucket `index`, or `None` past the last bucket.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.buckets.get(index).copied()
    }

    pub fn total(&self) -> f64 {
        self.buckets.iter().sum()
    }

    /// Index and height of the tallest bucket (first one on ties).
    pub fn peak(&self) -> (usize, f64) {
        self.buckets
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, v)| {
                if v > best.1 {
                    (i, v)
                } else {
                    best
                }
            })
    }

    /// Each bucket minus the uniform level 1/360.
    pub fn baseline_deviation(&self) -> Vec<f64> {
        let level = Self::uniform_level();
        self.buckets.iter().map(|v| v - level).collect()
    }

    /// Split the circle into the half around new moon and the half around
    /// full moon.
    ///
    /// The new-moon half is buckets 270..360 followed by 0..90, the full-moon
    /// half is buckets 90..270. Both are 180 long so they can be compared
    /// element-wise.
    pub fn phase_halves(&self) -> PhaseHalves {
        let new_moon: Vec<f64> = self.buckets[270..]
            .iter()
            .chain(&self.buckets[..90])
            .copied()
            .collect();
        let full_moon = self.buckets[90..270].to_vec();
        let difference = new_moon
            .iter()
            .zip(&full_moon)
            .map(|(n, f)| n - f)
            .collect();

        PhaseHalves {
            new_moon,
            full_moon,
            difference,
        }
    }
}

impl TryFrom<Vec<f64>> for FrequencyDistribution {
    type Error = DistributionError;

    fn try_from(buckets: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_buckets(buckets)
    }
}

impl From<FrequencyDistribution> for Vec<f64> {
    fn from(distribution: FrequencyDistribution) -> Self {
        distribution.buckets
    }
}

/// New-moon and full-moon halves of a distribution and their difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseHalves {
    pub new_moon: Vec<f64>,
    pub full_moon: Vec<f64>,
    pub difference: Vec<f64>,
}
