//! Summary statistics of folded elongation sequences.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ephemeris::SignedDms;

/// Summary statistics of a sequence of (folded) elongations, in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElongationStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for ElongationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} mean={:.6} ({}) median={:.3} sd={:.3} range=[{:.3}, {:.3}]",
            self.count,
            self.mean,
            SignedDms::from_degrees(self.mean),
            self.median,
            self.std_dev,
            self.min,
            self.max
        )
    }
}

/// Compute count, mean, median, population standard deviation, min and max.
///
/// An empty slice yields all-zero statistics with `count == 0`.
pub fn compute_stats(values: &[f64]) -> ElongationStats {
    if values.is_empty() {
        return ElongationStats {
            count: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    ElongationStats {
        count,
        mean,
        median,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
    }
}
