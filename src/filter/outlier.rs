//! IQR outlier fence over a score column
//!
//! Quartiles are read straight from the sorted values at `floor(0.25 * n)`
//! and `floor(0.75 * n)`. This is a simplified, non-interpolated estimator
//! kept on purpose so flagged chains match what users already see; it is not
//! the textbook interpolated IQR.

use crate::chain::{ChainId, ChainSet};
use std::collections::HashSet;

/// Below this many non-null values no chain is flagged
pub const MIN_OUTLIER_POINTS: usize = 4;

const FENCE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    /// True if the value lies strictly outside `[lower, upper]`
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Fences for a list of values; `None` with fewer than four values
pub fn iqr_bounds(values: &[f64]) -> Option<OutlierBounds> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = sorted.len();
    if n < MIN_OUTLIER_POINTS {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = sorted[(0.25 * n as f64).floor() as usize];
    let q3 = sorted[(0.75 * n as f64).floor() as usize];
    let iqr = q3 - q1;
    Some(OutlierBounds {
        q1,
        q3,
        iqr,
        lower: q1 - FENCE * iqr,
        upper: q3 + FENCE * iqr,
    })
}

/// Bounds and flagged chains for one score column
#[derive(Debug, Clone, Default)]
pub struct OutlierReport {
    pub bounds: Option<OutlierBounds>,
    pub outliers: HashSet<ChainId>,
    /// Number of non-null values considered
    pub sample_size: usize,
}

impl OutlierReport {
    pub fn compute(chains: &ChainSet, column: &str) -> Self {
        let values: Vec<f64> = chains.iter().filter_map(|c| c.score(column)).collect();
        let sample_size = values.len();
        let bounds = iqr_bounds(&values);
        let outliers = match bounds {
            Some(b) => chains
                .iter()
                .filter(|c| c.score(column).is_some_and(|v| b.is_outlier(v)))
                .map(|c| c.chain_id.clone())
                .collect(),
            None => HashSet::new(),
        };
        Self {
            bounds,
            outliers,
            sample_size,
        }
    }
}

/// IDs of chains whose score in `column` falls outside the IQR fence
pub fn detect_outliers(chains: &ChainSet, column: &str) -> HashSet<ChainId> {
    OutlierReport::compute(chains, column).outliers
}
