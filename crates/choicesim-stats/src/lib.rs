//! Summary statistics for simulated score distributions.
//!
//! Turns an outcome vector (one total score per simulated trial) into a
//! [`Summary`] and ranks several summarized options against each other. All
//! statistics are order-independent: the outcome vector is treated as an
//! unordered multiset.
//!
//! Percentiles use linear interpolation between order statistics. For a sorted
//! sample `x` of length `n` and quantile `q`, the rank is `h = (n - 1) * q` and
//! the value is `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
//! This matches the default method of the common numerical libraries, so test
//! fixtures computed elsewhere agree with ours.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors raised while summarizing outcomes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    #[error("no outcomes to summarize")]
    EmptyInput,

    #[error("outcome at index {index} is not finite")]
    NonFinite { index: usize },

    #[error("histogram needs at least one bin")]
    InvalidBins,
}

pub type Result<T> = std::result::Result<T, StatsError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Summary
// ═══════════════════════════════════════════════════════════════════════════════

/// Distribution summary of one outcome vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    /// 25th percentile.
    pub p25: f64,
    pub median: f64,
    /// 75th percentile.
    pub p75: f64,
    pub max: f64,
}

impl Summary {
    /// Interquartile spread, `p75 - p25`.
    pub fn spread(&self) -> f64 {
        self.p75 - self.p25
    }
}

/// Summarize an outcome vector.
///
/// Fails with [`StatsError::EmptyInput`] on an empty slice and with
/// [`StatsError::NonFinite`] if any outcome is NaN or infinite.
pub fn summarize(outcomes: &[f64]) -> Result<Summary> {
    if outcomes.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    if let Some(index) = outcomes.iter().position(|x| !x.is_finite()) {
        return Err(StatsError::NonFinite { index });
    }

    let mut sorted = outcomes.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    // Summing the sorted copy keeps the mean bit-identical under reordering.
    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;

    Ok(Summary {
        count: sorted.len(),
        mean,
        std_dev: variance.sqrt(),
        min: sorted[0],
        p25: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.5),
        p75: percentile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Linear-interpolated percentile of an already sorted, non-empty slice.
///
/// `q` is clamped to `[0, 1]`. Returns NaN for an empty slice.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rankings
// ═══════════════════════════════════════════════════════════════════════════════

/// Titles sorted descending by mean score. Ties keep input order.
pub fn rank_by_mean<S: AsRef<str>>(summaries: &[(S, Summary)]) -> Vec<String> {
    let mut ranked: Vec<&(S, Summary)> = summaries.iter().collect();
    ranked.sort_by(|a, b| b.1.mean.total_cmp(&a.1.mean));
    ranked.iter().map(|(t, _)| t.as_ref().to_string()).collect()
}

/// Titles sorted ascending by interquartile spread (`p75 - p25`), so the most
/// predictable option comes first. Ties keep input order.
pub fn rank_by_spread<S: AsRef<str>>(summaries: &[(S, Summary)]) -> Vec<String> {
    let mut ranked: Vec<&(S, Summary)> = summaries.iter().collect();
    ranked.sort_by(|a, b| a.1.spread().total_cmp(&b.1.spread()));
    ranked.iter().map(|(t, _)| t.as_ref().to_string()).collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Histogram
// ═══════════════════════════════════════════════════════════════════════════════

/// Bin count used by the reference histogram view.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Equal-width bin counts over the observed outcome range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin `outcomes` into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// The last bin is closed on the right. A sample with zero range puts every
    /// outcome into the first bin.
    pub fn from_outcomes(outcomes: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(StatsError::InvalidBins);
        }
        if outcomes.is_empty() {
            return Err(StatsError::EmptyInput);
        }
        if let Some(index) = outcomes.iter().position(|x| !x.is_finite()) {
            return Err(StatsError::NonFinite { index });
        }

        let min = outcomes.iter().copied().fold(f64::INFINITY, f64::min);
        let max = outcomes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let width = (max - min) / bins as f64;

        let edges = (0..=bins).map(|i| min + width * i as f64).collect();
        let mut counts = vec![0u64; bins];
        for &x in outcomes {
            let idx = if width > 0.0 {
                (((x - min) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Analytic reference
// ═══════════════════════════════════════════════════════════════════════════════

/// Quartiles of a normal distribution, for comparing a simulated summary
/// against its closed-form expectation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub mean: f64,
    pub std_dev: f64,
    pub p25: f64,
    pub p75: f64,
}

impl Reference {
    pub fn spread(&self) -> f64 {
        self.p75 - self.p25
    }
}

/// Mean and quartiles of `Normal(mean, std_dev)`.
///
/// A zero (or negative) standard deviation collapses to a point mass at `mean`.
pub fn normal_reference(mean: f64, std_dev: f64) -> Result<Reference> {
    if !mean.is_finite() {
        return Err(StatsError::NonFinite { index: 0 });
    }
    if !std_dev.is_finite() {
        return Err(StatsError::NonFinite { index: 1 });
    }
    if std_dev <= 0.0 {
        return Ok(Reference {
            mean,
            std_dev: 0.0,
            p25: mean,
            p75: mean,
        });
    }
    let dist = Normal::new(mean, std_dev).map_err(|_| StatsError::NonFinite { index: 1 })?;
    Ok(Reference {
        mean,
        std_dev,
        p25: dist.inverse_cdf(0.25),
        p75: dist.inverse_cdf(0.75),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
