//! Validation and simulation settings.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ParameterIssue, Result};

/// Default values shared by the config structs.
pub mod defaults {
    /// Lower bound of the satisfaction scale.
    pub const VALUE_MIN: f64 = 0.0;
    /// Upper bound of the satisfaction scale.
    pub const VALUE_MAX: f64 = 3.0;
    /// Absolute tolerance on `prob_base + prob_best + prob_worst == 1`.
    pub const PROBABILITY_TOLERANCE: f64 = 1e-6;
    pub const NUM_TRIALS: usize = 10_000;
    /// Trials per RNG stream. Each batch is one unit of parallel work.
    pub const BATCH_SIZE: usize = 1_024;
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Closed numeric range for case values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Finite and within `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// Pull `value` into the range. Inverted bounds leave it unchanged.
    pub fn clamp(&self, value: f64) -> f64 {
        if self.min <= self.max {
            value.clamp(self.min, self.max)
        } else {
            value
        }
    }

    /// `Ok(())` if `value` lies in the range, otherwise `InvalidParameter`
    /// naming `subject`.
    pub(crate) fn check(&self, subject: &str, value: f64) -> Result<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(Error::invalid(
                subject,
                ParameterIssue::OutOfBounds {
                    value,
                    min: self.min,
                    max: self.max,
                },
            ))
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(defaults::VALUE_MIN, defaults::VALUE_MAX)
    }
}

// ---------------------------------------------------------------------------
// Validation config
// ---------------------------------------------------------------------------

/// Rules applied when factor parameters are set and before a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Allowed range for base/best/worst case values.
    pub value_bounds: Bounds,
    /// Absolute tolerance for the probability-sum check.
    pub probability_tolerance: f64,
    /// Reject probability triples that do not sum to 1. When off, the discrete
    /// policy samples against whatever thresholds the triple yields.
    pub enforce_probability_sum: bool,
    /// Reject `worst <= base <= best` violations under the continuous policy.
    pub enforce_case_order: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            value_bounds: Bounds::default(),
            probability_tolerance: defaults::PROBABILITY_TOLERANCE,
            enforce_probability_sum: true,
            enforce_case_order: true,
        }
    }
}

impl ValidationConfig {
    /// Unbounded values, no ordering or probability-sum checks. Only NaN is
    /// still rejected.
    pub fn permissive() -> Self {
        Self {
            value_bounds: Bounds::new(f64::NEG_INFINITY, f64::INFINITY),
            enforce_probability_sum: false,
            enforce_case_order: false,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

/// Parameters of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub num_trials: usize,
    /// Fixed seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Spread batches over the rayon thread pool.
    pub parallel: bool,
    pub batch_size: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_trials: defaults::NUM_TRIALS,
            seed: None,
            parallel: true,
            batch_size: defaults::BATCH_SIZE,
        }
    }
}

impl SimulationConfig {
    pub fn with_trials(num_trials: usize) -> Self {
        Self {
            num_trials,
            ..Self::default()
        }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
