//! Sampling policies: how one factor turns into one random value.
//!
//! Two interchangeable strategies sit behind the [`SamplingPolicy`] trait:
//!
//! - **Continuous**: a normal distribution blended from the three estimates.
//!   `mean = (base + worst + best) / 3` and `std_dev = (best - worst) / 6`, so
//!   best and worst act as rough three-sigma bounds. This is a deliberately
//!   simple approximation, not a PERT fit.
//! - **Discrete**: a three-outcome categorical draw using the factor's explicit
//!   probabilities and a single uniform number.
//!
//! [`PolicyKind`] is the serializable selector a [`Choice`](crate::Choice)
//! stores; it resolves to a static policy instance.

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::factor::{Factor, OutcomeProbabilities};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Strategy that draws one sample value for one factor.
pub trait SamplingPolicy: Send + Sync {
    fn kind(&self) -> PolicyKind;

    /// Fail with `InvalidFactorState` if `factor` lacks fields this policy reads.
    fn check(&self, factor: &Factor) -> Result<()>;

    /// Draw one value for `factor`.
    fn sample(&self, factor: &Factor, rng: &mut dyn RngCore) -> Result<f64>;

    /// Expected value of [`sample`](Self::sample).
    fn expected_value(&self, factor: &Factor) -> Result<f64>;

    /// Variance of [`sample`](Self::sample).
    fn variance(&self, factor: &Factor) -> Result<f64>;
}

/// Which sampling policy a choice uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Continuous,
    Discrete,
}

impl PolicyKind {
    /// The shared policy instance for this kind.
    pub fn policy(self) -> &'static dyn SamplingPolicy {
        match self {
            Self::Continuous => &Continuous,
            Self::Discrete => &Discrete,
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continuous => write!(f, "continuous"),
            Self::Discrete => write!(f, "discrete"),
        }
    }
}

impl SamplingPolicy for PolicyKind {
    fn kind(&self) -> PolicyKind {
        *self
    }

    fn check(&self, factor: &Factor) -> Result<()> {
        self.policy().check(factor)
    }

    fn sample(&self, factor: &Factor, rng: &mut dyn RngCore) -> Result<f64> {
        self.policy().sample(factor, rng)
    }

    fn expected_value(&self, factor: &Factor) -> Result<f64> {
        self.policy().expected_value(factor)
    }

    fn variance(&self, factor: &Factor) -> Result<f64> {
        self.policy().variance(factor)
    }
}

// ---------------------------------------------------------------------------
// Continuous
// ---------------------------------------------------------------------------

/// Normal distribution derived from `(base, worst, best)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Continuous;

impl Continuous {
    /// `(mean, std_dev)` for the given estimates, always in (base, worst, best)
    /// order. A reversed best/worst pair (only possible with ordering checks
    /// off) yields the same spread as the ordered pair.
    pub fn normal_params(base: f64, worst: f64, best: f64) -> (f64, f64) {
        // Three equal estimates: return the value itself, not a rounded blend.
        if base == worst && worst == best {
            return (base, 0.0);
        }
        let mean = (base + worst + best) / 3.0;
        let std_dev = ((best - worst) / 6.0).abs();
        (mean, std_dev)
    }

    fn params_of(factor: &Factor) -> (f64, f64) {
        Self::normal_params(factor.base_case, factor.worst_case, factor.best_case)
    }
}

impl SamplingPolicy for Continuous {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Continuous
    }

    /// Finite inputs can still overflow the blend (e.g. `best = 1e308`,
    /// `worst = -1e308`); reject those before any draw.
    fn check(&self, factor: &Factor) -> Result<()> {
        let (mean, std_dev) = Self::params_of(factor);
        if mean.is_finite() && std_dev.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidFactorState {
                factor: factor.name.clone(),
                policy: PolicyKind::Continuous,
            })
        }
    }

    fn sample(&self, factor: &Factor, rng: &mut dyn RngCore) -> Result<f64> {
        let (mean, std_dev) = Self::params_of(factor);
        // Zero spread is a point mass; skip the draw so the result is exact.
        if std_dev == 0.0 {
            return Ok(mean);
        }
        let normal = Normal::new(mean, std_dev).map_err(|_| Error::InvalidFactorState {
            factor: factor.name.clone(),
            policy: PolicyKind::Continuous,
        })?;
        Ok(normal.sample(rng))
    }

    fn expected_value(&self, factor: &Factor) -> Result<f64> {
        Ok(Self::params_of(factor).0)
    }

    fn variance(&self, factor: &Factor) -> Result<f64> {
        let std_dev = Self::params_of(factor).1;
        Ok(std_dev * std_dev)
    }
}

// ---------------------------------------------------------------------------
// Discrete
// ---------------------------------------------------------------------------

/// Three-outcome categorical draw.
///
/// One uniform `u` in `[0, 1)`: `u < p_best` gives best, `u < p_best + p_base`
/// gives base, anything else gives worst. A triple that does not sum to 1 is
/// not an error here; the comparisons simply run against the thresholds it
/// produces (see [`Discrete::effective_weights`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct Discrete;

impl Discrete {
    /// Probabilities the draw actually realises for `(best, base, worst)`.
    ///
    /// With a triple summing to 1 these equal the inputs. Otherwise worst
    /// absorbs the gap, or base and worst are truncated when the first two
    /// thresholds already reach 1.
    pub fn effective_weights(p: &OutcomeProbabilities) -> (f64, f64, f64) {
        let best_cut = p.best.clamp(0.0, 1.0);
        let base_cut = (p.best + p.base).clamp(best_cut, 1.0);
        (best_cut, base_cut - best_cut, 1.0 - base_cut)
    }

    fn probabilities_of(factor: &Factor) -> Result<&OutcomeProbabilities> {
        factor
            .probabilities
            .as_ref()
            .ok_or_else(|| Error::InvalidFactorState {
                factor: factor.name.clone(),
                policy: PolicyKind::Discrete,
            })
    }
}

impl SamplingPolicy for Discrete {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Discrete
    }

    fn check(&self, factor: &Factor) -> Result<()> {
        Self::probabilities_of(factor).map(|_| ())
    }

    fn sample(&self, factor: &Factor, rng: &mut dyn RngCore) -> Result<f64> {
        let p = Self::probabilities_of(factor)?;
        let u: f64 = rng.random();
        if u < p.best {
            Ok(factor.best_case)
        } else if u < p.best + p.base {
            Ok(factor.base_case)
        } else {
            Ok(factor.worst_case)
        }
    }

    fn expected_value(&self, factor: &Factor) -> Result<f64> {
        let (best, base, worst) = Self::effective_weights(Self::probabilities_of(factor)?);
        Ok(best * factor.best_case + base * factor.base_case + worst * factor.worst_case)
    }

    fn variance(&self, factor: &Factor) -> Result<f64> {
        let (best, base, worst) = Self::effective_weights(Self::probabilities_of(factor)?);
        let mean = self.expected_value(factor)?;
        let second = best * factor.best_case.powi(2)
            + base * factor.base_case.powi(2)
            + worst * factor.worst_case.powi(2);
        Ok((second - mean * mean).max(0.0))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
