//! Factor data model: one weighted dimension of comparison.

use serde::{Deserialize, Serialize};

use crate::config::{Bounds, ValidationConfig};
use crate::error::{Error, ParameterIssue, Result};
use crate::policy::PolicyKind;

/// Typical, optimistic and pessimistic satisfaction estimates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CaseValues {
    pub base: f64,
    pub best: f64,
    pub worst: f64,
}

impl CaseValues {
    pub const fn new(base: f64, best: f64, worst: f64) -> Self {
        Self { base, best, worst }
    }

    /// Each value pulled into `bounds`. Ordering between the cases is kept.
    pub fn clamped(self, bounds: &Bounds) -> Self {
        Self::new(
            bounds.clamp(self.base),
            bounds.clamp(self.best),
            bounds.clamp(self.worst),
        )
    }

    /// Same value in every case: a factor with no uncertainty.
    pub const fn certain(value: f64) -> Self {
        Self::new(value, value, value)
    }
}

/// Explicit outcome probabilities for the discrete policy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub base: f64,
    pub best: f64,
    pub worst: f64,
}

impl OutcomeProbabilities {
    pub const fn new(base: f64, best: f64, worst: f64) -> Self {
        Self { base, best, worst }
    }

    pub fn sum(&self) -> f64 {
        self.base + self.best + self.worst
    }

    fn check(&self, factor: &str, config: &ValidationConfig) -> Result<()> {
        let labelled = [
            ("prob_base", self.base),
            ("prob_best", self.best),
            ("prob_worst", self.worst),
        ];
        for (label, p) in labelled {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::invalid(
                    format!("{factor}.{label}"),
                    ParameterIssue::OutOfBounds {
                        value: p,
                        min: 0.0,
                        max: 1.0,
                    },
                ));
            }
        }
        let sum = self.sum();
        if config.enforce_probability_sum && (sum - 1.0).abs() > config.probability_tolerance {
            return Err(Error::invalid(
                format!("{factor}.probabilities"),
                ParameterIssue::ProbabilitySum {
                    sum,
                    tolerance: config.probability_tolerance,
                },
            ));
        }
        Ok(())
    }
}

/// New values for one factor. `probabilities: None` leaves the factor's
/// current triple in place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FactorParams {
    pub cases: CaseValues,
    pub probabilities: Option<OutcomeProbabilities>,
}

impl FactorParams {
    pub fn continuous(base: f64, best: f64, worst: f64) -> Self {
        Self {
            cases: CaseValues::new(base, best, worst),
            probabilities: None,
        }
    }

    pub fn discrete(cases: CaseValues, probabilities: OutcomeProbabilities) -> Self {
        Self {
            cases,
            probabilities: Some(probabilities),
        }
    }
}

impl From<CaseValues> for FactorParams {
    fn from(cases: CaseValues) -> Self {
        Self {
            cases,
            probabilities: None,
        }
    }
}

/// A weighted factor with uncertain outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    /// Weight multiplying the sampled value in the total score.
    pub rank: u32,
    pub base_case: f64,
    pub best_case: f64,
    pub worst_case: f64,
    /// Present only for factors sampled by the discrete policy.
    pub probabilities: Option<OutcomeProbabilities>,
}

impl Factor {
    /// Zeroed template with rank 0. Discrete factors carry a zeroed probability
    /// triple, which must be filled in before a run.
    pub fn template(name: impl Into<String>, policy: PolicyKind) -> Self {
        Self {
            name: name.into(),
            rank: 0,
            base_case: 0.0,
            best_case: 0.0,
            worst_case: 0.0,
            probabilities: match policy {
                PolicyKind::Continuous => None,
                PolicyKind::Discrete => Some(OutcomeProbabilities::default()),
            },
        }
    }

    pub fn cases(&self) -> CaseValues {
        CaseValues::new(self.base_case, self.best_case, self.worst_case)
    }

    /// Check case values, ordering and probabilities against `config`.
    pub fn validate(&self, policy: PolicyKind, config: &ValidationConfig) -> Result<()> {
        check_params(&self.name, &self.cases(), self.probabilities.as_ref(), policy, config)
    }

    /// Validate `params`, then replace this factor's values. A rejected update
    /// leaves the factor unchanged.
    pub(crate) fn apply(
        &mut self,
        params: &FactorParams,
        policy: PolicyKind,
        config: &ValidationConfig,
    ) -> Result<()> {
        let probabilities = params.probabilities.or(self.probabilities);
        check_params(&self.name, &params.cases, probabilities.as_ref(), policy, config)?;
        self.base_case = params.cases.base;
        self.best_case = params.cases.best;
        self.worst_case = params.cases.worst;
        self.probabilities = probabilities;
        Ok(())
    }
}

fn check_params(
    name: &str,
    cases: &CaseValues,
    probabilities: Option<&OutcomeProbabilities>,
    policy: PolicyKind,
    config: &ValidationConfig,
) -> Result<()> {
    let bounds = &config.value_bounds;
    bounds.check(&format!("{name}.base_case"), cases.base)?;
    bounds.check(&format!("{name}.best_case"), cases.best)?;
    bounds.check(&format!("{name}.worst_case"), cases.worst)?;

    if policy == PolicyKind::Continuous
        && config.enforce_case_order
        && !(cases.worst <= cases.base && cases.base <= cases.best)
    {
        return Err(Error::invalid(
            name,
            ParameterIssue::CaseOrder {
                worst: cases.worst,
                base: cases.base,
                best: cases.best,
            },
        ));
    }

    match (probabilities, policy) {
        (Some(p), _) => p.check(name, config),
        (None, PolicyKind::Discrete) => Err(Error::InvalidFactorState {
            factor: name.to_string(),
            policy,
        }),
        (None, PolicyKind::Continuous) => Ok(()),
    }
}
