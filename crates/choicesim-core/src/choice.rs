//! One option under comparison and the factors it owns.

use serde::Serialize;

use crate::config::{SimulationConfig, ValidationConfig};
use crate::error::{Error, ParameterIssue, Result};
use crate::factor::{Factor, FactorParams};
use crate::policy::PolicyKind;
use crate::presets;
use crate::registry::FactorRegistry;

/// An option being weighed, e.g. a specific job or city.
///
/// Each choice owns an independent copy of its factors. The sampling policy is
/// fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    title: String,
    policy: PolicyKind,
    factors: Vec<Factor>,
    validation: ValidationConfig,
}

impl Choice {
    /// Create a choice with one templated factor per name. Ranks follow the
    /// given order, starting at 1.
    pub fn new<I, S>(title: impl Into<String>, names: I, policy: PolicyKind) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(title, names, policy, ValidationConfig::default())
    }

    pub fn with_config<I, S>(
        title: impl Into<String>,
        names: I,
        policy: PolicyKind,
        validation: ValidationConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(Error::invalid("title", ParameterIssue::EmptyName));
        }

        let mut factors: Vec<Factor> = Vec::new();
        for name in names {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(Error::invalid("factor", ParameterIssue::EmptyName));
            }
            if factors.iter().any(|f| f.name == name) {
                return Err(Error::invalid(name, ParameterIssue::DuplicateFactor));
            }
            let mut factor = Factor::template(name, policy);
            factor.rank = factors.len() as u32 + 1;
            factors.push(factor);
        }

        Ok(Self {
            title,
            policy,
            factors,
            validation,
        })
    }

    /// Choice over every factor in `registry`.
    pub fn from_registry(
        title: impl Into<String>,
        registry: &FactorRegistry,
        policy: PolicyKind,
    ) -> Result<Self> {
        Self::new(title, registry.default_factors().iter().cloned(), policy)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn policy(&self) -> PolicyKind {
        self.policy
    }

    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    pub fn factor(&self, name: &str) -> Option<&Factor> {
        self.factors.iter().find(|f| f.name == name)
    }

    pub fn factor_count(&self) -> usize {
        self.factors.len()
    }

    /// Sum of all ranks.
    pub fn weight_total(&self) -> u64 {
        self.factors.iter().map(|f| u64::from(f.rank)).sum()
    }

    fn factor_mut(&mut self, name: &str) -> Result<&mut Factor> {
        self.factors
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::invalid(name, ParameterIssue::UnknownFactor))
    }

    /// Replace one factor's case values (and probabilities, if given).
    ///
    /// Out-of-range values, a probability triple off 1.0 by more than the
    /// tolerance, or misordered cases under the continuous policy are rejected
    /// with `InvalidParameter` and leave the factor unchanged.
    pub fn set_factor_params(&mut self, name: &str, params: impl Into<FactorParams>) -> Result<()> {
        let params = params.into();
        let policy = self.policy;
        let validation = self.validation;
        self.factor_mut(name)?.apply(&params, policy, &validation)
    }

    /// Reassign a factor's weight. Ranks need not be unique but must be >= 1.
    pub fn set_rank(&mut self, name: &str, rank: u32) -> Result<()> {
        if rank == 0 {
            return Err(Error::invalid(name, ParameterIssue::ZeroRank));
        }
        self.factor_mut(name)?.rank = rank;
        Ok(())
    }

    /// Seed every factor from the preset table for this title.
    ///
    /// Preset values are clamped into the choice's value bounds, so a
    /// narrower scale still accepts them. Discrete factors whose
    /// probabilities are still zeroed also receive
    /// [`presets::DEFAULT_PROBABILITIES`]. Returns how many factors had a
    /// title-specific preset.
    pub fn apply_presets(&mut self) -> Result<usize> {
        let mut matched = 0;
        let names: Vec<String> = self.factors.iter().map(|f| f.name.clone()).collect();
        for name in names {
            let preset = presets::lookup(&self.title, &name);
            if preset.is_some() {
                matched += 1;
            }
            let cases = preset
                .unwrap_or(presets::DEFAULT_CASES)
                .clamped(&self.validation.value_bounds);
            let unset = self
                .factor(&name)
                .and_then(|f| f.probabilities)
                .is_none_or(|p| p.sum() == 0.0);
            let probabilities = (self.policy == PolicyKind::Discrete && unset)
                .then_some(presets::DEFAULT_PROBABILITIES);
            self.set_factor_params(
                &name,
                FactorParams {
                    cases,
                    probabilities,
                },
            )?;
        }
        Ok(matched)
    }

    /// Pre-run check: at least one factor, every factor valid for this
    /// choice's policy and validation rules.
    pub fn validate(&self) -> Result<()> {
        self.validate_for(self.policy)
    }

    /// Like [`validate`](Self::validate), but against another policy.
    pub fn validate_for(&self, policy: PolicyKind) -> Result<()> {
        if self.factors.is_empty() {
            return Err(Error::EmptyInput("factors"));
        }
        for factor in &self.factors {
            if factor.rank == 0 {
                return Err(Error::invalid(factor.name.clone(), ParameterIssue::ZeroRank));
            }
            factor.validate(policy, &self.validation)?;
            policy.policy().check(factor)?;
        }
        Ok(())
    }

    /// Run a simulation with this choice's own policy.
    pub fn simulate(&self, config: &SimulationConfig) -> Result<Vec<f64>> {
        crate::simulation::run_simulation(self, self.policy.policy(), config)
    }
}
