//! Comparison session: the selected factors and up to three choices.
//!
//! The session is an ordinary value owned by whatever front end drives it.
//! Nothing in the engine keeps state between calls.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::choice::Choice;
use crate::comparison::{ChoiceOutcome, ComparisonReport};
use crate::config::{SimulationConfig, ValidationConfig};
use crate::error::{Error, ParameterIssue, Result};
use crate::factor::FactorParams;
use crate::policy::PolicyKind;
use crate::registry::FactorRegistry;
use crate::simulation::run_simulation_with_cancel;

/// Most choices compared side by side.
pub const MAX_CHOICES: usize = 3;

/// Spreads per-choice seeds apart so seeded choices draw independent streams.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    registry: FactorRegistry,
    /// Selected factor names, most important first.
    factors: Vec<String>,
    policy: PolicyKind,
    validation: ValidationConfig,
    choices: Vec<Choice>,
}

impl Session {
    /// Session over every factor in `registry`.
    pub fn new(registry: FactorRegistry, policy: PolicyKind) -> Self {
        let factors = registry.default_factors().to_vec();
        Self {
            registry,
            factors,
            policy,
            validation: ValidationConfig::default(),
            choices: Vec::new(),
        }
    }

    /// Validation rules for choices added from now on.
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    pub fn registry(&self) -> &FactorRegistry {
        &self.registry
    }

    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    pub fn policy(&self) -> PolicyKind {
        self.policy
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Narrow the comparison to a curated factor list (first = rank 1).
    ///
    /// Existing choices are rebuilt over the new list: factors they already
    /// had keep their values, new ones start from presets, and ranks follow
    /// the new order.
    pub fn select_factors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let selected = self.registry.select(names)?;
        let mut rebuilt = Vec::with_capacity(self.choices.len());
        for old in &self.choices {
            let mut choice = Choice::with_config(
                old.title(),
                selected.iter().cloned(),
                self.policy,
                *old.validation(),
            )?;
            choice.apply_presets()?;
            for factor in old.factors() {
                if choice.factor(&factor.name).is_some() {
                    let params = FactorParams {
                        cases: factor.cases(),
                        probabilities: factor.probabilities,
                    };
                    choice.set_factor_params(&factor.name, params)?;
                }
            }
            rebuilt.push(choice);
        }
        self.factors = selected;
        self.choices = rebuilt;
        Ok(())
    }

    /// Add a choice over the selected factors, seeded from presets.
    ///
    /// Titles must be non-empty and unique; at most [`MAX_CHOICES`] choices.
    pub fn add_choice(&mut self, title: &str) -> Result<&mut Choice> {
        if self.choices.len() >= MAX_CHOICES {
            return Err(Error::invalid(
                title,
                ParameterIssue::TooManyChoices { max: MAX_CHOICES },
            ));
        }
        if self.choices.iter().any(|c| c.title() == title) {
            return Err(Error::invalid(title, ParameterIssue::DuplicateTitle));
        }
        let mut choice = Choice::with_config(
            title,
            self.factors.iter().cloned(),
            self.policy,
            self.validation,
        )?;
        choice.apply_presets()?;
        self.choices.push(choice);
        let idx = self.choices.len() - 1;
        Ok(&mut self.choices[idx])
    }

    pub fn choice(&self, title: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.title() == title)
    }

    pub fn choice_mut(&mut self, title: &str) -> Result<&mut Choice> {
        self.choices
            .iter_mut()
            .find(|c| c.title() == title)
            .ok_or_else(|| Error::invalid(title, ParameterIssue::UnknownChoice))
    }

    pub fn remove_choice(&mut self, title: &str) -> Result<Choice> {
        let idx = self
            .choices
            .iter()
            .position(|c| c.title() == title)
            .ok_or_else(|| Error::invalid(title, ParameterIssue::UnknownChoice))?;
        Ok(self.choices.remove(idx))
    }

    /// Simulate every choice and rank the results.
    pub fn run(&self, config: &SimulationConfig) -> Result<ComparisonReport> {
        self.run_with_cancel(config, &AtomicBool::new(false))
    }

    /// [`run`](Self::run) honouring a cancellation flag between batches.
    ///
    /// All choices are validated before any of them is simulated.
    pub fn run_with_cancel(
        &self,
        config: &SimulationConfig,
        cancel: &AtomicBool,
    ) -> Result<ComparisonReport> {
        if self.choices.is_empty() {
            return Err(Error::EmptyInput("choices"));
        }
        for choice in &self.choices {
            choice.validate()?;
        }

        let mut results = Vec::with_capacity(self.choices.len());
        for (i, choice) in self.choices.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled { completed_trials: 0 });
            }
            let choice_config = SimulationConfig {
                seed: config
                    .seed
                    .map(|s| s ^ SEED_STRIDE.wrapping_mul(i as u64 + 1)),
                ..*config
            };
            let policy = choice.policy().policy();
            let outcomes = run_simulation_with_cancel(choice, policy, &choice_config, cancel)?;
            results.push(ChoiceOutcome::new(choice.title(), choice.policy(), outcomes)?);
        }
        let report = ComparisonReport::from_results(results)?;
        log::debug!(
            "compared {} choices over {} factors; best mean: {}",
            report.results.len(),
            self.factors.len(),
            report.by_mean.first().map(String::as_str).unwrap_or("-")
        );
        Ok(report)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FactorRegistry::standard(), PolicyKind::Continuous)
    }
}
