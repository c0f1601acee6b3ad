//! Side-by-side results for several simulated choices.

use choicesim_stats::{Histogram, Summary, rank_by_mean, rank_by_spread, summarize};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::policy::PolicyKind;

/// Outcome vector and summary for one choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOutcome {
    pub title: String,
    pub policy: PolicyKind,
    pub outcomes: Vec<f64>,
    pub summary: Summary,
}

impl ChoiceOutcome {
    pub fn new(title: impl Into<String>, policy: PolicyKind, outcomes: Vec<f64>) -> Result<Self> {
        let summary = summarize(&outcomes)?;
        Ok(Self {
            title: title.into(),
            policy,
            outcomes,
            summary,
        })
    }

    /// Equal-width histogram of this choice's outcomes.
    pub fn histogram(&self, bins: usize) -> Result<Histogram> {
        Ok(Histogram::from_outcomes(&self.outcomes, bins)?)
    }
}

/// Results of simulating every choice in a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// In the order the choices were added.
    pub results: Vec<ChoiceOutcome>,
    /// Lowest outcome across every choice (shared axis range).
    pub global_min: f64,
    /// Highest outcome across every choice.
    pub global_max: f64,
    /// Titles, highest mean first.
    pub by_mean: Vec<String>,
    /// Titles, narrowest interquartile spread first.
    pub by_spread: Vec<String>,
}

impl ComparisonReport {
    pub fn from_results(results: Vec<ChoiceOutcome>) -> Result<Self> {
        if results.is_empty() {
            return Err(Error::EmptyInput("choices"));
        }
        let global_min = results
            .iter()
            .map(|r| r.summary.min)
            .fold(f64::INFINITY, f64::min);
        let global_max = results
            .iter()
            .map(|r| r.summary.max)
            .fold(f64::NEG_INFINITY, f64::max);

        let summaries: Vec<(&str, Summary)> = results
            .iter()
            .map(|r| (r.title.as_str(), r.summary))
            .collect();
        let by_mean = rank_by_mean(&summaries);
        let by_spread = rank_by_spread(&summaries);

        Ok(Self {
            results,
            global_min,
            global_max,
            by_mean,
            by_spread,
        })
    }

    pub fn get(&self, title: &str) -> Option<&ChoiceOutcome> {
        self.results.iter().find(|r| r.title == title)
    }

    pub fn summaries(&self) -> Vec<(String, Summary)> {
        self.results
            .iter()
            .map(|r| (r.title.clone(), r.summary))
            .collect()
    }
}
