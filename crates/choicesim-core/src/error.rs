//! Structured error values for the scoring engine.
//!
//! Nothing here is process-fatal: every variant describes input the caller can
//! correct and retry. Validation runs when a factor is mutated and again before
//! a simulation starts, never mid-run.

use serde::Serialize;

use crate::policy::PolicyKind;

/// What was wrong with a rejected parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ParameterIssue {
    /// A case value or probability lies outside its allowed range.
    OutOfBounds { value: f64, min: f64, max: f64 },
    /// The probability triple does not sum to 1.0 within tolerance.
    ProbabilitySum { sum: f64, tolerance: f64 },
    /// Continuous-policy ordering `worst <= base <= best` is violated.
    CaseOrder { worst: f64, base: f64, best: f64 },
    /// Ranks start at 1.
    ZeroRank,
    /// Simulations need at least one trial.
    ZeroTrials,
    EmptyName,
    DuplicateTitle,
    UnknownFactor,
    DuplicateFactor,
    NoFactorsSelected,
    TooManyFactors { max: usize },
    TooManyChoices { max: usize },
    UnknownChoice,
}

impl std::fmt::Display for ParameterIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds { value, min, max } => {
                write!(f, "{value} outside [{min}, {max}]")
            }
            Self::ProbabilitySum { sum, tolerance } => {
                write!(f, "probabilities sum to {sum}, expected 1 +/- {tolerance}")
            }
            Self::CaseOrder { worst, base, best } => {
                write!(f, "expected worst <= base <= best, got {worst}, {base}, {best}")
            }
            Self::ZeroRank => write!(f, "rank must be at least 1"),
            Self::ZeroTrials => write!(f, "trial count must be at least 1"),
            Self::EmptyName => write!(f, "name is empty"),
            Self::DuplicateTitle => write!(f, "title already in use"),
            Self::UnknownFactor => write!(f, "unknown factor"),
            Self::DuplicateFactor => write!(f, "factor listed twice"),
            Self::NoFactorsSelected => write!(f, "no factors selected"),
            Self::TooManyFactors { max } => write!(f, "at most {max} factors"),
            Self::TooManyChoices { max } => write!(f, "at most {max} choices"),
            Self::UnknownChoice => write!(f, "unknown choice"),
        }
    }
}

/// Engine errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A value is out of bounds, a probability triple is malformed, or an
    /// identifier is missing or duplicated.
    #[error("invalid parameter `{subject}`: {issue}")]
    InvalidParameter {
        subject: String,
        issue: ParameterIssue,
    },

    /// The factor lacks fields the sampling policy needs.
    #[error("factor `{factor}` cannot be sampled by the {policy} policy")]
    InvalidFactorState { factor: String, policy: PolicyKind },

    /// Nothing to simulate or summarize.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// A cancellation signal was observed between batches.
    #[error("simulation cancelled after {completed_trials} trials")]
    Cancelled { completed_trials: usize },

    #[error(transparent)]
    Stats(choicesim_stats::StatsError),
}

impl From<choicesim_stats::StatsError> for Error {
    fn from(err: choicesim_stats::StatsError) -> Self {
        match err {
            choicesim_stats::StatsError::EmptyInput => Self::EmptyInput("outcomes"),
            other => Self::Stats(other),
        }
    }
}

impl Error {
    pub(crate) fn invalid(subject: impl Into<String>, issue: ParameterIssue) -> Self {
        Self::InvalidParameter {
            subject: subject.into(),
            issue,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
