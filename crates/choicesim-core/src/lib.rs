//! # choicesim-core
//!
//! **Score a handful of life or career options under uncertainty.**
//!
//! Each option (a [`Choice`]) is broken into weighted factors such as pay,
//! location or community. For every factor the user gives a typical, an
//! optimistic and a pessimistic estimate. The engine draws many randomized
//! trials per choice, combines one sample per factor into a rank-weighted
//! total, and summarizes the resulting score distribution so the options can
//! be ranked by mean and by spread.
//!
//! ## Quick Start
//!
//! ```
//! use choicesim_core::{CaseValues, Choice, PolicyKind, SimulationConfig};
//!
//! let mut job = Choice::new("Tech in DC", ["Pay", "Community"], PolicyKind::Continuous)?;
//! job.set_factor_params("Pay", CaseValues::new(1.5, 2.5, 0.5))?;
//! job.set_factor_params("Community", CaseValues::new(2.0, 2.5, 1.5))?;
//!
//! let outcomes = job.simulate(&SimulationConfig::with_trials(5_000).seeded(1))?;
//! let summary = choicesim_core::summarize(&outcomes)?;
//! assert_eq!(summary.count, 5_000);
//! # Ok::<(), choicesim_core::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Factor registry → Choice (owns its factors) → Sampling policy →
//! Simulation driver → Summary statistics → Rankings
//!
//! Two sampling policies:
//! - **Continuous**: normal distribution with `mean = (base + worst + best) / 3`
//!   and `std_dev = (best - worst) / 6`.
//! - **Discrete**: categorical draw over best/base/worst with explicit
//!   probabilities.
//!
//! The random source is always explicit: seed a run through
//! [`SimulationConfig::seed`] to make it reproducible.

pub mod choice;
pub mod comparison;
pub mod config;
pub mod error;
pub mod factor;
pub mod policy;
pub mod presets;
pub mod registry;
pub mod session;
pub mod simulation;

pub use choice::Choice;
pub use choicesim_stats::{
    Histogram, Reference, StatsError, Summary, normal_reference, percentile, rank_by_mean,
    rank_by_spread, summarize,
};
pub use comparison::{ChoiceOutcome, ComparisonReport};
pub use config::{Bounds, SimulationConfig, ValidationConfig};
pub use error::{Error, ParameterIssue, Result};
pub use factor::{CaseValues, Factor, FactorParams, OutcomeProbabilities};
pub use policy::{Continuous, Discrete, PolicyKind, SamplingPolicy};
pub use registry::{FactorRegistry, MAX_SELECTED_FACTORS};
pub use session::{MAX_CHOICES, Session};
pub use simulation::{
    analytic_reference, expected_total, run_simulation, run_simulation_with_cancel,
    total_variance,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
