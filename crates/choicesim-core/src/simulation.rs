//! Monte Carlo driver: many independent trials of a choice's total score.
//!
//! One trial draws a sample for every factor, multiplies it by the factor's
//! rank and sums the products. Trials are grouped into fixed-size batches.
//! Each batch owns a `StdRng` seeded from a master generator, so a seeded run
//! produces the same outcome vector whether batches run sequentially or on
//! the rayon pool.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use choicesim_stats::{Reference, normal_reference};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

use crate::choice::Choice;
use crate::config::SimulationConfig;
use crate::error::{Error, ParameterIssue, Result};
use crate::factor::Factor;
use crate::policy::SamplingPolicy;

/// A contiguous run of trials sharing one RNG stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Batch {
    seed: u64,
    len: usize,
}

/// Simulate `config.num_trials` total scores for `choice` under `policy`.
///
/// Everything is validated before the first draw: a zero trial count,
/// an empty factor list, out-of-range values or a factor the policy cannot
/// sample all fail here rather than mid-run.
pub fn run_simulation(
    choice: &Choice,
    policy: &dyn SamplingPolicy,
    config: &SimulationConfig,
) -> Result<Vec<f64>> {
    run_simulation_with_cancel(choice, policy, config, &AtomicBool::new(false))
}

/// [`run_simulation`] that checks `cancel` before every batch.
///
/// Returns [`Error::Cancelled`] with the number of trials that finished.
pub fn run_simulation_with_cancel(
    choice: &Choice,
    policy: &dyn SamplingPolicy,
    config: &SimulationConfig,
    cancel: &AtomicBool,
) -> Result<Vec<f64>> {
    preflight(choice, policy, config)?;

    let batches = plan_batches(config);
    let factors = choice.factors();
    let completed = AtomicUsize::new(0);
    let t0 = Instant::now();

    log::debug!(
        "simulating '{}': {} trials, {} factors, {} policy, {} batches{}",
        choice.title(),
        config.num_trials,
        factors.len(),
        policy.kind(),
        batches.len(),
        if config.parallel { " (parallel)" } else { "" },
    );

    let run_batch = |batch: &Batch| -> Result<Vec<f64>> {
        if cancel.load(Ordering::Relaxed) {
            return Err(Error::Cancelled { completed_trials: 0 });
        }
        let mut rng = StdRng::seed_from_u64(batch.seed);
        let mut totals = Vec::with_capacity(batch.len);
        for _ in 0..batch.len {
            totals.push(trial(factors, policy, &mut rng)?);
        }
        completed.fetch_add(batch.len, Ordering::Relaxed);
        log::trace!("batch of {} trials done", batch.len);
        Ok(totals)
    };

    let result: Result<Vec<Vec<f64>>> = if config.parallel {
        batches.par_iter().map(&run_batch).collect()
    } else {
        batches.iter().map(&run_batch).collect()
    };

    match result {
        Ok(chunks) => {
            let outcomes = chunks.concat();
            log::debug!(
                "simulated '{}': {} outcomes in {:.1}ms",
                choice.title(),
                outcomes.len(),
                t0.elapsed().as_secs_f64() * 1000.0
            );
            Ok(outcomes)
        }
        Err(Error::Cancelled { .. }) => {
            let completed_trials = completed.load(Ordering::Relaxed);
            log::warn!(
                "simulation of '{}' cancelled after {completed_trials}/{} trials",
                choice.title(),
                config.num_trials
            );
            Err(Error::Cancelled { completed_trials })
        }
        Err(e) => Err(e),
    }
}

/// One weighted total: `sum(rank * sample)` over `factors`, in order.
pub fn trial(
    factors: &[Factor],
    policy: &dyn SamplingPolicy,
    rng: &mut dyn RngCore,
) -> Result<f64> {
    let mut total = 0.0;
    for factor in factors {
        total += f64::from(factor.rank) * policy.sample(factor, rng)?;
    }
    Ok(total)
}

fn preflight(
    choice: &Choice,
    policy: &dyn SamplingPolicy,
    config: &SimulationConfig,
) -> Result<()> {
    if config.num_trials == 0 {
        return Err(Error::invalid("num_trials", ParameterIssue::ZeroTrials));
    }
    choice.validate_for(policy.kind())?;
    for factor in choice.factors() {
        policy.check(factor)?;
    }
    Ok(())
}

fn plan_batches(config: &SimulationConfig) -> Vec<Batch> {
    let batch_size = config.batch_size.max(1);
    let mut master = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut remaining = config.num_trials;
    let mut batches = Vec::with_capacity(config.num_trials.div_ceil(batch_size));
    while remaining > 0 {
        let len = remaining.min(batch_size);
        batches.push(Batch {
            seed: master.random(),
            len,
        });
        remaining -= len;
    }
    batches
}

// ---------------------------------------------------------------------------
// Analytic moments
// ---------------------------------------------------------------------------

/// Expected total score: `sum(rank * E[sample])`.
pub fn expected_total(choice: &Choice, policy: &dyn SamplingPolicy) -> Result<f64> {
    choice.factors().iter().try_fold(0.0, |acc, f| {
        Ok(acc + f64::from(f.rank) * policy.expected_value(f)?)
    })
}

/// Variance of the total score: `sum(rank^2 * Var[sample])`. Factor draws are
/// independent, so the variances add.
pub fn total_variance(choice: &Choice, policy: &dyn SamplingPolicy) -> Result<f64> {
    choice.factors().iter().try_fold(0.0, |acc, f| {
        let w = f64::from(f.rank);
        Ok(acc + w * w * policy.variance(f)?)
    })
}

/// Normal approximation of the total score's distribution.
///
/// Exact for the continuous policy (a weighted sum of normals is normal); a
/// central-limit approximation for the discrete one.
pub fn analytic_reference(choice: &Choice, policy: &dyn SamplingPolicy) -> Result<Reference> {
    choice.validate_for(policy.kind())?;
    let mean = expected_total(choice, policy)?;
    let std_dev = total_variance(choice, policy)?.sqrt();
    Ok(normal_reference(mean, std_dev)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
