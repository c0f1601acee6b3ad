//! Integration tests for choicesim-core.
//!
//! These exercise the full pipeline:
//! registry → choice → sampling policy → simulation → summary → rankings.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use choicesim_core::{
    CaseValues, Choice, Continuous, Discrete, Error, Factor, FactorParams, FactorRegistry,
    OutcomeProbabilities, ParameterIssue, PolicyKind, SamplingPolicy, Session, SimulationConfig,
    ValidationConfig, analytic_reference, rank_by_mean, run_simulation,
    run_simulation_with_cancel, summarize,
};
use rand::RngCore;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn single_factor(title: &str, rank: u32, cases: CaseValues) -> Choice {
    let mut c = Choice::new(title, ["Pay"], PolicyKind::Continuous).unwrap();
    c.set_factor_params("Pay", cases).unwrap();
    c.set_rank("Pay", rank).unwrap();
    c
}

#[test]
fn outcome_vector_has_requested_length() {
    init_logging();
    let c = single_factor("A", 1, CaseValues::new(1.5, 2.5, 0.5));
    for n in [1, 999, 10_000] {
        let out = c.simulate(&SimulationConfig::with_trials(n)).unwrap();
        assert_eq!(out.len(), n);
    }
}

#[test]
fn zero_variance_totals_are_exact() {
    init_logging();
    let values = [("Pay", 2.35), ("Community", 0.1), ("Health", 1.7)];
    let mut c = Choice::new("Certain", values.map(|(n, _)| n), PolicyKind::Continuous).unwrap();
    for (name, x) in values {
        c.set_factor_params(name, CaseValues::certain(x)).unwrap();
    }
    c.set_rank("Health", 5).unwrap();

    let expected: f64 = c
        .factors()
        .iter()
        .map(|f| f64::from(f.rank) * f.base_case)
        .fold(0.0, |acc, x| acc + x);

    let out = c.simulate(&SimulationConfig::with_trials(2_000)).unwrap();
    assert!(out.iter().all(|&t| t == expected), "expected every total to be {expected}");
}

#[test]
fn discrete_degenerate_base_probability() {
    init_logging();
    let mut c = Choice::new("D", ["Pay", "Pet"], PolicyKind::Discrete).unwrap();
    let certain_base = OutcomeProbabilities::new(1.0, 0.0, 0.0);
    c.set_factor_params(
        "Pay",
        FactorParams::discrete(CaseValues::new(1.25, 3.0, 0.0), certain_base),
    )
    .unwrap();
    c.set_factor_params(
        "Pet",
        FactorParams::discrete(CaseValues::new(0.75, 2.0, 0.5), certain_base),
    )
    .unwrap();

    let out = c.simulate(&SimulationConfig::with_trials(5_000)).unwrap();
    assert!(out.iter().all(|&t| t == 1.25 + 2.0 * 0.75));
}

#[test]
fn summarize_rejects_empty_outcomes() {
    assert!(summarize(&[]).is_err());
    let err: Error = summarize(&[]).unwrap_err().into();
    assert_eq!(err, Error::EmptyInput("outcomes"));
}

#[test]
fn summary_of_simulation_ignores_order() {
    let c = single_factor("A", 1, CaseValues::new(1.5, 2.5, 0.5));
    let mut out = c
        .simulate(&SimulationConfig::with_trials(3_000).seeded(5))
        .unwrap();
    let before = summarize(&out).unwrap();
    out.reverse();
    out.rotate_left(1_234);
    assert_eq!(summarize(&out).unwrap(), before);
}

/// Probability triples are checked when set. The original form only displayed
/// the sum; enforcing it is deliberate and can be switched off.
#[test]
fn probability_sum_enforcement_is_explicit() {
    let bad = FactorParams::discrete(
        CaseValues::new(1.5, 2.5, 0.5),
        OutcomeProbabilities::new(0.5, 0.3, 0.3),
    );

    let mut strict = Choice::new("Strict", ["Pay"], PolicyKind::Discrete).unwrap();
    let err = strict.set_factor_params("Pay", bad).unwrap_err();
    match err {
        Error::InvalidParameter {
            issue: ParameterIssue::ProbabilitySum { sum, .. },
            ..
        } => assert!((sum - 1.1).abs() < 1e-9),
        other => panic!("expected a probability-sum error, got {other:?}"),
    }

    let lenient = ValidationConfig {
        enforce_probability_sum: false,
        ..ValidationConfig::default()
    };
    let mut loose =
        Choice::with_config("Loose", ["Pay"], PolicyKind::Discrete, lenient).unwrap();
    loose.set_factor_params("Pay", bad).unwrap();
    let out = loose
        .simulate(&SimulationConfig::with_trials(20_000).seeded(3))
        .unwrap();
    // Truncated weights: best 0.3, base 0.5, worst 0.2 -> mean 0.75 + 0.75 + 0.1.
    let mean = summarize(&out).unwrap().mean;
    assert!((mean - 1.6).abs() < 0.02, "mean {mean}");
}

#[test]
fn continuous_mean_converges() {
    init_logging();
    let c = single_factor("A", 1, CaseValues::new(1.5, 2.5, 0.5));
    let out = c
        .simulate(&SimulationConfig::with_trials(10_000).seeded(2024))
        .unwrap();
    let s = summarize(&out).unwrap();
    assert!((s.mean - 1.5).abs() < 0.05, "mean {}", s.mean);

    let reference = analytic_reference(&c, &Continuous).unwrap();
    assert!((s.std_dev - reference.std_dev).abs() < 0.02);
    assert!((s.p25 - reference.p25).abs() < 0.03);
    assert!((s.p75 - reference.p75).abs() < 0.03);
}

#[test]
fn doubling_rank_doubles_mean() {
    let cases = CaseValues::new(1.5, 2.5, 0.5);
    let a = single_factor("A", 1, cases);
    let b = single_factor("B", 2, cases);

    // Same stream: every B total is exactly twice the matching A total.
    let config = SimulationConfig::with_trials(10_000).seeded(11);
    let sa = summarize(&a.simulate(&config).unwrap()).unwrap();
    let sb = summarize(&b.simulate(&config).unwrap()).unwrap();
    assert_eq!(sb.mean, 2.0 * sa.mean);

    // Independent streams: equal in the large-N limit.
    let sb = summarize(&b.simulate(&config.seeded(12)).unwrap()).unwrap();
    assert!((sb.mean - 2.0 * sa.mean).abs() < 0.05);
}

#[test]
fn ranking_three_options_by_mean() {
    let a = single_factor("Ten", 4, CaseValues::certain(2.5));
    let b = single_factor("Five", 2, CaseValues::certain(2.5));
    let c = single_factor("Twenty", 8, CaseValues::certain(2.5));
    let config = SimulationConfig::with_trials(100);

    let summaries: Vec<(String, _)> = [&a, &b, &c]
        .iter()
        .map(|ch| {
            let s = summarize(&ch.simulate(&config).unwrap()).unwrap();
            (ch.title().to_string(), s)
        })
        .collect();
    assert_eq!(summaries[0].1.mean, 10.0);
    assert_eq!(summaries[1].1.mean, 5.0);
    assert_eq!(summaries[2].1.mean, 20.0);
    assert_eq!(rank_by_mean(&summaries), vec!["Twenty", "Ten", "Five"]);
}

#[test]
fn full_session_over_top_six() {
    init_logging();
    let mut session = Session::new(FactorRegistry::standard(), PolicyKind::Continuous);
    session
        .select_factors(&[
            "Community",
            "Career Setup",
            "Public Impact",
            "Job Satisfaction",
            "Pay",
            "Nature/Weather",
        ])
        .unwrap();
    for title in ["Privacy in Seattle", "Antitrust in DC", "Tech in DC"] {
        session.add_choice(title).unwrap();
    }

    let report = session
        .run(&SimulationConfig::with_trials(20_000).seeded(99))
        .unwrap();
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.by_mean.len(), 3);
    assert_eq!(report.by_spread.len(), 3);

    for result in &report.results {
        assert_eq!(result.outcomes.len(), 20_000);
        assert!(result.summary.min >= report.global_min);
        assert!(result.summary.max <= report.global_max);
        let choice = session.choice(&result.title).unwrap();
        let reference = analytic_reference(choice, &Continuous).unwrap();
        assert!(
            (result.summary.mean - reference.mean).abs() < 0.1,
            "{}: {} vs {}",
            result.title,
            result.summary.mean,
            reference.mean
        );
    }

    // Ranking by mean follows the analytic expectations.
    let mut expected: Vec<(String, f64)> = session
        .choices()
        .iter()
        .map(|c| {
            let m = analytic_reference(c, &Continuous).unwrap().mean;
            (c.title().to_string(), m)
        })
        .collect();
    expected.sort_by(|x, y| y.1.total_cmp(&x.1));
    let expected: Vec<String> = expected.into_iter().map(|(t, _)| t).collect();
    assert_eq!(report.by_mean, expected);
}

#[test]
fn validation_happens_before_sampling() {
    let mut c = Choice::new("Unset", ["Pay"], PolicyKind::Discrete).unwrap();
    // Zeroed template probabilities fail the sum check at run start.
    assert!(matches!(
        c.simulate(&SimulationConfig::with_trials(10)),
        Err(Error::InvalidParameter {
            issue: ParameterIssue::ProbabilitySum { .. },
            ..
        })
    ));
    c.apply_presets().unwrap();
    assert!(c.simulate(&SimulationConfig::with_trials(10)).is_ok());

    let empty = Choice::new("Empty", Vec::<String>::new(), PolicyKind::Continuous).unwrap();
    assert_eq!(
        empty.simulate(&SimulationConfig::with_trials(10)),
        Err(Error::EmptyInput("factors"))
    );
}

#[test]
fn continuous_choice_can_run_discrete_policy_with_probabilities() {
    let mut c = Choice::new("Both", ["Pay"], PolicyKind::Continuous).unwrap();
    c.set_factor_params(
        "Pay",
        FactorParams::discrete(
            CaseValues::new(1.5, 2.5, 0.5),
            OutcomeProbabilities::new(0.0, 1.0, 0.0),
        ),
    )
    .unwrap();
    let out = run_simulation(&c, &Discrete, &SimulationConfig::with_trials(50)).unwrap();
    assert!(out.iter().all(|&t| t == 2.5));
}

/// Wraps the continuous policy and raises the cancel flag on first use.
struct CancelOnFirstSample {
    flag: Arc<AtomicBool>,
}

impl SamplingPolicy for CancelOnFirstSample {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Continuous
    }

    fn check(&self, factor: &Factor) -> choicesim_core::Result<()> {
        Continuous.check(factor)
    }

    fn sample(&self, factor: &Factor, rng: &mut dyn RngCore) -> choicesim_core::Result<f64> {
        self.flag.store(true, Ordering::Relaxed);
        Continuous.sample(factor, rng)
    }

    fn expected_value(&self, factor: &Factor) -> choicesim_core::Result<f64> {
        Continuous.expected_value(factor)
    }

    fn variance(&self, factor: &Factor) -> choicesim_core::Result<f64> {
        Continuous.variance(factor)
    }
}

#[test]
fn cancellation_is_checked_between_batches() {
    init_logging();
    let c = single_factor("A", 1, CaseValues::new(1.5, 2.5, 0.5));
    let flag = Arc::new(AtomicBool::new(false));
    let policy = CancelOnFirstSample {
        flag: Arc::clone(&flag),
    };
    let config = SimulationConfig {
        num_trials: 1_000,
        seed: Some(1),
        parallel: false,
        batch_size: 100,
    };
    let err = run_simulation_with_cancel(&c, &policy, &config, &flag).unwrap_err();
    assert_eq!(err, Error::Cancelled { completed_trials: 100 });
}

#[test]
fn parallel_cancellation_reports_whole_batches() {
    init_logging();
    let c = single_factor("A", 1, CaseValues::new(1.5, 2.5, 0.5));
    let flag = Arc::new(AtomicBool::new(false));
    let policy = CancelOnFirstSample {
        flag: Arc::clone(&flag),
    };
    let config = SimulationConfig {
        num_trials: 100_000,
        seed: Some(1),
        parallel: true,
        batch_size: 10,
    };
    match run_simulation_with_cancel(&c, &policy, &config, &flag) {
        Err(Error::Cancelled { completed_trials }) => {
            assert_eq!(completed_trials % config.batch_size, 0);
            // The batch that raised the flag always finishes.
            assert!(completed_trials >= config.batch_size);
            assert!(completed_trials < config.num_trials);
        }
        other => panic!("expected cancellation, got {other:?}"),
    }
}

#[test]
fn overflowing_estimates_fail_before_sampling() {
    let mut c = Choice::with_config(
        "Huge",
        ["Pay"],
        PolicyKind::Continuous,
        ValidationConfig::permissive(),
    )
    .unwrap();
    c.set_factor_params("Pay", CaseValues::new(0.0, 1e308, -1e308))
        .unwrap();

    let expected = Error::InvalidFactorState {
        factor: "Pay".to_string(),
        policy: PolicyKind::Continuous,
    };
    assert_eq!(c.validate(), Err(expected.clone()));

    // No batch runs, so the flag is never consulted.
    let flag = AtomicBool::new(true);
    let err = run_simulation_with_cancel(
        &c,
        &Continuous,
        &SimulationConfig::with_trials(1_000),
        &flag,
    )
    .unwrap_err();
    assert_eq!(err, expected);
}
