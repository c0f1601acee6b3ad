//! Order-independence of the summary statistics.

use choicesim_stats::{Summary, rank_by_mean, summarize};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

proptest! {
    #[test]
    fn summarize_ignores_order(
        mut outcomes in prop::collection::vec(-50.0f64..50.0, 1..400),
        seed in any::<u64>(),
    ) {
        let before = summarize(&outcomes).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        outcomes.shuffle(&mut rng);
        let after = summarize(&outcomes).unwrap();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn quartiles_are_ordered(outcomes in prop::collection::vec(0.0f64..18.0, 1..200)) {
        let s = summarize(&outcomes).unwrap();
        prop_assert!(s.min <= s.p25);
        prop_assert!(s.p25 <= s.median);
        prop_assert!(s.median <= s.p75);
        prop_assert!(s.p75 <= s.max);
        prop_assert!(s.spread() >= 0.0);
    }
}

#[test]
fn summary_serializes_with_field_names() {
    let s = summarize(&[1.0, 2.0, 3.0]).unwrap();
    let json = serde_json::to_value(s).unwrap();
    for key in ["count", "mean", "std_dev", "min", "p25", "median", "p75", "max"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    let back: Summary = serde_json::from_value(json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn rank_by_mean_three_options() {
    let titles = ["A", "B", "C"];
    let means = [10.0, 5.0, 20.0];
    let summaries: Vec<(String, Summary)> = titles
        .iter()
        .zip(means)
        .map(|(t, m)| (t.to_string(), summarize(&[m - 1.0, m, m + 1.0]).unwrap()))
        .collect();
    assert_eq!(rank_by_mean(&summaries), vec!["C", "A", "B"]);
}
