//! Built-in seed values for a few named options.
//!
//! Lookups are keyed by the exact option title and factor name. Anything not
//! listed falls back to [`DEFAULT_CASES`].

use crate::factor::{CaseValues, OutcomeProbabilities};

/// Starting values for factors with no preset.
pub const DEFAULT_CASES: CaseValues = CaseValues::new(1.5, 2.5, 0.5);

/// Starting probabilities for discrete factors: best and worst are the top
/// and bottom 10% outcomes, base covers the rest.
pub const DEFAULT_PROBABILITIES: OutcomeProbabilities = OutcomeProbabilities::new(0.8, 0.1, 0.1);

struct Preset {
    title: &'static str,
    /// `(factor, base, best, worst)`
    factors: &'static [(&'static str, f64, f64, f64)],
}

const PRESETS: &[Preset] = &[
    Preset {
        title: "Privacy in Seattle",
        factors: &[
            ("Community", 1.4, 2.0, 0.25),
            ("Career Setup", 2.45, 2.55, 1.3),
            ("Public Impact", 1.5, 2.1, 1.0),
            ("Job Satisfaction", 1.75, 2.7, 1.25),
            ("Pay", 2.0, 2.55, 1.5),
            ("Nature/Weather", 1.5, 2.5, 1.1),
        ],
    },
    Preset {
        title: "Antitrust in DC",
        factors: &[
            ("Community", 2.25, 2.8, 1.7),
            ("Career Setup", 2.4, 2.5, 1.85),
            ("Public Impact", 0.25, 0.75, 0.0),
            ("Job Satisfaction", 1.0, 1.5, 0.2),
            ("Pay", 2.9, 3.0, 2.6),
            ("Nature/Weather", 2.0, 2.2, 1.5),
        ],
    },
    Preset {
        title: "Tech in DC",
        factors: &[
            ("Community", 2.25, 2.6, 1.5),
            ("Career Setup", 1.85, 3.0, 1.15),
            ("Public Impact", 2.0, 2.85, 1.3),
            ("Job Satisfaction", 1.9, 3.0, 0.4),
            ("Pay", 0.75, 1.35, 0.15),
            ("Nature/Weather", 2.0, 2.5, 1.4),
        ],
    },
];

/// Preset case values for `factor` under the option titled `title`.
pub fn lookup(title: &str, factor: &str) -> Option<CaseValues> {
    PRESETS
        .iter()
        .find(|p| p.title == title)?
        .factors
        .iter()
        .find(|&&(name, ..)| name == factor)
        .map(|&(_, base, best, worst)| CaseValues::new(base, best, worst))
}

/// Titles that have presets.
pub fn titles() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.title)
}
