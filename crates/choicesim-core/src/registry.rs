//! Canonical factor names and the default factor template.

use serde::Serialize;

use crate::error::{Error, ParameterIssue, Result};
use crate::factor::Factor;
use crate::policy::PolicyKind;

/// Most factors a user may single out for a comparison.
pub const MAX_SELECTED_FACTORS: usize = 6;

/// Every factor the comparison form offers.
const STANDARD_FACTORS: &[&str] = &[
    "Career Setup",
    "Community",
    "Health",
    "Hobbies",
    "Home Situation",
    "Job Satisfaction",
    "Learning",
    "Location/Where I Live",
    "Mentorship",
    "Pay",
    "Pet",
    "Public Impact",
    "Nature/Weather",
    "Travel",
];

/// Ordered set of factor names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorRegistry {
    names: Vec<String>,
}

impl FactorRegistry {
    /// The standard factor set, sorted lexicographically.
    pub fn standard() -> Self {
        let mut names: Vec<String> = STANDARD_FACTORS.iter().map(|s| s.to_string()).collect();
        names.sort();
        Self { names }
    }

    /// Registry over caller-supplied names, kept in the given order.
    pub fn custom<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(Error::invalid("factor", ParameterIssue::EmptyName));
            }
            if out.contains(&name) {
                return Err(Error::invalid(name, ParameterIssue::DuplicateFactor));
            }
            out.push(name);
        }
        if out.is_empty() {
            return Err(Error::invalid("factors", ParameterIssue::NoFactorsSelected));
        }
        Ok(Self { names: out })
    }

    pub fn default_factors(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Zeroed factor with rank 0 for `policy`.
    pub fn default_template(&self, name: &str, policy: PolicyKind) -> Factor {
        Factor::template(name, policy)
    }

    /// Pick a curated subset in the caller's order (first = most important).
    ///
    /// Every name must be registered and appear once; between 1 and
    /// [`MAX_SELECTED_FACTORS`] names are allowed.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Err(Error::invalid("factors", ParameterIssue::NoFactorsSelected));
        }
        if names.len() > MAX_SELECTED_FACTORS {
            return Err(Error::invalid(
                "factors",
                ParameterIssue::TooManyFactors {
                    max: MAX_SELECTED_FACTORS,
                },
            ));
        }
        let mut selected: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !self.contains(name) {
                return Err(Error::invalid(name, ParameterIssue::UnknownFactor));
            }
            if selected.iter().any(|s| s == name) {
                return Err(Error::invalid(name, ParameterIssue::DuplicateFactor));
            }
            selected.push(name.to_string());
        }
        Ok(selected)
    }
}

impl Default for FactorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_sorted() {
        let reg = FactorRegistry::standard();
        assert_eq!(reg.len(), 14);
        let names = reg.default_factors();
        assert_eq!(names.first().map(String::as_str), Some("Career Setup"));
        assert_eq!(names.last().map(String::as_str), Some("Travel"));
        assert!(names.windows(2).all(|w| w[0] < w[1]));
        // "Nature/Weather" sorts before "Pay".
        let nature = names.iter().position(|n| n == "Nature/Weather").unwrap();
        let pay = names.iter().position(|n| n == "Pay").unwrap();
        assert!(nature < pay);
    }

    #[test]
    fn test_default_template() {
        let reg = FactorRegistry::standard();
        let t = reg.default_template("Pay", PolicyKind::Continuous);
        assert_eq!(t.name, "Pay");
        assert_eq!(t.rank, 0);
        assert_eq!(t.base_case, 0.0);
        assert!(t.probabilities.is_none());
    }

    #[test]
    fn test_select_keeps_caller_order() {
        let reg = FactorRegistry::standard();
        let picked = reg.select(&["Pay", "Community", "Health"]).unwrap();
        assert_eq!(picked, vec!["Pay", "Community", "Health"]);
    }

    #[test]
    fn test_select_errors() {
        let reg = FactorRegistry::standard();
        let empty: [&str; 0] = [];
        assert!(reg.select(&empty).is_err());
        assert!(matches!(
            reg.select(&["Pay", "Salary"]),
            Err(Error::InvalidParameter {
                issue: ParameterIssue::UnknownFactor,
                ..
            })
        ));
        assert!(matches!(
            reg.select(&["Pay", "Pay"]),
            Err(Error::InvalidParameter {
                issue: ParameterIssue::DuplicateFactor,
                ..
            })
        ));
        let seven: Vec<&str> = reg
            .default_factors()
            .iter()
            .take(7)
            .map(String::as_str)
            .collect();
        assert!(matches!(
            reg.select(&seven),
            Err(Error::InvalidParameter {
                issue: ParameterIssue::TooManyFactors { max: 6 },
                ..
            })
        ));
    }

    #[test]
    fn test_custom_registry() {
        let reg = FactorRegistry::custom(["Zeta", "Alpha"]).unwrap();
        assert_eq!(reg.default_factors(), ["Zeta", "Alpha"]);
        assert!(FactorRegistry::custom(["A", "A"]).is_err());
        assert!(FactorRegistry::custom(Vec::<String>::new()).is_err());
    }
}
