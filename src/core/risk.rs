//! Risk scores and bottom-up aggregation.
//!
//! A risk score is a severity in `[0, 10]`. Declared scores are integers;
//! computed scores may be fractional because aggregation takes means over
//! child scores. Aggregation runs exactly once, at entity construction, and
//! children at or below the declared severity never lower it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MaldexError, Result};

/// Severity value constrained to `[0, 10]`.
///
/// Construction validates the range; the value is immutable afterwards.
/// Fractional values arise only from [`aggregate_risk`] and from decoding
/// records that were produced by it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct RiskScore(f64);

impl RiskScore {
    /// No declared severity.
    pub const ZERO: RiskScore = RiskScore(0.0);

    /// Build a declared score from an integer. Succeeds iff `0 <= value <= 10`.
    pub fn new(value: i64) -> Result<Self> {
        if !(0..=10).contains(&value) {
            return Err(MaldexError::validation(
                "risk_score",
                value.to_string(),
                "0 <= value <= 10",
            ));
        }
        Ok(RiskScore(value as f64))
    }

    /// Build a score from a possibly fractional value in `[0, 10]`.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || !(0.0..=10.0).contains(&value) {
            return Err(MaldexError::validation(
                "risk_score",
                value.to_string(),
                "0 <= value <= 10",
            ));
        }
        Ok(RiskScore(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl Default for RiskScore {
    fn default() -> Self {
        RiskScore::ZERO
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for RiskScore {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        RiskScore::from_f64(value).map_err(serde::de::Error::custom)
    }
}

/// Aggregate an entity's final score from its declared base and the already
/// final scores of its children.
///
/// Children scoring strictly above `base` ("elevating" children) pull the
/// score up; everything else is ignored. With no elevating children the
/// declared score stands. Otherwise the score becomes the mean of `base` and
/// the elevating average, or the elevating average alone when no severity
/// was declared. Inputs are in `[0, 10]`, so the result is too; it is kept
/// exact, never truncated.
pub fn aggregate_risk<I>(base: RiskScore, children: I) -> RiskScore
where
    I: IntoIterator<Item = RiskScore>,
{
    let elevating: Vec<f64> = children
        .into_iter()
        .map(|s| s.value())
        .filter(|&s| s > base.value())
        .collect();

    if elevating.is_empty() {
        return base;
    }

    let avg = elevating.iter().sum::<f64>() / elevating.len() as f64;
    if base.value() > 0.0 {
        RiskScore((base.value() + avg) / 2.0)
    } else {
        RiskScore(avg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(v: i64) -> RiskScore {
        RiskScore::new(v).unwrap()
    }

    fn scores(vs: &[i64]) -> Vec<RiskScore> {
        vs.iter().map(|&v| score(v)).collect()
    }

    #[test]
    fn test_range_invariant() {
        for v in -20..=20 {
            let result = RiskScore::new(v);
            if (0..=10).contains(&v) {
                assert_eq!(result.unwrap().value(), v as f64);
            } else {
                assert!(matches!(result, Err(MaldexError::Validation { .. })));
            }
        }
    }

    #[test]
    fn test_from_f64_rejects_out_of_range() {
        assert!(RiskScore::from_f64(10.0).is_ok());
        assert!(RiskScore::from_f64(7.333).is_ok());
        assert!(RiskScore::from_f64(10.001).is_err());
        assert!(RiskScore::from_f64(-0.1).is_err());
        assert!(RiskScore::from_f64(f64::NAN).is_err());
        assert!(RiskScore::from_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn test_elevating_children_pull_halfway() {
        // base=5, children=[7,7,7] -> (5 + 7) / 2 = 6
        let result = aggregate_risk(score(5), scores(&[7, 7, 7]));
        assert_eq!(result.value(), 6.0);
    }

    #[test]
    fn test_no_declared_score_takes_elevating_average() {
        // base=0, children=[5,8,9] -> 22/3 = 7.333...
        let result = aggregate_risk(score(0), scores(&[5, 8, 9]));
        assert_eq!(result.value(), 22.0 / 3.0);
    }

    #[test]
    fn test_children_at_or_below_base_never_lower_it() {
        let result = aggregate_risk(score(5), scores(&[3, 4, 5]));
        assert_eq!(result.value(), 5.0);
    }

    #[test]
    fn test_no_children_keeps_base() {
        assert_eq!(aggregate_risk(score(0), []).value(), 0.0);
        assert_eq!(aggregate_risk(score(7), []).value(), 7.0);
    }

    #[test]
    fn test_result_always_in_range() {
        for base in 0..=10 {
            for a in 0..=10 {
                for b in 0..=10 {
                    let result = aggregate_risk(score(base), scores(&[a, b]));
                    assert!(
                        (0.0..=10.0).contains(&result.value()),
                        "base={} children=[{},{}] -> {}",
                        base,
                        a,
                        b,
                        result.value()
                    );
                    if a <= base && b <= base {
                        assert_eq!(result.value(), base as f64);
                    }
                }
            }
        }
    }

    #[test]
    fn test_monotone_in_elevating_child() {
        // Raising a single elevating child, others fixed, never lowers the result.
        for base in 0..=10 {
            let mut prev = aggregate_risk(score(base), scores(&[3, 0])).value();
            for x in 1..=10 {
                let next = aggregate_risk(score(base), scores(&[3, x])).value();
                assert!(
                    next >= prev,
                    "base={} child {} -> {} dropped below {}",
                    base,
                    x,
                    next,
                    prev
                );
                prev = next;
            }
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let s = RiskScore::from_f64(22.0 / 3.0).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        let back: RiskScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        // Integer-form JSON is accepted for whole scores.
        let whole: RiskScore = serde_json::from_str("6").unwrap();
        assert_eq!(whole.value(), 6.0);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<RiskScore>("11").is_err());
        assert!(serde_json::from_str::<RiskScore>("-1").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(score(6).to_string(), "6");
        assert_eq!(RiskScore::from_f64(6.5).unwrap().to_string(), "6.5");
    }
}
