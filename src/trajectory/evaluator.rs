//! Trajectory evaluation under step and value bounds.
//!
//! The evaluator is a pure function of its inputs: no I/O, no shared
//! state, safe to call concurrently from independent callers. The
//! Collatz conjecture is open, so termination is only guaranteed by the
//! bounds; hitting a bound is reported as data (`truncated`), never as
//! an error.

use crate::utils::bigint::biguint_string;
use crate::utils::config::DEFAULT_MAX_STEPS;
use crate::utils::error::EvaluateError;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bounds and options controlling a single evaluation
///
/// **Public** - constructed by callers and by the aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationBounds {
    /// Maximum number of transformation steps before giving up
    pub max_steps: u64,

    /// Optional ceiling on intermediate values (None = unbounded)
    pub max_value: Option<BigUint>,

    /// Moduli for which the starting value's residue is recorded
    /// (empty = `residue_classes` stays unpopulated)
    pub residue_moduli: Vec<u64>,
}

impl Default for EvaluationBounds {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_value: None,
            residue_moduli: Vec::new(),
        }
    }
}

impl EvaluationBounds {
    /// Create bounds with the given step ceiling and no value ceiling
    ///
    /// **Public** - convenience constructor
    pub fn with_max_steps(max_steps: u64) -> Self {
        Self {
            max_steps,
            ..Default::default()
        }
    }
}

/// Outcome of evaluating one starting integer
///
/// Immutable once produced; owned solely by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    /// The starting integer
    #[serde(with = "biguint_string")]
    pub start: BigUint,

    /// Number of transformations applied until the termination condition
    pub steps: u64,

    /// Value at which evaluation stopped (1 on observed convergence)
    #[serde(with = "biguint_string")]
    pub terminal_value: BigUint,

    /// Largest intermediate value observed, including `start`
    #[serde(with = "biguint_string")]
    pub max_value: BigUint,

    /// True iff a configured bound stopped evaluation before reaching 1
    pub truncated: bool,

    /// Residues of `start` for the requested moduli
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residue_classes: Option<BTreeMap<u64, u64>>,
}

impl TrajectoryResult {
    /// True iff the trajectory was observed to reach 1 within bounds
    ///
    /// **Public** - readability helper for consumers
    pub fn converged(&self) -> bool {
        !self.truncated
    }
}

/// Apply one step of the Collatz map
///
/// **Public** - building block, also used by the memoizing walker
pub fn collatz_step(n: &BigUint) -> BigUint {
    if n.bit(0) {
        n * 3u32 + 1u32
    } else {
        n >> 1u32
    }
}

/// Evaluate the trajectory of `start` under the given bounds
///
/// **Public** - main entry point of this module
///
/// # Arguments
/// * `start` - starting integer, must be >= 1
/// * `bounds` - step/value ceilings and residue moduli
///
/// # Returns
/// A [`TrajectoryResult`]; `truncated` is set when a bound stopped the
/// walk before 1 was reached.
///
/// # Errors
/// * `EvaluateError::InvalidInput` - `start < 1`, `max_steps == 0`,
///   a value ceiling below `start`, or a zero residue modulus
///
/// # Example
/// ```
/// use collatz_lab::trajectory::{evaluate, EvaluationBounds};
/// use num_bigint::BigUint;
///
/// let result = evaluate(&BigUint::from(27u32), &EvaluationBounds::default()).unwrap();
/// assert_eq!(result.steps, 111);
/// assert!(!result.truncated);
/// ```
pub fn evaluate(
    start: &BigUint,
    bounds: &EvaluationBounds,
) -> Result<TrajectoryResult, EvaluateError> {
    validate_inputs(start, bounds)?;

    let residue_classes = residues_of(start, &bounds.residue_moduli);
    let mut current = start.clone();
    let mut steps: u64 = 0;
    let mut peak = start.clone();

    loop {
        if current.is_one() {
            return Ok(TrajectoryResult {
                start: start.clone(),
                steps,
                terminal_value: current,
                max_value: peak,
                truncated: false,
                residue_classes,
            });
        }

        // Convergence is checked first: a trajectory reaching 1 exactly
        // at max_steps counts as converged.
        if steps >= bounds.max_steps {
            return Ok(TrajectoryResult {
                start: start.clone(),
                steps,
                terminal_value: current,
                max_value: peak,
                truncated: true,
                residue_classes,
            });
        }

        current = collatz_step(&current);
        steps += 1;
        if current > peak {
            peak = current.clone();
        }

        if let Some(ceiling) = &bounds.max_value {
            if current > *ceiling {
                return Ok(TrajectoryResult {
                    start: start.clone(),
                    steps,
                    terminal_value: current,
                    max_value: peak,
                    truncated: true,
                    residue_classes,
                });
            }
        }
    }
}

/// Validate evaluator inputs before any work is done
///
/// **Crate-private** - shared with the memoizing walker in the aggregator
pub(crate) fn validate_inputs(
    start: &BigUint,
    bounds: &EvaluationBounds,
) -> Result<(), EvaluateError> {
    if start.is_zero() {
        return Err(EvaluateError::InvalidInput(
            "starting value must be >= 1".to_string(),
        ));
    }

    if bounds.max_steps == 0 {
        return Err(EvaluateError::InvalidInput(
            "max_steps must be > 0".to_string(),
        ));
    }

    if let Some(ceiling) = &bounds.max_value {
        if ceiling < start {
            return Err(EvaluateError::InvalidInput(format!(
                "max_value {ceiling} is below starting value {start}"
            )));
        }
    }

    if bounds.residue_moduli.contains(&0) {
        return Err(EvaluateError::InvalidInput(
            "residue modulus must be non-zero".to_string(),
        ));
    }

    Ok(())
}

/// Compute residues of `start` for the requested moduli
///
/// **Crate-private** - shared with the memoizing walker
pub(crate) fn residues_of(start: &BigUint, moduli: &[u64]) -> Option<BTreeMap<u64, u64>> {
    if moduli.is_empty() {
        return None;
    }

    let mut classes = BTreeMap::new();
    for &modulus in moduli {
        // residue < modulus, so the conversion always fits in u64
        let residue = (start % BigUint::from(modulus)).to_u64().unwrap_or(0);
        classes.insert(modulus, residue);
    }
    Some(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_collatz_step() {
        assert_eq!(collatz_step(&big(6)), big(3));
        assert_eq!(collatz_step(&big(3)), big(10));
        assert_eq!(collatz_step(&big(9232)), big(4616));
    }

    #[test]
    fn test_evaluate_start_one() {
        let result = evaluate(&big(1), &EvaluationBounds::default()).unwrap();

        assert_eq!(result.steps, 0);
        assert_eq!(result.terminal_value, big(1));
        assert_eq!(result.max_value, big(1));
        assert!(!result.truncated);
        assert!(result.residue_classes.is_none());
    }

    #[test]
    fn test_evaluate_golden_27() {
        // Known reference trajectory for n = 27
        let result = evaluate(&big(27), &EvaluationBounds::with_max_steps(1000)).unwrap();

        assert_eq!(result.steps, 111);
        assert_eq!(result.max_value, big(9232));
        assert_eq!(result.terminal_value, big(1));
        assert!(!result.truncated);
    }

    #[test]
    fn test_evaluate_known_step_counts() {
        let expected: [(u64, u64); 10] = [
            (1, 0),
            (2, 1),
            (3, 7),
            (4, 2),
            (5, 5),
            (6, 8),
            (7, 16),
            (8, 3),
            (9, 19),
            (10, 6),
        ];

        for (start, steps) in expected {
            let result = evaluate(&big(start), &EvaluationBounds::default()).unwrap();
            assert_eq!(result.steps, steps, "start = {start}");
            assert!(!result.truncated);
        }
    }

    #[test]
    fn test_evaluate_truncated_by_max_steps() {
        let result = evaluate(&big(27), &EvaluationBounds::with_max_steps(10)).unwrap();

        assert!(result.truncated);
        assert_eq!(result.steps, 10);
        assert_ne!(result.terminal_value, big(1));
        assert!(result.max_value >= result.terminal_value);
    }

    #[test]
    fn test_evaluate_converges_exactly_at_max_steps() {
        // 2 -> 1 takes exactly one step; reaching 1 at the ceiling is
        // convergence, not truncation.
        let result = evaluate(&big(2), &EvaluationBounds::with_max_steps(1)).unwrap();

        assert!(!result.truncated);
        assert_eq!(result.steps, 1);
        assert_eq!(result.terminal_value, big(1));
    }

    #[test]
    fn test_evaluate_truncated_by_max_value() {
        // 3 -> 10 exceeds a ceiling of 9 on the first step
        let bounds = EvaluationBounds {
            max_steps: 1000,
            max_value: Some(big(9)),
            residue_moduli: Vec::new(),
        };
        let result = evaluate(&big(3), &bounds).unwrap();

        assert!(result.truncated);
        assert_eq!(result.steps, 1);
        assert_eq!(result.terminal_value, big(10));
        assert_eq!(result.max_value, big(10));
    }

    #[test]
    fn test_evaluate_residue_classes() {
        let bounds = EvaluationBounds {
            residue_moduli: vec![8, 16],
            ..Default::default()
        };
        let result = evaluate(&big(27), &bounds).unwrap();

        let classes = result.residue_classes.unwrap();
        assert_eq!(classes.get(&8), Some(&3));
        assert_eq!(classes.get(&16), Some(&11));
    }

    #[test]
    fn test_evaluate_rejects_zero_start() {
        let err = evaluate(&BigUint::zero(), &EvaluationBounds::default()).unwrap_err();
        assert!(matches!(err, EvaluateError::InvalidInput(_)));
    }

    #[test]
    fn test_evaluate_rejects_zero_max_steps() {
        let err = evaluate(&big(27), &EvaluationBounds::with_max_steps(0)).unwrap_err();
        assert!(matches!(err, EvaluateError::InvalidInput(_)));
    }

    #[test]
    fn test_evaluate_rejects_ceiling_below_start() {
        let bounds = EvaluationBounds {
            max_value: Some(big(10)),
            ..Default::default()
        };
        let err = evaluate(&big(27), &bounds).unwrap_err();
        assert!(matches!(err, EvaluateError::InvalidInput(_)));
    }

    #[test]
    fn test_evaluate_rejects_zero_modulus() {
        let bounds = EvaluationBounds {
            residue_moduli: vec![8, 0],
            ..Default::default()
        };
        let err = evaluate(&big(27), &bounds).unwrap_err();
        assert!(matches!(err, EvaluateError::InvalidInput(_)));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let bounds = EvaluationBounds::default();
        let first = evaluate(&big(703), &bounds).unwrap();
        let second = evaluate(&big(703), &bounds).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_truncation_monotonic_in_max_steps() {
        let full = evaluate(&big(27), &EvaluationBounds::with_max_steps(1000)).unwrap();
        assert!(!full.truncated);

        // Any ceiling at or above the true step count still converges
        // with the same step count; below it, truncation kicks in.
        for max_steps in [full.steps, full.steps + 1, 5000] {
            let result = evaluate(&big(27), &EvaluationBounds::with_max_steps(max_steps)).unwrap();
            assert!(!result.truncated);
            assert_eq!(result.steps, full.steps);
        }

        for max_steps in [1, 50, full.steps - 1] {
            let result = evaluate(&big(27), &EvaluationBounds::with_max_steps(max_steps)).unwrap();
            assert!(result.truncated);
            assert_eq!(result.steps, max_steps);
        }
    }

    #[test]
    fn test_peak_exceeds_u64_range() {
        // 2^70 halves down to 1 without ever growing; the point is that
        // the arithmetic itself is exact beyond 64 bits.
        let start = BigUint::from(1u8) << 70u32;
        let result = evaluate(&start, &EvaluationBounds::default()).unwrap();

        assert!(!result.truncated);
        assert_eq!(result.steps, 70);
        assert_eq!(result.max_value, start);
    }
}
