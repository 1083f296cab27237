//! Opportunistic memoization of stopping times.
//!
//! Trajectories overlap heavily: evaluating 27 walks through 9232, so a
//! later query for 9232 can reuse the tail already computed. The cache
//! is caller-owned and scoped to a single aggregation call - never a
//! process-wide singleton - and is append-only for the duration of that
//! call. Only fully converged tails are cached; a cache miss triggers
//! recomputation, never a wrong answer.

use crate::trajectory::evaluator::{residues_of, validate_inputs};
use crate::trajectory::{collatz_step, EvaluationBounds, TrajectoryResult};
use crate::utils::error::EvaluateError;
use num_bigint::BigUint;
use num_traits::One;
use std::collections::HashMap;

/// Cached tail of a converged trajectory: steps to reach 1 from this
/// value and the largest value on the way down (inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
struct CachedTail {
    steps: u64,
    peak: BigUint,
}

/// Append-only map from integer value to its converged tail
///
/// **Public** - constructed per aggregation call and discarded afterwards
#[derive(Debug, Default)]
pub struct StoppingTimeCache {
    entries: HashMap<BigUint, CachedTail>,
}

impl StoppingTimeCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, value: &BigUint) -> Option<&CachedTail> {
        self.entries.get(value)
    }

    fn insert_if_absent(&mut self, value: BigUint, tail: CachedTail) {
        self.entries.entry(value).or_insert(tail);
    }
}

/// Evaluate a trajectory, reusing and populating the given cache
///
/// **Public** - used by `aggregate` when memoization is enabled
///
/// Produces bit-identical results to [`crate::trajectory::evaluate`]:
/// a cached tail is only shortcut onto when the combined walk would
/// still satisfy both bounds, so truncation behavior is unchanged.
pub fn evaluate_with_cache(
    start: &BigUint,
    bounds: &EvaluationBounds,
    cache: &mut StoppingTimeCache,
) -> Result<TrajectoryResult, EvaluateError> {
    validate_inputs(start, bounds)?;

    let residue_classes = residues_of(start, &bounds.residue_moduli);
    let mut current = start.clone();
    let mut steps: u64 = 0;
    let mut peak = start.clone();

    // Values on the walked prefix, in step order; backfilled into the
    // cache once convergence is observed.
    let mut visited: Vec<BigUint> = Vec::new();

    loop {
        if current.is_one() {
            backfill(cache, &visited, steps, &BigUint::one());
            return Ok(TrajectoryResult {
                start: start.clone(),
                steps,
                terminal_value: current,
                max_value: peak,
                truncated: false,
                residue_classes,
            });
        }

        if let Some(tail) = cache.lookup(&current) {
            let total_steps = steps.saturating_add(tail.steps);
            let within_steps = total_steps <= bounds.max_steps;
            let within_value = bounds
                .max_value
                .as_ref()
                .map_or(true, |ceiling| tail.peak <= *ceiling);

            // Shortcut only when the uncached walk would also converge
            // within bounds; otherwise keep stepping so truncation is
            // reported exactly as the plain evaluator would.
            if within_steps && within_value {
                if tail.peak > peak {
                    peak = tail.peak.clone();
                }
                let tail_peak = tail.peak.clone();
                backfill(cache, &visited, total_steps, &tail_peak);
                return Ok(TrajectoryResult {
                    start: start.clone(),
                    steps: total_steps,
                    terminal_value: BigUint::one(),
                    max_value: peak,
                    truncated: false,
                    residue_classes,
                });
            }
        }

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

        visited.push(current.clone());
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

/// Record a converged tail for every value on the walked prefix.
///
/// `visited[k]` is the value after `k` steps; its tail takes
/// `total_steps - k` steps and peaks at the running maximum of the
/// suffix (seeded with the peak beyond the walked prefix).
fn backfill(
    cache: &mut StoppingTimeCache,
    visited: &[BigUint],
    total_steps: u64,
    suffix_peak: &BigUint,
) {
    let mut running_peak = suffix_peak.clone();
    for (index, value) in visited.iter().enumerate().rev() {
        if *value > running_peak {
            running_peak = value.clone();
        }
        cache.insert_if_absent(
            value.clone(),
            CachedTail {
                steps: total_steps - index as u64,
                peak: running_peak.clone(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::evaluate;
    use pretty_assertions::assert_eq;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_cache_populated_from_converged_walk() {
        let mut cache = StoppingTimeCache::new();
        let bounds = EvaluationBounds::default();

        let result = evaluate_with_cache(&big(27), &bounds, &mut cache).unwrap();
        assert_eq!(result.steps, 111);
        assert!(!cache.is_empty());

        // 9232 is on 27's trajectory; its tail must now be cached and a
        // direct query must agree with the plain evaluator.
        let plain = evaluate(&big(9232), &bounds).unwrap();
        let cached = evaluate_with_cache(&big(9232), &bounds, &mut cache).unwrap();
        assert_eq!(cached, plain);
    }

    #[test]
    fn test_cache_agrees_with_plain_evaluator() {
        let mut cache = StoppingTimeCache::new();
        let bounds = EvaluationBounds::default();

        for start in 1u64..=200 {
            let plain = evaluate(&big(start), &bounds).unwrap();
            let cached = evaluate_with_cache(&big(start), &bounds, &mut cache).unwrap();
            assert_eq!(cached, plain, "start = {start}");
        }
    }

    #[test]
    fn test_cache_hit_respects_tighter_step_bound() {
        let mut cache = StoppingTimeCache::new();

        // Warm the cache with 27's full trajectory...
        evaluate_with_cache(&big(27), &EvaluationBounds::default(), &mut cache).unwrap();

        // ...then re-evaluate under a ceiling the cached tail exceeds.
        let tight = EvaluationBounds::with_max_steps(10);
        let plain = evaluate(&big(27), &tight).unwrap();
        let cached = evaluate_with_cache(&big(27), &tight, &mut cache).unwrap();

        assert!(cached.truncated);
        assert_eq!(cached, plain);
    }

    #[test]
    fn test_cache_hit_respects_value_ceiling() {
        let mut cache = StoppingTimeCache::new();
        evaluate_with_cache(&big(27), &EvaluationBounds::default(), &mut cache).unwrap();

        // 27's trajectory peaks at 9232, above this ceiling; the cached
        // tail must not be used to fake convergence.
        let bounded = EvaluationBounds {
            max_steps: 100_000,
            max_value: Some(big(1000)),
            residue_moduli: Vec::new(),
        };
        let plain = evaluate(&big(27), &bounded).unwrap();
        let cached = evaluate_with_cache(&big(27), &bounded, &mut cache).unwrap();

        assert!(cached.truncated);
        assert_eq!(cached, plain);
    }

    #[test]
    fn test_truncated_walk_caches_nothing() {
        let mut cache = StoppingTimeCache::new();
        let result =
            evaluate_with_cache(&big(27), &EvaluationBounds::with_max_steps(10), &mut cache)
                .unwrap();

        assert!(result.truncated);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_invalid_input() {
        let mut cache = StoppingTimeCache::new();
        let err = evaluate_with_cache(
            &num_traits::Zero::zero(),
            &EvaluationBounds::default(),
            &mut cache,
        )
        .unwrap_err();
        assert!(matches!(err, EvaluateError::InvalidInput(_)));
    }
}
