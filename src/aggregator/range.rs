//! Range aggregation: evaluate a bounded set of starting integers and
//! reduce the results into a [`RangeSummary`].
//!
//! Aggregation is order-insensitive: the same set of inputs always
//! yields the same summary. All input validation happens before the
//! first evaluation, so failures are never reported midway through a
//! partially-computed summary.

use crate::aggregator::cache::{evaluate_with_cache, StoppingTimeCache};
use crate::aggregator::summary::{summarize, RangeSummary};
use crate::trajectory::{evaluate, EvaluationBounds, TrajectoryResult};
use crate::utils::error::AggregateError;
use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::collections::BTreeMap;
use std::fmt;

/// Classification function: maps a starting integer and its result to a
/// grouping key. Returning `Err` aborts the whole aggregation.
pub type ClassifyFn<'a> = &'a dyn Fn(&BigUint, &TrajectoryResult) -> Result<String, String>;

/// The set of starting integers to evaluate
///
/// **Public** - constructed by callers and by the survey command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartSet {
    /// Inclusive contiguous range; `hi = None` means unbounded and is
    /// rejected during validation
    Range {
        lo: BigUint,
        hi: Option<BigUint>,
    },
    /// An explicit finite set of starting integers
    Explicit(Vec<BigUint>),
}

impl StartSet {
    /// Convenience constructor for an inclusive `[lo, hi]` range
    pub fn range(lo: u64, hi: u64) -> Self {
        StartSet::Range {
            lo: BigUint::from(lo),
            hi: Some(BigUint::from(hi)),
        }
    }

    /// Validate the set: non-empty, bounded, every start >= 1
    ///
    /// **Crate-private** - called by `aggregate` before any evaluation
    fn validate(&self) -> Result<(), AggregateError> {
        match self {
            StartSet::Range { lo, hi } => {
                if lo.is_zero() {
                    return Err(AggregateError::InvalidInput(
                        "range must start at 1 or above".to_string(),
                    ));
                }
                match hi {
                    None => Err(AggregateError::InvalidInput(
                        "range must have an upper bound".to_string(),
                    )),
                    Some(hi) if hi < lo => Err(AggregateError::InvalidInput(format!(
                        "empty range: {lo}..={hi}"
                    ))),
                    Some(_) => Ok(()),
                }
            }
            StartSet::Explicit(starts) => {
                if starts.is_empty() {
                    return Err(AggregateError::InvalidInput(
                        "explicit start set is empty".to_string(),
                    ));
                }
                if starts.iter().any(|s| s.is_zero()) {
                    return Err(AggregateError::InvalidInput(
                        "starting values must be >= 1".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Largest starting value in the set
    ///
    /// Only callable after validation; `None` cannot occur then.
    fn max_start(&self) -> Option<&BigUint> {
        match self {
            StartSet::Range { hi, .. } => hi.as_ref(),
            StartSet::Explicit(starts) => starts.iter().max(),
        }
    }

    /// Iterate over the starting values
    fn iter(&self) -> Box<dyn Iterator<Item = BigUint> + '_> {
        match self {
            StartSet::Range { lo, hi } => {
                let end = hi.clone().unwrap_or_else(BigUint::zero);
                let mut current = lo.clone();
                Box::new(std::iter::from_fn(move || {
                    if current > end {
                        return None;
                    }
                    let next = current.clone();
                    current = &current + BigUint::one();
                    Some(next)
                }))
            }
            StartSet::Explicit(starts) => Box::new(starts.iter().cloned()),
        }
    }
}

impl fmt::Display for StartSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartSet::Range { lo, hi: Some(hi) } => write!(f, "{lo}..={hi}"),
            StartSet::Range { lo, hi: None } => write!(f, "{lo}.. (unbounded)"),
            StartSet::Explicit(starts) => write!(f, "explicit set of {}", starts.len()),
        }
    }
}

/// Options controlling one aggregation call
///
/// **Public** - passed to `aggregate`
#[derive(Default)]
pub struct AggregateOptions<'a> {
    /// Optional classification function for grouped sub-summaries
    pub classify: Option<ClassifyFn<'a>>,

    /// Reuse overlapping trajectory tails within this call
    pub memoize: bool,
}

/// Aggregate trajectory results over a set of starting integers
///
/// **Public** - main entry point of this module
///
/// # Arguments
/// * `starts` - bounded set of starting integers
/// * `bounds` - evaluation bounds applied to every start
/// * `options` - classification and memoization settings
///
/// # Returns
/// A [`RangeSummary`]; `grouped` is populated iff a classifier was given.
///
/// # Errors
/// * `AggregateError::InvalidInput` - empty, unbounded, or otherwise
///   malformed input, reported before any evaluation begins
/// * `AggregateError::Classification` - the classification function
///   failed; no partial summary is returned
pub fn aggregate(
    starts: &StartSet,
    bounds: &EvaluationBounds,
    options: &AggregateOptions,
) -> Result<RangeSummary, AggregateError> {
    starts.validate()?;

    if bounds.max_steps == 0 {
        return Err(AggregateError::InvalidInput(
            "max_steps must be > 0".to_string(),
        ));
    }

    // A value ceiling below the largest start would fail mid-aggregation
    // inside the evaluator; reject it up front instead.
    if let (Some(ceiling), Some(max_start)) = (&bounds.max_value, starts.max_start()) {
        if ceiling < max_start {
            return Err(AggregateError::InvalidInput(format!(
                "max_value {ceiling} is below the largest starting value {max_start}"
            )));
        }
    }

    let mut cache = options.memoize.then(StoppingTimeCache::new);
    let mut results: Vec<TrajectoryResult> = Vec::new();
    let mut groups: BTreeMap<String, Vec<TrajectoryResult>> = BTreeMap::new();

    for start in starts.iter() {
        let result = match cache.as_mut() {
            Some(cache) => evaluate_with_cache(&start, bounds, cache)?,
            None => evaluate(&start, bounds)?,
        };

        if let Some(classify) = options.classify {
            let key = classify(&start, &result).map_err(AggregateError::Classification)?;
            groups.entry(key).or_default().push(result.clone());
        }

        results.push(result);
    }

    if let Some(cache) = &cache {
        debug!("memoization cache holds {} entries", cache.len());
    }

    let mut summary = summarize(&results);
    summary.grouped = groups
        .into_iter()
        .map(|(key, members)| (key, summarize(&members)))
        .collect();

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::classify::Classifier;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aggregate_known_range() {
        let summary = aggregate(
            &StartSet::range(1, 10),
            &EvaluationBounds::default(),
            &AggregateOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.count, 10);
        assert_eq!(summary.convergence_count, 10);
        // Step counts 0,1,7,2,5,8,16,3,19,6 -> mean 6.7
        assert_eq!(summary.mean_steps, Some(6.7));
        assert_eq!(summary.median_steps, Some(5.5));
        assert!(summary.grouped.is_empty());
    }

    #[test]
    fn test_aggregate_rejects_unbounded_range() {
        let starts = StartSet::Range {
            lo: BigUint::from(1u32),
            hi: None,
        };
        let err = aggregate(
            &starts,
            &EvaluationBounds::default(),
            &AggregateOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, AggregateError::InvalidInput(_)));
    }

    #[test]
    fn test_aggregate_rejects_empty_inputs() {
        for starts in [StartSet::range(10, 5), StartSet::Explicit(Vec::new())] {
            let err = aggregate(
                &starts,
                &EvaluationBounds::default(),
                &AggregateOptions::default(),
            )
            .unwrap_err();
            assert!(matches!(err, AggregateError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_aggregate_rejects_zero_start() {
        let starts = StartSet::Explicit(vec![BigUint::from(5u32), BigUint::zero()]);
        let err = aggregate(
            &starts,
            &EvaluationBounds::default(),
            &AggregateOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AggregateError::InvalidInput(_)));
    }

    #[test]
    fn test_aggregate_rejects_low_value_ceiling_up_front() {
        let bounds = EvaluationBounds {
            max_value: Some(BigUint::from(5u32)),
            ..Default::default()
        };
        let err = aggregate(
            &StartSet::range(1, 10),
            &bounds,
            &AggregateOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AggregateError::InvalidInput(_)));
    }

    #[test]
    fn test_aggregate_grouped_by_parity() {
        let classifier = Classifier::Parity;
        let classify = |start: &BigUint, result: &TrajectoryResult| classifier.key(start, result);
        let options = AggregateOptions {
            classify: Some(&classify),
            memoize: false,
        };

        let summary =
            aggregate(&StartSet::range(1, 10), &EvaluationBounds::default(), &options).unwrap();

        assert_eq!(summary.grouped.len(), 2);
        let odd = &summary.grouped["odd"];
        let even = &summary.grouped["even"];
        assert_eq!(odd.count, 5);
        assert_eq!(even.count, 5);
        assert_eq!(odd.count + even.count, summary.count);
        // Odd starts 1,3,5,7,9 take 0,7,5,16,19 steps
        assert_eq!(odd.mean_steps, Some(9.4));
    }

    #[test]
    fn test_aggregate_classification_failure_is_atomic() {
        let classify = |start: &BigUint, _: &TrajectoryResult| {
            if *start == BigUint::from(7u32) {
                Err("classifier rejected 7".to_string())
            } else {
                Ok("fine".to_string())
            }
        };
        let options = AggregateOptions {
            classify: Some(&classify),
            memoize: false,
        };

        let err = aggregate(&StartSet::range(1, 10), &EvaluationBounds::default(), &options)
            .unwrap_err();

        assert!(matches!(err, AggregateError::Classification(_)));
    }

    #[test]
    fn test_aggregate_memoized_matches_plain() {
        let plain = aggregate(
            &StartSet::range(1, 100),
            &EvaluationBounds::default(),
            &AggregateOptions::default(),
        )
        .unwrap();

        let memoized = aggregate(
            &StartSet::range(1, 100),
            &EvaluationBounds::default(),
            &AggregateOptions {
                classify: None,
                memoize: true,
            },
        )
        .unwrap();

        assert_eq!(plain, memoized);
    }

    #[test]
    fn test_aggregate_order_insensitive() {
        let forward = StartSet::Explicit((1u64..=20).map(BigUint::from).collect());
        let backward = StartSet::Explicit((1u64..=20).rev().map(BigUint::from).collect());

        let a = aggregate(
            &forward,
            &EvaluationBounds::default(),
            &AggregateOptions::default(),
        )
        .unwrap();
        let b = aggregate(
            &backward,
            &EvaluationBounds::default(),
            &AggregateOptions::default(),
        )
        .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_aggregate_counts_truncated() {
        // 27 needs 111 steps; a ceiling of 20 truncates it but leaves
        // the small starts converged.
        let starts = StartSet::Explicit(vec![
            BigUint::from(2u32),
            BigUint::from(4u32),
            BigUint::from(27u32),
        ]);
        let summary = aggregate(
            &starts,
            &EvaluationBounds::with_max_steps(20),
            &AggregateOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.count, 3);
        assert_eq!(summary.convergence_count, 2);
        assert_eq!(summary.mean_steps, Some(1.5));
    }

    #[test]
    fn test_start_set_display() {
        assert_eq!(StartSet::range(1, 100).to_string(), "1..=100");
        assert_eq!(
            StartSet::Explicit(vec![BigUint::from(5u32)]).to_string(),
            "explicit set of 1"
        );
    }
}
