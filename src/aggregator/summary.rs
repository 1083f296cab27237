//! Summary statistics over collections of trajectory results.
//!
//! Mean and median step counts are computed only over non-truncated
//! results; truncated trajectories would bias them downward toward the
//! step ceiling.

use crate::trajectory::TrajectoryResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for one aggregation call
///
/// **Public** - returned from `aggregate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    /// Number of integers evaluated
    pub count: u64,

    /// Number of results observed to reach 1 within bounds
    pub convergence_count: u64,

    /// Mean steps over non-truncated results (None if none converged)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_steps: Option<f64>,

    /// Median steps over non-truncated results (None if none converged)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_steps: Option<f64>,

    /// Sub-summaries keyed by classification key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub grouped: BTreeMap<String, RangeSummary>,
}

impl RangeSummary {
    /// Fraction of evaluated integers that converged, in [0, 1]
    ///
    /// **Public** - convenience for report rendering
    pub fn convergence_ratio(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.convergence_count as f64 / self.count as f64
    }
}

/// Reduce a flat slice of results into a leaf summary (no groups)
///
/// **Crate-private** - called by `aggregate` for the top level and for
/// each classification group
pub(crate) fn summarize(results: &[TrajectoryResult]) -> RangeSummary {
    let count = results.len() as u64;

    let mut converged_steps: Vec<u64> = results
        .iter()
        .filter(|r| !r.truncated)
        .map(|r| r.steps)
        .collect();
    converged_steps.sort_unstable();

    let convergence_count = converged_steps.len() as u64;

    RangeSummary {
        count,
        convergence_count,
        mean_steps: mean(&converged_steps),
        median_steps: median(&converged_steps),
        grouped: BTreeMap::new(),
    }
}

fn mean(sorted: &[u64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let total: u128 = sorted.iter().map(|&s| u128::from(s)).sum();
    Some(total as f64 / sorted.len() as f64)
}

/// Median of a sorted sample; even-sized samples average the two
/// middle elements.
fn median(sorted: &[u64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid] as f64)
    } else {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    fn result(start: u64, steps: u64, truncated: bool) -> TrajectoryResult {
        TrajectoryResult {
            start: BigUint::from(start),
            steps,
            terminal_value: if truncated {
                BigUint::from(start)
            } else {
                BigUint::from(1u32)
            },
            max_value: BigUint::from(start),
            truncated,
            residue_classes: None,
        }
    }

    #[test]
    fn test_summarize_known_range() {
        // Step counts for 1..=10
        let steps = [0u64, 1, 7, 2, 5, 8, 16, 3, 19, 6];
        let results: Vec<TrajectoryResult> = steps
            .iter()
            .enumerate()
            .map(|(i, &s)| result(i as u64 + 1, s, false))
            .collect();

        let summary = summarize(&results);

        assert_eq!(summary.count, 10);
        assert_eq!(summary.convergence_count, 10);
        assert_eq!(summary.mean_steps, Some(6.7));
        // Sorted: [0,1,2,3,5,6,7,8,16,19] -> (5 + 6) / 2
        assert_eq!(summary.median_steps, Some(5.5));
    }

    #[test]
    fn test_summarize_excludes_truncated() {
        let results = vec![
            result(2, 1, false),
            result(3, 7, false),
            result(27, 50, true),
        ];

        let summary = summarize(&results);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.convergence_count, 2);
        assert_eq!(summary.mean_steps, Some(4.0));
        assert_eq!(summary.median_steps, Some(4.0));
    }

    #[test]
    fn test_summarize_all_truncated() {
        let results = vec![result(27, 10, true), result(31, 10, true)];

        let summary = summarize(&results);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.convergence_count, 0);
        assert_eq!(summary.mean_steps, None);
        assert_eq!(summary.median_steps, None);
        assert_eq!(summary.convergence_ratio(), 0.0);
    }

    #[test]
    fn test_median_odd_sample() {
        let results = vec![
            result(2, 1, false),
            result(3, 7, false),
            result(4, 2, false),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.median_steps, Some(2.0));
    }

    #[test]
    fn test_convergence_ratio() {
        let results = vec![
            result(2, 1, false),
            result(3, 7, false),
            result(5, 5, false),
            result(27, 10, true),
        ];
        let summary = summarize(&results);
        assert_eq!(summary.convergence_ratio(), 0.75);
    }
}
