//! Aggregation of trajectory results into range summaries.
//!
//! This module reduces many per-integer evaluations into:
//! - Convergence counts and step statistics (mean, median)
//! - Grouped sub-summaries keyed by a classification function
//! - An optional per-call memoization cache of stopping times

pub mod cache;
pub mod classify;
pub mod range;
pub mod summary;

// Re-export main types and functions
pub use cache::{evaluate_with_cache, StoppingTimeCache};
pub use classify::Classifier;
pub use range::{aggregate, AggregateOptions, StartSet};
pub use summary::RangeSummary;
