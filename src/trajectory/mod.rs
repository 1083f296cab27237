//! Bounded simulation of single Collatz trajectories.
//!
//! The evaluator applies the Collatz map (n/2 for even n, 3n+1 for odd n)
//! until the value reaches 1 or a configured bound stops it. All values
//! are arbitrary precision; the 3n+1 step can exceed 64-bit range for
//! larger starting values.

pub mod evaluator;

// Re-export main types and functions
pub use evaluator::{collatz_step, evaluate, EvaluationBounds, TrajectoryResult};
