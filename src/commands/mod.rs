//! CLI command implementations.
//!
//! Each command follows the same shape: an args struct constructed by
//! main.rs from the parsed CLI, a `validate_*` function for early
//! argument checking, and an `execute_*` entry point.

pub mod evaluate;
pub mod survey;

// Re-export main types and functions
pub use evaluate::{execute_evaluate, validate_evaluate_args, EvaluateArgs};
pub use survey::{execute_survey, validate_survey_args, SurveyArgs};
