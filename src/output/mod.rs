//! Output writers for trajectory profiles and survey reports.
//!
//! This module handles writing data to disk in various formats:
//! - JSON profiles and reports (versioned schema)
//! - Text summaries for stdout

pub mod json;
pub mod schema;
pub mod text;

// Re-export main types and functions
pub use json::{read_survey_report, read_trajectory_profile, write_survey_report, write_trajectory_profile};
pub use schema::{SurveyReport, TrajectoryProfile};
pub use text::{render_survey_summary, render_trajectory_summary};
