//! Output JSON schema definitions.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution. Big integers are
//! stored as decimal strings so documents stay human-readable.

use crate::aggregator::RangeSummary;
use crate::trajectory::{EvaluationBounds, TrajectoryResult};
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level document for a single trajectory evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryProfile {
    /// Schema version for compatibility checking
    pub version: String,

    /// The evaluated trajectory
    pub trajectory: TrajectoryResult,

    /// Step ceiling the evaluation ran under
    pub max_steps: u64,

    /// Value ceiling, as a decimal string (absent = unbounded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<String>,

    /// Timestamp when the profile was generated (RFC 3339)
    pub generated_at: String,
}

impl TrajectoryProfile {
    /// Assemble a profile from an evaluation and its bounds
    ///
    /// **Public** - called by the evaluate command
    pub fn new(result: TrajectoryResult, bounds: &EvaluationBounds) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            trajectory: result,
            max_steps: bounds.max_steps,
            max_value: bounds.max_value.as_ref().map(ToString::to_string),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Top-level document for a range survey
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Human-readable description of the surveyed start set
    pub start_set: String,

    /// Step ceiling the survey ran under
    pub max_steps: u64,

    /// Value ceiling, as a decimal string (absent = unbounded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<String>,

    /// Classifier spec used for grouping, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,

    /// Whether stopping times were memoized within the survey
    pub memoized: bool,

    /// The aggregated statistics
    pub summary: RangeSummary,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,
}

impl SurveyReport {
    /// Assemble a report from a summary and the survey parameters
    ///
    /// **Public** - called by the survey command
    pub fn new(
        summary: RangeSummary,
        start_set: String,
        bounds: &EvaluationBounds,
        classifier: Option<String>,
        memoized: bool,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            start_set,
            max_steps: bounds.max_steps,
            max_value: bounds.max_value.as_ref().map(ToString::to_string),
            classifier,
            memoized,
            summary,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
