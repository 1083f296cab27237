//! JSON output writers and readers.
//!
//! Writes profile and report documents to JSON files with pretty
//! formatting; readers back the `validate` command.

use crate::output::schema::{SurveyReport, TrajectoryProfile};
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a trajectory profile to a JSON file
///
/// **Public** - called by the evaluate command
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - path cannot be created or is invalid
pub fn write_trajectory_profile(
    profile: &TrajectoryProfile,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing trajectory profile to: {}", output_path.display());
    write_pretty(profile, output_path)
}

/// Write a survey report to a JSON file
///
/// **Public** - called by the survey command
///
/// # Errors
/// Same as [`write_trajectory_profile`].
pub fn write_survey_report(
    report: &SurveyReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing survey report to: {}", output_path.display());
    write_pretty(report, output_path)
}

/// Read a trajectory profile back from disk
///
/// **Public** - used by the validate command
pub fn read_trajectory_profile(
    input_path: impl AsRef<Path>,
) -> Result<TrajectoryProfile, OutputError> {
    read_json(input_path.as_ref())
}

/// Read a survey report back from disk
///
/// **Public** - used by the validate command
pub fn read_survey_report(input_path: impl AsRef<Path>) -> Result<SurveyReport, OutputError> {
    read_json(input_path.as_ref())
}

/// Serialize any document as pretty JSON through a buffered writer
///
/// **Private** - shared implementation for both document kinds
fn write_pretty<T: Serialize>(document: &T, output_path: &Path) -> Result<(), OutputError> {
    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(OutputError::SerializationFailed)?;

    debug!("Document written to {}", output_path.display());
    Ok(())
}

fn read_json<T: DeserializeOwned>(input_path: &Path) -> Result<T, OutputError> {
    debug!("Reading document from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    serde_json::from_reader(file).map_err(OutputError::SerializationFailed)
}

/// Check that the output path points at a plausible file location
///
/// **Private** - guards against empty or directory-only paths
fn validate_output_path(output_path: &Path) -> Result<(), OutputError> {
    if output_path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath(
            "output path is empty".to_string(),
        ));
    }

    if output_path.file_name().is_none() {
        return Err(OutputError::InvalidPath(format!(
            "output path has no file name: {}",
            output_path.display()
        )));
    }

    Ok(())
}
