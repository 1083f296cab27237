//! Evaluate command implementation.
//!
//! The evaluate command:
//! 1. Parses and validates the starting integer and bounds
//! 2. Runs the trajectory evaluator
//! 3. Optionally writes a JSON profile
//! 4. Optionally prints a text summary

use crate::output::schema::TrajectoryProfile;
use crate::output::{render_trajectory_summary, write_trajectory_profile};
use crate::trajectory::{evaluate, EvaluationBounds};
use crate::utils::bigint::parse_biguint;
use crate::utils::config::{DEFAULT_MAX_STEPS, MAX_REASONABLE_STEPS};
use anyhow::{Context, Result};
use log::{debug, info};
use num_bigint::BigUint;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the evaluate command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct EvaluateArgs {
    /// Starting integer, as a decimal string
    pub start: String,

    /// Maximum number of transformation steps
    pub max_steps: u64,

    /// Optional ceiling on intermediate values, as a decimal string
    pub max_value: Option<String>,

    /// Moduli for which to record the start's residue
    pub residues: Vec<u64>,

    /// Output path for the JSON profile (optional)
    pub output: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for EvaluateArgs {
    fn default() -> Self {
        Self {
            start: String::new(),
            max_steps: DEFAULT_MAX_STEPS,
            max_value: None,
            residues: Vec::new(),
            output: None,
            print_summary: false,
        }
    }
}

/// Validate evaluate arguments
///
/// **Public** - called before execute_evaluate for early validation
pub fn validate_evaluate_args(args: &EvaluateArgs) -> Result<()> {
    if args.start.is_empty() {
        anyhow::bail!("starting value cannot be empty");
    }

    let start = parse_biguint(&args.start).map_err(|e| anyhow::anyhow!(e))?;
    if start == BigUint::from(0u32) {
        anyhow::bail!("starting value must be >= 1");
    }

    if args.max_steps == 0 {
        anyhow::bail!("max-steps must be greater than 0");
    }

    if args.max_steps > MAX_REASONABLE_STEPS {
        anyhow::bail!("max-steps is too large (max {MAX_REASONABLE_STEPS})");
    }

    if let Some(max_value) = &args.max_value {
        let ceiling = parse_biguint(max_value).map_err(|e| anyhow::anyhow!(e))?;
        if ceiling < start {
            anyhow::bail!("max-value must be at least the starting value");
        }
    }

    if args.residues.contains(&0) {
        anyhow::bail!("residue moduli must be non-zero");
    }

    Ok(())
}

/// Execute the evaluate command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid arguments
/// * File write errors
pub fn execute_evaluate(args: EvaluateArgs) -> Result<()> {
    let start_time = Instant::now();

    // Arguments were pre-validated in main; parse failures here would be
    // programming errors, but propagate them anyway.
    let start = parse_biguint(&args.start).map_err(|e| anyhow::anyhow!(e))?;
    let max_value = args
        .max_value
        .as_deref()
        .map(parse_biguint)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let bounds = EvaluationBounds {
        max_steps: args.max_steps,
        max_value,
        residue_moduli: args.residues.clone(),
    };

    info!("Evaluating trajectory of {start}");
    debug!(
        "Bounds: max_steps = {}, max_value = {}",
        bounds.max_steps,
        bounds
            .max_value
            .as_ref()
            .map_or_else(|| "unbounded".to_string(), ToString::to_string)
    );

    let result = evaluate(&start, &bounds).context("Trajectory evaluation failed")?;

    if result.truncated {
        info!(
            "Trajectory truncated after {} steps at value {}",
            result.steps, result.terminal_value
        );
    } else {
        info!(
            "Trajectory converged in {} steps (peak {})",
            result.steps, result.max_value
        );
    }

    if let Some(output_path) = &args.output {
        let profile = TrajectoryProfile::new(result.clone(), &bounds);
        write_trajectory_profile(&profile, output_path)
            .context("Failed to write trajectory profile")?;
        info!("Profile written to: {}", output_path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(60));
        println!("TRAJECTORY SUMMARY");
        println!("{}", "=".repeat(60));
        println!("{}", render_trajectory_summary(&result));
        println!("{}", "=".repeat(60));
    }

    let elapsed = start_time.elapsed();
    debug!("Evaluation completed in {:.3}s", elapsed.as_secs_f64());

    Ok(())
}
