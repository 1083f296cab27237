//! Survey command implementation.
//!
//! The survey command:
//! 1. Parses and validates the start set and bounds
//! 2. Aggregates trajectory results over the set
//! 3. Writes a JSON survey report (if requested)
//! 4. Optionally prints a text summary

use crate::aggregator::{aggregate, AggregateOptions, Classifier, StartSet};
use crate::output::schema::SurveyReport;
use crate::output::{render_survey_summary, write_survey_report};
use crate::trajectory::{EvaluationBounds, TrajectoryResult};
use crate::utils::bigint::parse_biguint;
use crate::utils::config::{DEFAULT_MAX_STEPS, MAX_REASONABLE_STEPS};
use anyhow::{Context, Result};
use log::{debug, info};
use num_bigint::BigUint;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the survey command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct SurveyArgs {
    /// Lower bound of the surveyed range (decimal string)
    pub lo: Option<String>,

    /// Upper bound of the surveyed range (decimal string)
    pub hi: Option<String>,

    /// Explicit comma-separated starting values (alternative to a range)
    pub starts: Option<String>,

    /// Maximum number of transformation steps per trajectory
    pub max_steps: u64,

    /// Optional ceiling on intermediate values (decimal string)
    pub max_value: Option<String>,

    /// Classifier spec: `parity` or `residue:<m>`
    pub classify: Option<String>,

    /// Reuse overlapping trajectory tails within the survey
    pub memoize: bool,

    /// Output path for the JSON report (optional)
    pub output: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for SurveyArgs {
    fn default() -> Self {
        Self {
            lo: None,
            hi: None,
            starts: None,
            max_steps: DEFAULT_MAX_STEPS,
            max_value: None,
            classify: None,
            memoize: false,
            output: None,
            print_summary: false,
        }
    }
}

/// Validate survey arguments
///
/// **Public** - called before execute_survey for early validation
pub fn validate_survey_args(args: &SurveyArgs) -> Result<()> {
    let has_range = args.lo.is_some();
    let has_starts = args.starts.is_some();

    if has_range == has_starts {
        anyhow::bail!("provide either --lo/--hi or --starts, not both");
    }

    if args.hi.is_some() && args.lo.is_none() {
        anyhow::bail!("--hi requires --lo");
    }

    if let Some(lo) = &args.lo {
        parse_biguint(lo).map_err(|e| anyhow::anyhow!(e))?;
    }
    if let Some(hi) = &args.hi {
        parse_biguint(hi).map_err(|e| anyhow::anyhow!(e))?;
    }

    if let Some(starts) = &args.starts {
        if starts.split(',').count() == 0 || starts.trim().is_empty() {
            anyhow::bail!("--starts cannot be empty");
        }
        for value in starts.split(',') {
            parse_biguint(value).map_err(|e| anyhow::anyhow!(e))?;
        }
    }

    if args.max_steps == 0 {
        anyhow::bail!("max-steps must be greater than 0");
    }

    if args.max_steps > MAX_REASONABLE_STEPS {
        anyhow::bail!("max-steps is too large (max {MAX_REASONABLE_STEPS})");
    }

    if let Some(max_value) = &args.max_value {
        parse_biguint(max_value).map_err(|e| anyhow::anyhow!(e))?;
    }

    if let Some(spec) = &args.classify {
        Classifier::parse(spec).map_err(|e| anyhow::anyhow!(e))?;
    }

    Ok(())
}

/// Execute the survey command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid arguments or start sets (including unbounded ranges)
/// * Classification failures
/// * File write errors
pub fn execute_survey(args: SurveyArgs) -> Result<()> {
    let start_time = Instant::now();

    let starts = build_start_set(&args)?;
    let max_value = args
        .max_value
        .as_deref()
        .map(parse_biguint)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let bounds = EvaluationBounds {
        max_steps: args.max_steps,
        max_value,
        residue_moduli: Vec::new(),
    };

    let classifier = args
        .classify
        .as_deref()
        .map(Classifier::parse)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    info!("Step 1/3: Surveying {starts}...");
    info!(
        "Bounds: max_steps = {}, max_value = {}",
        bounds.max_steps,
        bounds
            .max_value
            .as_ref()
            .map_or_else(|| "unbounded".to_string(), ToString::to_string)
    );

    let classify_fn = classifier
        .as_ref()
        .map(|c| move |start: &BigUint, result: &TrajectoryResult| c.key(start, result));
    let options = AggregateOptions {
        classify: classify_fn
            .as_ref()
            .map(|f| f as &dyn Fn(&BigUint, &TrajectoryResult) -> Result<String, String>),
        memoize: args.memoize,
    };

    let summary = aggregate(&starts, &bounds, &options).context("Survey aggregation failed")?;

    info!(
        "Step 2/3: Aggregated {} trajectories, {} converged",
        summary.count, summary.convergence_count
    );
    if let Some(mean) = summary.mean_steps {
        debug!("Mean steps over converged trajectories: {mean:.2}");
    }

    if let Some(output_path) = &args.output {
        info!("Step 3/3: Writing survey report...");
        let report = SurveyReport::new(
            summary.clone(),
            starts.to_string(),
            &bounds,
            args.classify.clone(),
            args.memoize,
        );
        write_survey_report(&report, output_path).context("Failed to write survey report")?;
        info!("Report written to: {}", output_path.display());
    } else {
        info!("Step 3/3: Skipping report output (not requested)");
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(60));
        println!("SURVEY SUMMARY ({starts})");
        println!("{}", "=".repeat(60));
        println!("{}", render_survey_summary(&summary));
        println!("{}", "=".repeat(60));
    }

    let elapsed = start_time.elapsed();
    info!("Survey completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Build the start set from CLI arguments
///
/// **Private** - internal helper for execute_survey
fn build_start_set(args: &SurveyArgs) -> Result<StartSet> {
    if let Some(starts) = &args.starts {
        let values = starts
            .split(',')
            .map(|v| parse_biguint(v).map_err(|e| anyhow::anyhow!(e)))
            .collect::<Result<Vec<BigUint>>>()?;
        return Ok(StartSet::Explicit(values));
    }

    let lo = args
        .lo
        .as_deref()
        .context("--lo is required when --starts is not given")?;
    let lo = parse_biguint(lo).map_err(|e| anyhow::anyhow!(e))?;
    let hi = args
        .hi
        .as_deref()
        .map(parse_biguint)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    // An absent --hi builds an unbounded range; the aggregator rejects
    // it before evaluating anything.
    Ok(StartSet::Range { lo, hi })
}
