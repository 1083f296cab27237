//! Collatz Lab CLI
//!
//! Bounded trajectory evaluation and range survey statistics for the
//! Collatz map. Evaluates single trajectories or whole ranges and
//! writes versioned JSON reports.

use anyhow::Result;
use clap::{Parser, Subcommand};
use collatz_lab::commands::{
    execute_evaluate, execute_survey, validate_evaluate_args, validate_survey_args, EvaluateArgs,
    SurveyArgs,
};
use collatz_lab::utils::config::SCHEMA_VERSION;
use env_logger::Env;
use std::path::PathBuf;

/// Collatz Lab - trajectory evaluation and range surveys
#[derive(Parser, Debug)]
#[command(name = "collatz-lab")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the trajectory of a single starting integer
    Evaluate {
        /// Starting integer (decimal, arbitrary precision)
        #[arg(short, long)]
        start: String,

        /// Maximum number of transformation steps
        #[arg(long, default_value = "100000")]
        max_steps: u64,

        /// Ceiling on intermediate values (default: unbounded)
        #[arg(long)]
        max_value: Option<String>,

        /// Record the start's residue for these moduli (comma-separated)
        #[arg(long, value_delimiter = ',')]
        residues: Vec<u64>,

        /// Output path for the JSON profile
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Survey a range of starting integers and aggregate statistics
    Survey {
        /// Lower bound of the range (inclusive)
        #[arg(long)]
        lo: Option<String>,

        /// Upper bound of the range (inclusive; required for ranges)
        #[arg(long)]
        hi: Option<String>,

        /// Explicit comma-separated starting values instead of a range
        #[arg(long)]
        starts: Option<String>,

        /// Maximum number of transformation steps per trajectory
        #[arg(long, default_value = "100000")]
        max_steps: u64,

        /// Ceiling on intermediate values (default: unbounded)
        #[arg(long)]
        max_value: Option<String>,

        /// Group results: 'parity' or 'residue:<m>'
        #[arg(long)]
        classify: Option<String>,

        /// Reuse overlapping trajectory tails within the survey
        #[arg(long)]
        memoize: bool,

        /// Output path for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a profile or report JSON file
    Validate {
        /// Path to the JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Evaluate {
            start,
            max_steps,
            max_value,
            residues,
            output,
            summary,
        } => {
            let args = EvaluateArgs {
                start,
                max_steps,
                max_value,
                residues,
                output,
                print_summary: summary,
            };

            validate_evaluate_args(&args)?;
            execute_evaluate(args)?;
        }

        Commands::Survey {
            lo,
            hi,
            starts,
            max_steps,
            max_value,
            classify,
            memoize,
            output,
            summary,
        } => {
            let args = SurveyArgs {
                lo,
                hi,
                starts,
                max_steps,
                max_value,
                classify,
                memoize,
                output,
                print_summary: summary,
            };

            validate_survey_args(&args)?;
            execute_survey(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a profile or report JSON file
///
/// **Private** - internal command implementation
fn validate_report_file(file_path: PathBuf) -> Result<()> {
    use collatz_lab::output::{read_survey_report, read_trajectory_profile};

    println!("Validating file: {}", file_path.display());

    // A file is either a survey report or a single trajectory profile;
    // try the richer document first.
    if let Ok(report) = read_survey_report(&file_path) {
        println!("✓ Valid survey report JSON");
        println!("  Version: {}", report.version);
        println!("  Start set: {}", report.start_set);
        println!("  Evaluated: {}", report.summary.count);
        println!("  Converged: {}", report.summary.convergence_count);
        println!("  Groups: {}", report.summary.grouped.len());
        return Ok(());
    }

    let profile = read_trajectory_profile(&file_path)?;
    println!("✓ Valid trajectory profile JSON");
    println!("  Version: {}", profile.version);
    println!("  Start: {}", profile.trajectory.start);
    println!("  Steps: {}", profile.trajectory.steps);
    println!("  Peak: {}", profile.trajectory.max_value);
    println!("  Converged: {}", !profile.trajectory.truncated);

    Ok(())
}

/// Display schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("Collatz Lab Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Survey report structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  start_set: string        - Surveyed range or set description");
        println!("  max_steps: number        - Step ceiling per trajectory");
        println!("  max_value: string?       - Value ceiling (decimal, absent = unbounded)");
        println!("  classifier: string?      - Grouping scheme, if any");
        println!("  memoized: boolean        - Whether stopping times were memoized");
        println!("  summary: object          - Aggregated statistics");
        println!("    count: number          - Integers evaluated");
        println!("    convergence_count: number - Trajectories that reached 1");
        println!("    mean_steps: number?    - Mean steps over converged trajectories");
        println!("    median_steps: number?  - Median steps over converged trajectories");
        println!("    grouped: object        - Per-key sub-summaries of the same shape");
        println!("  generated_at: string     - RFC 3339 timestamp");
        println!();
        println!("Trajectory profile structure:");
        println!("  version: string          - Schema version");
        println!("  trajectory: object       - start, steps, terminal_value, max_value,");
        println!("                             truncated, residue_classes (big integers");
        println!("                             are decimal strings)");
        println!("  max_steps: number        - Step ceiling the evaluation ran under");
        println!("  max_value: string?       - Value ceiling (absent = unbounded)");
        println!("  generated_at: string     - RFC 3339 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Collatz Lab v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Bounded Collatz trajectory evaluation and range surveys.");
}
