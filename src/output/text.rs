//! Plain-text summaries for stdout.
//!
//! Presentation glue only: reads the fields of the result types and
//! formats them for the `--summary` flag.

use crate::aggregator::RangeSummary;
use crate::trajectory::TrajectoryResult;

/// Render a single trajectory as aligned key/value lines
///
/// **Public** - used by the evaluate command
pub fn render_trajectory_summary(result: &TrajectoryResult) -> String {
    let mut lines = Vec::new();

    lines.push(format!("{:<16} {}", "Start:", result.start));
    lines.push(format!("{:<16} {}", "Steps:", result.steps));
    lines.push(format!("{:<16} {}", "Terminal value:", result.terminal_value));
    lines.push(format!("{:<16} {}", "Peak value:", result.max_value));
    lines.push(format!(
        "{:<16} {}",
        "Converged:",
        if result.converged() { "yes" } else { "no (bound reached)" }
    ));

    if let Some(classes) = &result.residue_classes {
        let rendered: Vec<String> = classes
            .iter()
            .map(|(modulus, residue)| format!("{residue} (mod {modulus})"))
            .collect();
        lines.push(format!("{:<16} {}", "Residues:", rendered.join(", ")));
    }

    lines.join("\n")
}

/// Render a range summary, including one line per classification group
///
/// **Public** - used by the survey command
pub fn render_survey_summary(summary: &RangeSummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("{:<16} {}", "Evaluated:", summary.count));
    lines.push(format!(
        "{:<16} {} ({:.1}%)",
        "Converged:",
        summary.convergence_count,
        summary.convergence_ratio() * 100.0
    ));
    lines.push(format!(
        "{:<16} {}",
        "Mean steps:",
        render_stat(summary.mean_steps)
    ));
    lines.push(format!(
        "{:<16} {}",
        "Median steps:",
        render_stat(summary.median_steps)
    ));

    if !summary.grouped.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{:<20} {:>8} {:>10} {:>10} {:>10}",
            "Group", "Count", "Converged", "Mean", "Median"
        ));
        for (key, group) in &summary.grouped {
            lines.push(format!(
                "{:<20} {:>8} {:>10} {:>10} {:>10}",
                key,
                group.count,
                group.convergence_count,
                render_stat(group.mean_steps),
                render_stat(group.median_steps)
            ));
        }
    }

    lines.join("\n")
}

fn render_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "n/a".to_string(),
    }
}
