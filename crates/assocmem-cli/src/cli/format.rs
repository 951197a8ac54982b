//! Output formatting utilities

use assocmem_core::hopfield::load_ratio;
use assocmem_core::scan::OverlapSeries;
use assocmem_core::{EncodedPattern, RecallTrajectory, Termination};
use colored::*;
use serde::Serialize;
use std::fmt::Display;

/// Chart size used for terminal output
pub const CHART_WIDTH: usize = 60;
pub const CHART_HEIGHT: usize = 12;

/// Format error message
pub fn format_error(msg: &str) -> String {
    format!("{} {}", "Error:".red().bold(), msg)
}

/// Format success message
pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg)
}

/// Format warning message
pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), msg)
}

/// Format info message
pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

pub fn format_termination(termination: Termination) -> String {
    match termination {
        Termination::Converged { step } => format!("converged at step {}", step),
        Termination::StepBudgetExhausted => "step budget exhausted".to_string(),
    }
}

/// Summary block for one recall run
pub fn format_recall_summary(encoded: &EncodedPattern, trajectory: &RecallTrajectory) -> String {
    let parameters = trajectory.parameters();
    let termination = format_termination(trajectory.termination());
    let termination = if trajectory.converged() {
        termination.green()
    } else {
        termination.yellow()
    };

    format!(
        "\n{}\n  Units: {} ({}x{})\n  Patterns: {} (load {:.4})\n  Requested m0: {}\n  Initial overlap: {:.4}\n  Final overlap: {:.4}\n  Steps: {}\n  Termination: {}\n",
        "Recall Summary".bold().green(),
        encoded.len().to_string().cyan(),
        encoded.width(),
        encoded.height(),
        parameters.patterns.to_string().cyan(),
        load_ratio(parameters.patterns, encoded.len()),
        parameters.m0,
        trajectory.initial_overlap(),
        trajectory.final_overlap(),
        trajectory.updates(),
        termination
    )
}

/// One line per scan point
pub fn format_series_line<T: Display>(label: &str, series: &OverlapSeries<T>) -> String {
    format!(
        "  {} = {:<8} final m = {:>7.4}  steps = {:>3}  {}",
        label,
        series.parameter.to_string(),
        series.final_overlap(),
        series.updates(),
        format_termination(series.termination).dimmed()
    )
}

/// Machine-readable recall result
#[derive(Debug, Serialize)]
pub struct RecallReport<'a> {
    pub width: usize,
    pub height: usize,
    pub trajectory_overlaps: Vec<f64>,
    pub termination: Termination,
    pub parameters: assocmem_core::RecallParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames_dir: Option<&'a str>,
}

pub fn format_recall_json(report: &RecallReport<'_>) -> anyhow::Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| anyhow::anyhow!("Failed to serialize to JSON: {}", e))
}
