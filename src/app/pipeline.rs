//! Shared analysis pipeline used by the `analyze` and `monte-carlo` commands.
//!
//! ingest -> per-trial fit + theory comparison -> optional Monte Carlo -> report
//!
//! Front-ends only decide what to print or write.

use tracing::info;

use crate::domain::{AnalysisConfig, AnalyzedTrial, MonteCarloResult, ReportFile};
use crate::error::AppError;
use crate::fit::{analyze_trials, run_monte_carlo_all};
use crate::io::ingest::{IngestedData, load_trials};
use crate::io::report::build_report;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub analyzed: Vec<AnalyzedTrial>,
    /// Empty unless the config requested Monte Carlo.
    pub monte_carlo: Vec<MonteCarloResult>,
    pub report: ReportFile,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    if !(config.gravity.is_finite() && config.gravity > 0.0) {
        return Err(AppError::usage(format!(
            "Gravity must be finite and > 0, got {}.",
            config.gravity
        )));
    }

    let ingest = load_trials(&config.csv_path, config.setup)?;
    let analyzed = analyze_trials(&ingest.trials, config.gravity)?;

    let monte_carlo = match &config.monte_carlo {
        Some(mc) => run_monte_carlo_all(&analyzed, mc)?,
        None => Vec::new(),
    };

    let report = build_report(config.setup, config.gravity, &analyzed, &monte_carlo);
    info!(
        trials = analyzed.len(),
        monte_carlo = monte_carlo.len(),
        "analysis complete"
    );

    Ok(RunOutput {
        ingest,
        analyzed,
        monte_carlo,
        report,
    })
}
