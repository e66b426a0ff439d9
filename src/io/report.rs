//! Read/write the JSON analysis report.
//!
//! The report is the portable record of a run:
//! - setup and gravity used
//! - every trial's raw series, fit, and comparison against theory
//! - Monte Carlo samples and summary when the sensitivity analysis ran
//!
//! `kfit plot --report` re-renders charts from it without the original CSV.
//! The schema is defined by `domain::ReportFile`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::Utc;

use crate::domain::{AnalyzedTrial, MonteCarloReport, MonteCarloResult, ReportFile, Setup, TrialReport};
use crate::error::AppError;

/// Assemble a report from in-memory results.
pub fn build_report(
    setup: Setup,
    gravity: f64,
    analyzed: &[AnalyzedTrial],
    monte_carlo: &[MonteCarloResult],
) -> ReportFile {
    let trials = analyzed
        .iter()
        .map(|a| {
            let column = a.trial.column();
            let mc = monte_carlo.iter().find(|m| m.column == column).map(|m| MonteCarloReport {
                sigma: m.sigma,
                seed: m.seed,
                summary: m.summary,
                accelerations: m.accelerations.clone(),
            });
            TrialReport {
                column,
                label: a.trial.label(),
                masses: *a.trial.masses(),
                times: a.trial.times().to_vec(),
                displacements: a.trial.displacements().to_vec(),
                fit: a.fit,
                acceleration: a.acceleration(),
                expected_acceleration: a.expected_acceleration,
                relative_error: a.relative_error,
                monte_carlo: mc,
            }
        })
        .collect();

    ReportFile {
        tool: "kfit".to_string(),
        generated_at: Utc::now(),
        setup,
        gravity,
        trials,
    }
}

/// Write a report JSON file.
pub fn write_report_json(path: &Path, report: &ReportFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .map_err(|e| AppError::usage(format!("Failed to write report JSON: {e}")))?;

    Ok(())
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<ReportFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: ReportFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::input(format!("Invalid report JSON '{}': {e}", path.display())))?;

    if let Some(t) = report.trials.iter().find(|t| t.times.len() != t.displacements.len()) {
        return Err(AppError::input(format!(
            "Report trial column {} has {} times but {} displacements.",
            t.column,
            t.times.len(),
            t.displacements.len()
        )));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Masses, MonteCarloConfig, STANDARD_GRAVITY, Trial};
    use crate::fit::{analyze_trial, run_monte_carlo};

    #[test]
    fn report_survives_disk() {
        let displacements: Vec<f64> = (1..=6).map(|i| 0.2 * i as f64).collect();
        let times: Vec<f64> = displacements.iter().map(|d| (2.0 * d / 0.5).sqrt()).collect();
        let masses = Masses::Pair {
            cart: 1.0,
            hanging: 0.06,
        };
        let trial = Trial::new(1, masses, times, displacements).unwrap();
        let analyzed = vec![analyze_trial(&trial, STANDARD_GRAVITY).unwrap()];
        let mc_config = MonteCarloConfig {
            sigma: 0.01,
            samples: 25,
            seed: 5,
            bins: 10,
        };
        let mc = vec![run_monte_carlo(&analyzed[0], &mc_config).unwrap()];

        let report = build_report(Setup::RollingCart, STANDARD_GRAVITY, &analyzed, &mc);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_json(&path, &report).unwrap();
        let loaded = read_report_json(&path).unwrap();

        assert_eq!(loaded.tool, "kfit");
        assert_eq!(loaded.setup, Setup::RollingCart);
        assert_eq!(loaded.trials.len(), 1);
        let t = &loaded.trials[0];
        assert_eq!(t.masses, masses);
        assert_eq!(t.times, trial.times());
        assert_eq!(t.acceleration, analyzed[0].acceleration());
        let lm = t.monte_carlo.as_ref().unwrap();
        assert_eq!(lm.accelerations, mc[0].accelerations);
    }

    #[test]
    fn missing_report_is_usage_error() {
        let err = read_report_json(Path::new("/nonexistent/report.json")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }
}
