//! Formatted terminal output: run header, per-trial results, Monte Carlo.
//!
//! Formatters take report types so a saved JSON report prints exactly like a
//! live run.

use crate::domain::{AnalysisConfig, ReportFile, TrialReport};
use crate::io::ingest::IngestedData;
use crate::report::fmt_relative_error;

/// Header: setup, source file, table shape, gravity and Monte Carlo settings.
pub fn format_run_summary(ingest: &IngestedData, config: &AnalysisConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== kfit - kinematics fit ({}) ===\n",
        config.setup.display_name()
    ));
    out.push_str(&format!("Source: {}\n", config.csv_path.display()));
    out.push_str(&format!(
        "Table: rows={} | shared {} values={} | trials={}\n",
        ingest.rows_read,
        ingest.setup.shared_axis().label(),
        ingest.shared_len,
        ingest.trials.len()
    ));
    out.push_str(&format!("Gravity: {} m/s^2\n", config.gravity));
    if let Some(mc) = &config.monte_carlo {
        out.push_str(&format!(
            "Monte Carlo: sigma={} s | samples={} | seed={} | bins={}\n",
            mc.sigma, mc.samples, mc.seed, mc.bins
        ));
    }
    out.push('\n');

    out
}

/// Header for a re-rendered report.
pub fn format_report_header(report: &ReportFile) -> String {
    format!(
        "=== {} report ({}) ===\nGenerated: {}\nGravity: {} m/s^2\n\n",
        report.tool,
        report.setup.display_name(),
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.gravity
    )
}

/// Per-trial fit table followed by one relative-error line per trial.
pub fn format_trials(trials: &[TrialReport]) -> String {
    let mut out = String::new();

    out.push_str("Quadratic fits (d = a t^2 + b t + c):\n");
    out.push_str(
        format!(
            "{:>5} {:<18} {:>4} {:>11} {:>11} {:>11} {:>11} {:>11} {:>9} {:>9}",
            "col", "masses", "n", "a", "b", "c", "accel", "expected", "rel.err", "R^2"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<5} {:-<18} {:-<4} {:-<11} {:-<11} {:-<11} {:-<11} {:-<11} {:-<9} {:-<9}",
            "", "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for t in trials {
        out.push_str(
            format!(
                "{:>5} {:<18} {:>4} {:>11.5} {:>11.5} {:>11.5} {:>11.5} {:>11} {:>9} {:>9.5}",
                t.column,
                truncate(&t.label, 18),
                t.fit.quality.n,
                t.fit.a,
                t.fit.b,
                t.fit.c,
                t.acceleration,
                t.expected_acceleration.map(|e| format!("{e:.5}")).unwrap_or_else(|| "n/a".to_string()),
                fmt_relative_error(t.expected_acceleration, t.relative_error),
                t.fit.quality.r_squared,
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out.push('\n');

    for t in trials {
        if t.expected_acceleration.is_some() {
            out.push_str(&format!(
                "Relative error for trial {}: {}\n",
                t.label,
                fmt_relative_error(t.expected_acceleration, t.relative_error)
            ));
        }
    }

    out
}

/// Monte Carlo summary table; empty when no trial carries samples.
pub fn format_monte_carlo(trials: &[TrialReport]) -> String {
    let rows: Vec<_> = trials
        .iter()
        .filter_map(|t| t.monte_carlo.as_ref().map(|mc| (t, mc)))
        .collect();
    if rows.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str("Monte Carlo timing-noise sensitivity:\n");
    out.push_str(
        format!(
            "{:>5} {:<18} {:>7} {:>8} {:>11} {:>11} {:>11} {:>11} {:>9}",
            "col", "masses", "sigma", "samples", "mean", "std", "p2.5", "p97.5", "rel.err"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<5} {:-<18} {:-<7} {:-<8} {:-<11} {:-<11} {:-<11} {:-<11} {:-<9}",
            "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (t, mc) in rows {
        out.push_str(
            format!(
                "{:>5} {:<18} {:>7.3} {:>8} {:>11.5} {:>11.5} {:>11.5} {:>11.5} {:>9}",
                t.column,
                truncate(&t.label, 18),
                mc.sigma,
                mc.accelerations.len(),
                mc.summary.mean,
                mc.summary.std_dev,
                mc.summary.p025,
                mc.summary.p975,
                fmt_relative_error(t.expected_acceleration, t.relative_error),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out.push('\n');

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
