//! Export per-trial results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets alongside the
//! original lab table: one row per trial column.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{AnalyzedTrial, MonteCarloResult};
use crate::error::AppError;

const HEADER: &str = "column,label,cart_mass,hanging_mass,samples,a,b,c,acceleration,\
expected_acceleration,relative_error,rmse,r_squared,mc_mean,mc_std_dev,mc_p025,mc_p975";

/// Write per-trial results to a CSV file.
///
/// Monte Carlo columns are left empty for trials without a matching result.
pub fn write_results_csv(
    path: &Path,
    analyzed: &[AnalyzedTrial],
    monte_carlo: &[MonteCarloResult],
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    write_results(&mut out, analyzed, monte_carlo)
        .and_then(|()| out.flush())
        .map_err(|e| AppError::usage(format!("Failed to write export CSV '{}': {e}", path.display())))
}

fn write_results<W: Write>(
    out: &mut W,
    analyzed: &[AnalyzedTrial],
    monte_carlo: &[MonteCarloResult],
) -> std::io::Result<()> {
    writeln!(out, "{HEADER}")?;

    for a in analyzed {
        let t = &a.trial;
        let q = &a.fit.quality;
        let mc = monte_carlo.iter().find(|m| m.column == t.column());

        writeln!(
            out,
            "{},\"{}\",{},{},{},{:.10},{:.10},{:.10},{:.10},{},{},{:.10},{:.6},{},{},{},{}",
            t.column(),
            t.label(),
            t.masses().cart(),
            opt(t.masses().hanging()),
            t.len(),
            a.fit.a,
            a.fit.b,
            a.fit.c,
            a.acceleration(),
            opt_fixed(a.expected_acceleration),
            opt_fixed(a.relative_error),
            q.rmse,
            q.r_squared,
            opt_fixed(mc.map(|m| m.summary.mean)),
            opt_fixed(mc.map(|m| m.summary.std_dev)),
            opt_fixed(mc.map(|m| m.summary.p025)),
            opt_fixed(mc.map(|m| m.summary.p975)),
        )?;
    }

    Ok(())
}

fn opt(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_fixed(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.10}")).unwrap_or_default()
}
