//! CSV ingest for lab tables.
//!
//! A lab table is headerless. The first `setup.mass_rows()` rows hold one mass
//! per trial column; column 0 holds a series shared by every trial, starting
//! at row 1; each remaining column holds one trial's measurements, starting
//! after the mass rows:
//!
//! ```text
//!            col 0          col 1        col 2
//! row 0      (label)        cart mass    cart mass
//! row 1      shared[0]      hanging      hanging        <- rolling cart
//! row 2      shared[1]      trial[0]     trial[0]
//! row 3..    shared[k-1]    trial[k-2]   trial[k-2]
//! ```
//!
//! So in the rolling-cart layout the first displacement sits beside the
//! hanging masses and pairs with each trial's first time one row below. An
//! empty column-0 cell on a mass row is skipped (the series then starts lower).
//!
//! Design goals:
//! - **Fail fast**: a malformed number anywhere is an error, never a default
//! - **No silent misalignment**: a value after a series has ended is an error
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{Axis, Masses, Setup, Trial};
use crate::error::AppError;

/// Ingest output: validated trials + a few counts for reporting.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub setup: Setup,
    pub trials: Vec<Trial>,
    pub rows_read: usize,
    /// Length of the shared column-0 series.
    pub shared_len: usize,
}

/// Open `path` and parse it as a table for `setup`.
pub fn load_trials(path: &Path, setup: Setup) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = parse_trials(file, setup).map_err(|e| e.context(path.display()))?;

    info!(
        path = %path.display(),
        setup = setup.display_name(),
        trials = data.trials.len(),
        rows = data.rows_read,
        "loaded lab table"
    );
    Ok(data)
}

/// Parse a lab table from any reader.
pub fn parse_trials<R: Read>(reader: R, setup: Setup) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: Vec<StringRecord> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AppError::input(format!("CSV parse error at row {idx}: {e}")))?;
        rows.push(record);
    }

    let mass_rows = setup.mass_rows();
    if rows.len() < mass_rows {
        return Err(AppError::input(format!(
            "Table has {} row(s); the {} layout needs {mass_rows} mass row(s) before the data.",
            rows.len(),
            setup.display_name()
        )));
    }

    let trial_columns = resolve_trial_columns(&rows)?;
    if trial_columns.is_empty() {
        return Err(AppError::input("Table has no trial columns (row 0 holds no masses)."));
    }

    let data_rows = &rows[mass_rows..];
    let shared_start = shared_start_row(&rows, mass_rows);
    let shared = read_series(&rows[shared_start..], shared_start, 0)?;

    let mut trials = Vec::with_capacity(trial_columns.len());
    for &col in &trial_columns {
        let masses = read_masses(&rows, setup, col)?;
        let values = read_series(data_rows, mass_rows, col)?;

        if values.len() > shared.len() {
            return Err(AppError::input(format!(
                "Trial column {col} has {} values but the shared column 0 has only {}.",
                values.len(),
                shared.len()
            )));
        }
        let shared_part = shared[..values.len()].to_vec();

        let (times, displacements) = match setup.shared_axis() {
            Axis::Displacement => (values, shared_part),
            Axis::Time => (shared_part, values),
        };
        debug!(column = col, samples = times.len(), label = %masses.label(), "parsed trial");
        trials.push(Trial::new(col, masses, times, displacements)?);
    }

    Ok(IngestedData {
        setup,
        trials,
        rows_read: rows.len(),
        shared_len: shared.len(),
    })
}

/// Trial columns are the columns (after 0) with a mass in row 0.
///
/// Any other column carrying data is rejected: it would otherwise be dropped
/// without notice.
fn resolve_trial_columns(rows: &[StringRecord]) -> Result<Vec<usize>, AppError> {
    let width = rows.iter().map(StringRecord::len).max().unwrap_or(0);
    let mut columns = Vec::new();

    for col in 1..width {
        if !cell(&rows[0], col).is_empty() {
            columns.push(col);
            continue;
        }
        if let Some(row) = rows.iter().position(|r| !cell(r, col).is_empty()) {
            return Err(AppError::input(format!(
                "Column {col} has a value at row {row} but no mass in row 0."
            )));
        }
    }

    Ok(columns)
}

/// First row of the shared column: row 1, unless column 0 is blank on the
/// remaining mass rows.
fn shared_start_row(rows: &[StringRecord], mass_rows: usize) -> usize {
    let mut start = 1;
    while start < mass_rows && rows.get(start).is_some_and(|r| cell(r, 0).is_empty()) {
        start += 1;
    }
    start.min(rows.len())
}

fn read_masses(rows: &[StringRecord], setup: Setup, col: usize) -> Result<Masses, AppError> {
    let cart = parse_required(rows, 0, col, "cart mass")?;
    match setup {
        Setup::FanCar => Ok(Masses::Single { cart }),
        Setup::RollingCart => {
            let hanging = parse_required(rows, 1, col, "hanging mass")?;
            Ok(Masses::Pair { cart, hanging })
        }
    }
}

fn parse_required(rows: &[StringRecord], row: usize, col: usize, what: &str) -> Result<f64, AppError> {
    let raw = cell(&rows[row], col);
    if raw.is_empty() {
        return Err(AppError::input(format!("Missing {what} at row {row}, column {col}.")));
    }
    parse_cell(raw, row, col)
}

/// Read one column of the data block up to its first empty cell.
///
/// `row_offset` converts data-block indices back to table rows for messages.
fn read_series(data_rows: &[StringRecord], row_offset: usize, col: usize) -> Result<Vec<f64>, AppError> {
    let mut values = Vec::new();
    let mut ended_at: Option<usize> = None;

    for (i, record) in data_rows.iter().enumerate() {
        let row = i + row_offset;
        let raw = cell(record, col);

        match (raw.is_empty(), ended_at) {
            (true, None) => ended_at = Some(row),
            (true, Some(_)) => {}
            (false, None) => values.push(parse_cell(raw, row, col)?),
            (false, Some(end)) => {
                return Err(AppError::input(format!(
                    "Column {col} has a value at row {row} after its series ended at row {end}."
                )));
            }
        }
    }

    Ok(values)
}

fn parse_cell(raw: &str, row: usize, col: usize) -> Result<f64, AppError> {
    let v = raw
        .parse::<f64>()
        .map_err(|_| AppError::input(format!("Row {row}, column {col}: '{raw}' is not a number.")))?;
    if !v.is_finite() {
        return Err(AppError::input(format!("Row {row}, column {col}: '{raw}' is not finite.")));
    }
    Ok(v)
}

fn cell(record: &StringRecord, col: usize) -> &str {
    // Excel sometimes prefixes the first cell with a UTF-8 BOM.
    record.get(col).map(|s| s.trim_start_matches('\u{feff}').trim()).unwrap_or("")
}
