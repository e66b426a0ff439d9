//! Terminal reporting.
//!
//! Everything printed to stdout is built here as plain `String`s so the
//! pipeline and fitting code never touch formatting, and output changes stay
//! localized (and testable without capturing stdout).

pub mod format;

pub use format::*;

/// Relative error as a percentage, `n/a` when there is no expectation.
pub fn fmt_percent(relative_error: Option<f64>) -> String {
    match relative_error {
        Some(e) => format!("{:5.2}%", e * 100.0),
        None => "n/a".to_string(),
    }
}

/// Relative error of a reported trial; `undefined` when the expectation is zero.
pub fn fmt_relative_error(expected_acceleration: Option<f64>, relative_error: Option<f64>) -> String {
    match (expected_acceleration, relative_error) {
        (Some(_), None) => "undefined".to_string(),
        (_, rel) => fmt_percent(rel),
    }
}
