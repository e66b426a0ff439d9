//! Shared domain types.
//!
//! These types are used in-memory by the fit pipeline; the `*Report` types at
//! the bottom are the serializable form written to (and reloaded from) the
//! JSON report.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard gravitational acceleration used by the lab write-ups (m/s²).
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Which lab setup produced the table.
///
/// The setup decides how many mass rows head the table and which quantity
/// lives in the shared first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Setup {
    /// Cart on a track pulled by a hanging mass over a pulley.
    ///
    /// Row 0 holds cart masses, row 1 hanging masses, column 0 displacements,
    /// trial columns hold the times at which each displacement was reached.
    RollingCart,
    /// Fan-propelled car.
    ///
    /// Row 0 holds car masses, column 0 times, trial columns displacements.
    FanCar,
}

impl Setup {
    pub fn display_name(self) -> &'static str {
        match self {
            Setup::RollingCart => "rolling cart",
            Setup::FanCar => "fan car",
        }
    }

    /// Number of leading rows that hold per-trial masses.
    pub fn mass_rows(self) -> usize {
        match self {
            Setup::RollingCart => 2,
            Setup::FanCar => 1,
        }
    }

    /// Quantity stored in column 0 (shared by all trials).
    pub fn shared_axis(self) -> Axis {
        match self {
            Setup::RollingCart => Axis::Displacement,
            Setup::FanCar => Axis::Time,
        }
    }

    /// Legend title used on charts.
    pub fn legend_title(self) -> &'static str {
        match self {
            Setup::RollingCart => "(hanging mass, cart mass)",
            Setup::FanCar => "car mass",
        }
    }
}

/// A measured quantity in the input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Time,
    Displacement,
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Axis::Time => "time",
            Axis::Displacement => "displacement",
        }
    }
}

/// Masses recorded for a trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Masses {
    /// Only the driven mass is known (fan car).
    Single { cart: f64 },
    /// Driven cart mass plus the hanging mass that pulls it.
    Pair { cart: f64, hanging: f64 },
}

impl Masses {
    pub fn cart(&self) -> f64 {
        match *self {
            Masses::Single { cart } | Masses::Pair { cart, .. } => cart,
        }
    }

    pub fn hanging(&self) -> Option<f64> {
        match *self {
            Masses::Single { .. } => None,
            Masses::Pair { hanging, .. } => Some(hanging),
        }
    }

    /// Short legend label: `(hanging, cart)` or `cart`.
    pub fn label(&self) -> String {
        match *self {
            Masses::Single { cart } => format!("{cart}"),
            Masses::Pair { cart, hanging } => format!("({hanging}, {cart})"),
        }
    }

    fn validate(&self) -> Result<(), String> {
        let check = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(format!("{name} mass must be finite and >= 0, got {v}"))
            }
        };
        match *self {
            Masses::Single { cart } => check("cart", cart),
            Masses::Pair { cart, hanging } => {
                check("cart", cart)?;
                check("hanging", hanging)
            }
        }
    }
}

/// One experimental run: masses plus an index-aligned time/displacement series.
///
/// Construction validates the series, so a `Trial` in hand always satisfies:
/// - `times.len() == displacements.len() > 0`
/// - every value is finite
/// - `times` is strictly increasing
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    column: usize,
    masses: Masses,
    times: Vec<f64>,
    displacements: Vec<f64>,
}

impl Trial {
    /// `column` is the 0-based table column the trial was read from (column 0
    /// holds the shared series, so trials start at 1).
    pub fn new(
        column: usize,
        masses: Masses,
        times: Vec<f64>,
        displacements: Vec<f64>,
    ) -> Result<Self, AppError> {
        let fail = |msg: String| AppError::input(format!("Trial column {column}: {msg}"));

        masses.validate().map_err(fail)?;
        if times.is_empty() {
            return Err(fail("series is empty".to_string()));
        }
        if times.len() != displacements.len() {
            return Err(fail(format!(
                "{} times but {} displacements",
                times.len(),
                displacements.len()
            )));
        }
        if let Some(i) = times.iter().position(|t| !t.is_finite()) {
            return Err(fail(format!("non-finite time at sample {}", i + 1)));
        }
        if let Some(i) = displacements.iter().position(|d| !d.is_finite()) {
            return Err(fail(format!("non-finite displacement at sample {}", i + 1)));
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(fail(format!(
                "times must be strictly increasing (sample {} = {} after {})",
                i + 2,
                times[i + 1],
                times[i]
            )));
        }

        Ok(Self {
            column,
            masses,
            times,
            displacements,
        })
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn masses(&self) -> &Masses {
        &self.masses
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn displacements(&self) -> &[f64] {
        &self.displacements
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn label(&self) -> String {
        self.masses.label()
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub r_squared: f64,
    pub n: usize,
}

/// Least-squares quadratic `d(t) = a·t² + b·t + c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub quality: FitQuality,
}

impl QuadraticFit {
    /// Constant acceleration implied by the fit.
    ///
    /// Under constant acceleration `α`, `d(t) = ½αt² + v₀t + d₀`, so `α = 2a`.
    pub fn acceleration(&self) -> f64 {
        2.0 * self.a
    }

    pub fn coefficients(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }

    pub fn predict(&self, t: f64) -> f64 {
        crate::models::predict(&self.coefficients(), t)
    }
}

/// A trial together with its fit and comparison against theory.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedTrial {
    pub trial: Trial,
    pub fit: QuadraticFit,
    /// `None` when the setup has no closed-form expectation (fan car).
    pub expected_acceleration: Option<f64>,
    /// `|expected - fitted| / |expected|`; `None` without an expectation or
    /// when the expectation is zero (ratio undefined).
    pub relative_error: Option<f64>,
}

impl AnalyzedTrial {
    pub fn acceleration(&self) -> f64 {
        self.fit.acceleration()
    }
}

/// Monte Carlo settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Standard deviation of the Gaussian timing noise (seconds).
    pub sigma: f64,
    /// Number of perturbed refits per trial.
    pub samples: usize,
    pub seed: u64,
    /// Histogram bins for terminal/SVG output.
    pub bins: usize,
}

/// Summary statistics of the sampled accelerations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    pub mean: f64,
    /// Sample standard deviation (`n - 1` denominator; 0 for a single sample).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p025: f64,
    pub p975: f64,
}

/// Monte Carlo output for one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloResult {
    pub column: usize,
    pub sigma: f64,
    pub seed: u64,
    /// One acceleration per iteration, in iteration order.
    pub accelerations: Vec<f64>,
    /// Acceleration of the unperturbed fit.
    pub point_estimate: f64,
    pub expected_acceleration: Option<f64>,
    /// Computed once from the unperturbed fit.
    pub relative_error: Option<f64>,
    pub summary: MonteCarloSummary,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    pub setup: Setup,
    pub gravity: f64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    /// Directory for SVG charts (none written when unset).
    pub svg_dir: Option<PathBuf>,
    pub export_results: Option<PathBuf>,
    pub export_report: Option<PathBuf>,

    /// Monte Carlo settings; `None` skips the sensitivity analysis.
    pub monte_carlo: Option<MonteCarloConfig>,
}

/// A saved analysis (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub setup: Setup,
    pub gravity: f64,
    pub trials: Vec<TrialReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialReport {
    pub column: usize,
    pub label: String,
    pub masses: Masses,
    pub times: Vec<f64>,
    pub displacements: Vec<f64>,
    pub fit: QuadraticFit,
    pub acceleration: f64,
    pub expected_acceleration: Option<f64>,
    pub relative_error: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<MonteCarloReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloReport {
    pub sigma: f64,
    pub seed: u64,
    pub summary: MonteCarloSummary,
    pub accelerations: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Masses {
        Masses::Pair {
            cart: 0.5,
            hanging: 0.05,
        }
    }

    #[test]
    fn trial_rejects_length_mismatch() {
        let err = Trial::new(1, pair(), vec![0.0, 1.0], vec![0.0]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("2 times but 1 displacements"));
    }

    #[test]
    fn trial_rejects_unsorted_times() {
        let err = Trial::new(3, pair(), vec![0.0, 1.0, 1.0], vec![0.0, 0.1, 0.2]).unwrap_err();
        assert!(err.message().contains("strictly increasing"), "{err}");
        assert!(err.message().starts_with("Trial column 3"));
    }

    #[test]
    fn trial_rejects_negative_mass() {
        let masses = Masses::Single { cart: -1.0 };
        assert!(Trial::new(1, masses, vec![0.0], vec![0.0]).is_err());
    }

    #[test]
    fn trial_accessors() {
        let t = Trial::new(2, pair(), vec![0.5, 1.0, 2.0], vec![0.1, 0.4, 0.3]).unwrap();
        assert_eq!(t.len(), 3);
        assert!(!t.is_empty());
        assert_eq!(t.column(), 2);
        assert_eq!(t.label(), "(0.05, 0.5)");
    }

    #[test]
    fn acceleration_is_twice_leading_coefficient() {
        let fit = QuadraticFit {
            a: 0.123_456_789,
            b: 1.0,
            c: 2.0,
            quality: FitQuality {
                sse: 0.0,
                rmse: 0.0,
                r_squared: 1.0,
                n: 3,
            },
        };
        assert_eq!(fit.acceleration(), 2.0 * 0.123_456_789);
    }
}
