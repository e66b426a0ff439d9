//! Quadratic least-squares fitting.
//!
//! Given times `t_i` and displacements `d_i` we solve
//!
//! ```text
//! minimize Σ (a·t_i² + b·t_i + c − d_i)²
//! ```
//!
//! and report the coefficients plus quality diagnostics. Acceleration is `2a`.
//!
//! Degenerate input policy: a quadratic has three unknowns, so at least three
//! *distinct* times are required. Fewer is rejected with a fit error instead of
//! returning a minimum-norm (and physically meaningless) solution.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::domain::{AnalyzedTrial, FitQuality, QuadraticFit, Trial};
use crate::error::AppError;
use crate::math::solve_least_squares;
use crate::models::{COEFF_LEN, expected_for_masses, fill_design_row, predict, relative_error};

/// Minimum number of distinct times for a well-determined quadratic.
pub const MIN_DISTINCT_TIMES: usize = COEFF_LEN;

/// Fit `d(t) = a·t² + b·t + c` to index-aligned samples.
///
/// `times` need not be sorted (perturbed Monte Carlo times may cross).
pub fn fit_quadratic(times: &[f64], displacements: &[f64]) -> Result<QuadraticFit, AppError> {
    if times.is_empty() {
        return Err(AppError::fit("No data points to fit."));
    }
    if times.len() != displacements.len() {
        return Err(AppError::fit(format!(
            "Series length mismatch: {} times vs {} displacements.",
            times.len(),
            displacements.len()
        )));
    }
    if times.iter().chain(displacements.iter()).any(|v| !v.is_finite()) {
        return Err(AppError::fit("Non-finite value in fit input."));
    }

    let distinct = count_distinct(times);
    if distinct < MIN_DISTINCT_TIMES {
        return Err(AppError::fit(format!(
            "Quadratic fit needs at least {MIN_DISTINCT_TIMES} distinct times, got {distinct}."
        )));
    }

    let n = times.len();
    let mut x = DMatrix::<f64>::zeros(n, COEFF_LEN);
    let mut row = [0.0; COEFF_LEN];
    for (i, &t) in times.iter().enumerate() {
        fill_design_row(t, &mut row);
        for (j, v) in row.iter().enumerate() {
            x[(i, j)] = *v;
        }
    }
    let y = DVector::from_column_slice(displacements);

    let beta = solve_least_squares(&x, &y)
        .ok_or_else(|| AppError::fit("Least squares solve failed (ill-conditioned times)."))?;
    let coeffs = [beta[0], beta[1], beta[2]];

    let quality = fit_quality(&coeffs, times, displacements);
    Ok(QuadraticFit {
        a: coeffs[0],
        b: coeffs[1],
        c: coeffs[2],
        quality,
    })
}

/// Fit a trial and compare its acceleration against theory.
pub fn analyze_trial(trial: &Trial, gravity: f64) -> Result<AnalyzedTrial, AppError> {
    let context = format!("Trial column {}", trial.column());

    let fit = fit_quadratic(trial.times(), trial.displacements()).map_err(|e| e.context(&context))?;
    let expected_acceleration =
        expected_for_masses(trial.masses(), gravity).map_err(|e| e.context(&context))?;
    // A zero expectation (no hanging mass) leaves the ratio undefined; the
    // trial is still reported so the rest of the table is not lost.
    let relative_error = match expected_acceleration {
        Some(expected) if expected == 0.0 => {
            warn!(
                column = trial.column(),
                "expected acceleration is zero; relative error is undefined"
            );
            None
        }
        Some(expected) => {
            Some(relative_error(expected, fit.acceleration()).map_err(|e| e.context(&context))?)
        }
        None => None,
    };

    debug!(
        column = trial.column(),
        a = fit.a,
        b = fit.b,
        c = fit.c,
        acceleration = fit.acceleration(),
        rmse = fit.quality.rmse,
        "fitted trial"
    );

    Ok(AnalyzedTrial {
        trial: trial.clone(),
        fit,
        expected_acceleration,
        relative_error,
    })
}

/// Analyze every trial, stopping at the first failure.
pub fn analyze_trials(trials: &[Trial], gravity: f64) -> Result<Vec<AnalyzedTrial>, AppError> {
    trials.iter().map(|t| analyze_trial(t, gravity)).collect()
}

fn fit_quality(coeffs: &[f64; COEFF_LEN], times: &[f64], displacements: &[f64]) -> FitQuality {
    let n = times.len();
    let sse: f64 = times
        .iter()
        .zip(displacements.iter())
        .map(|(&t, &d)| {
            let r = d - predict(coeffs, t);
            r * r
        })
        .sum();

    let mean = displacements.iter().sum::<f64>() / n as f64;
    let sst: f64 = displacements.iter().map(|d| (d - mean) * (d - mean)).sum();
    // A flat series is explained perfectly by the constant term.
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };

    FitQuality {
        sse,
        rmse: (sse / n as f64).sqrt(),
        r_squared,
        n,
    }
}

fn count_distinct(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Masses, STANDARD_GRAVITY};

    fn kinematic_series(alpha: f64, v0: f64, d0: f64, n: usize) -> (Vec<f64>, Vec<f64>) {
        let times: Vec<f64> = (0..n).map(|i| 0.1 * i as f64).collect();
        let displacements = times
            .iter()
            .map(|&t| 0.5 * alpha * t * t + v0 * t + d0)
            .collect();
        (times, displacements)
    }

    #[test]
    fn recovers_noise_free_kinematics() {
        let (alpha, v0, d0) = (2.4, 0.3, 0.05);
        let (t, d) = kinematic_series(alpha, v0, d0, 25);

        let fit = fit_quadratic(&t, &d).unwrap();
        assert!((fit.a - alpha / 2.0).abs() < 1e-9, "a={}", fit.a);
        assert!((fit.b - v0).abs() < 1e-9, "b={}", fit.b);
        assert!((fit.c - d0).abs() < 1e-9, "c={}", fit.c);
        assert!((fit.acceleration() - alpha).abs() < 1e-8);
        assert!(fit.quality.sse < 1e-18);
        assert!((fit.quality.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(fit.quality.n, 25);
    }

    #[test]
    fn three_points_interpolate_exactly() {
        let t = [0.0, 1.0, 2.0];
        let d = [1.0, 2.0, 5.0]; // t^2 + 1
        let fit = fit_quadratic(&t, &d).unwrap();
        assert!((fit.a - 1.0).abs() < 1e-10);
        assert!(fit.b.abs() < 1e-10);
        assert!((fit.c - 1.0).abs() < 1e-10);
    }

    #[test]
    fn rejects_fewer_than_three_distinct_times() {
        let err = fit_quadratic(&[0.0, 1.0], &[0.0, 1.0]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_FIT);

        let err = fit_quadratic(&[1.0, 1.0, 2.0, 2.0], &[0.0, 0.1, 0.2, 0.3]).unwrap_err();
        assert!(err.message().contains("got 2"), "{err}");
    }

    #[test]
    fn rejects_mismatch_and_empty() {
        assert!(fit_quadratic(&[], &[]).is_err());
        assert!(fit_quadratic(&[0.0, 1.0, 2.0], &[0.0, 1.0]).is_err());
        assert!(fit_quadratic(&[0.0, 1.0, f64::NAN], &[0.0, 1.0, 2.0]).is_err());
    }

    #[test]
    fn unsorted_times_fit_the_same_curve() {
        let (t, d) = kinematic_series(1.0, 0.0, 0.0, 6);
        let mut pairs: Vec<(f64, f64)> = t.into_iter().zip(d).collect();
        pairs.reverse();
        let (t, d): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let fit = fit_quadratic(&t, &d).unwrap();
        assert!((fit.acceleration() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn exact_data_has_zero_error() {
        let (t, d) = kinematic_series(0.8, 0.1, 0.0, 10);
        let fit = fit_quadratic(&t, &d).unwrap();
        assert!(fit.quality.rmse < 1e-10);
        assert!((fit.quality.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn analyze_trial_reports_relative_error() {
        // α = 0.1 / (0.1 + 0.9) · 9.81 = 0.981, data generated with α = 0.9
        let (t, d) = kinematic_series(0.9, 0.0, 0.0, 12);
        let masses = Masses::Pair {
            cart: 0.9,
            hanging: 0.1,
        };
        let trial = Trial::new(1, masses, t, d).unwrap();
        let analyzed = analyze_trial(&trial, STANDARD_GRAVITY).unwrap();

        let expected = analyzed.expected_acceleration.unwrap();
        assert!((expected - 0.981).abs() < 1e-12);
        let rel = analyzed.relative_error.unwrap();
        assert!((rel - (0.981f64 - 0.9).abs() / 0.981).abs() < 1e-8, "rel={rel}");
    }

    #[test]
    fn analyze_trial_without_expectation() {
        let (t, d) = kinematic_series(0.5, 0.0, 0.0, 5);
        let trial = Trial::new(2, Masses::Single { cart: 1.2 }, t, d).unwrap();
        let analyzed = analyze_trial(&trial, STANDARD_GRAVITY).unwrap();
        assert_eq!(analyzed.expected_acceleration, None);
        assert_eq!(analyzed.relative_error, None);
    }

    #[test]
    fn zero_expectation_keeps_fit_without_relative_error() {
        let (t, d) = kinematic_series(0.5, 0.0, 0.0, 5);
        let masses = Masses::Pair {
            cart: 1.0,
            hanging: 0.0,
        };
        let trial = Trial::new(4, masses, t, d).unwrap();
        let analyzed = analyze_trial(&trial, STANDARD_GRAVITY).unwrap();
        assert_eq!(analyzed.expected_acceleration, Some(0.0));
        assert_eq!(analyzed.relative_error, None);
        assert!((analyzed.acceleration() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_total_mass_is_still_an_error() {
        let (t, d) = kinematic_series(0.5, 0.0, 0.0, 5);
        let masses = Masses::Pair {
            cart: 0.0,
            hanging: 0.0,
        };
        let trial = Trial::new(4, masses, t, d).unwrap();
        let err = analyze_trial(&trial, STANDARD_GRAVITY).unwrap_err();
        assert!(err.message().starts_with("Trial column 4"), "{err}");
    }
}
