//! Monte Carlo sensitivity of the fitted acceleration to timing noise.
//!
//! Each iteration jitters every recorded time with `ε ~ Normal(0, σ)`, keeps
//! the displacements as measured, refits the quadratic and records `2a`. The
//! spread of the recorded accelerations shows how much stopwatch error alone
//! can move the result.
//!
//! Iterations are independent, so they run on the rayon pool. Iteration `k`
//! owns an RNG seeded from `(seed, trial column, k)`; output is therefore
//! identical for equal seeds no matter how the work is scheduled.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{AnalyzedTrial, MonteCarloConfig, MonteCarloResult};
use crate::error::AppError;
use crate::fit::fit_quadratic;
use crate::math::summarize;

/// Check Monte Carlo settings before any work is scheduled.
pub fn validate_config(config: &MonteCarloConfig) -> Result<(), AppError> {
    if config.samples == 0 {
        return Err(AppError::usage("Monte Carlo sample count must be >= 1."));
    }
    if !(config.sigma.is_finite() && config.sigma >= 0.0) {
        return Err(AppError::usage(format!(
            "Timing noise sigma must be finite and >= 0, got {}.",
            config.sigma
        )));
    }
    if config.bins == 0 {
        return Err(AppError::usage("Histogram bin count must be >= 1."));
    }
    Ok(())
}

/// Refit `samples` noisy copies of the series and return their accelerations.
///
/// The result has exactly `samples` entries, in iteration order.
pub fn sample_accelerations(
    times: &[f64],
    displacements: &[f64],
    sigma: f64,
    samples: usize,
    seed: u64,
) -> Result<Vec<f64>, AppError> {
    let noise = Normal::new(0.0, sigma)
        .map_err(|e| AppError::usage(format!("Noise distribution error: {e}")))?;

    (0..samples)
        .into_par_iter()
        .map(|k| {
            let mut rng = StdRng::seed_from_u64(iteration_seed(seed, k as u64));
            let perturbed: Vec<f64> = times.iter().map(|&t| t + noise.sample(&mut rng)).collect();
            fit_quadratic(&perturbed, displacements)
                .map(|fit| fit.acceleration())
                .map_err(|e| e.context(format!("Monte Carlo iteration {k}")))
        })
        .collect()
}

/// Run the estimator for one analysed trial.
pub fn run_monte_carlo(
    analyzed: &AnalyzedTrial,
    config: &MonteCarloConfig,
) -> Result<MonteCarloResult, AppError> {
    validate_config(config)?;

    let column = analyzed.trial.column();
    let trial_seed = mix(config.seed ^ mix(column as u64));

    debug!(column, sigma = config.sigma, samples = config.samples, "starting Monte Carlo");
    let accelerations = sample_accelerations(
        analyzed.trial.times(),
        analyzed.trial.displacements(),
        config.sigma,
        config.samples,
        trial_seed,
    )
    .map_err(|e| e.context(format!("Trial column {column}")))?;

    let summary = summarize(&accelerations).ok_or_else(|| {
        AppError::fit(format!(
            "Trial column {column}: Monte Carlo produced no usable accelerations."
        ))
    })?;

    info!(
        column,
        mean = summary.mean,
        std_dev = summary.std_dev,
        "Monte Carlo finished"
    );

    Ok(MonteCarloResult {
        column,
        sigma: config.sigma,
        seed: config.seed,
        accelerations,
        point_estimate: analyzed.acceleration(),
        expected_acceleration: analyzed.expected_acceleration,
        relative_error: analyzed.relative_error,
        summary,
    })
}

/// Run the estimator for every trial, stopping at the first failure.
pub fn run_monte_carlo_all(
    analyzed: &[AnalyzedTrial],
    config: &MonteCarloConfig,
) -> Result<Vec<MonteCarloResult>, AppError> {
    analyzed.iter().map(|a| run_monte_carlo(a, config)).collect()
}

fn iteration_seed(seed: u64, k: u64) -> u64 {
    mix(seed.wrapping_add(mix(k)))
}

/// SplitMix64 finalizer: spreads nearby integers across the full `u64` range.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
