//! Least squares solver.
//!
//! Every fit in this crate reduces to a small linear regression:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! with a 3-column design matrix `[t², t, 1]`. The Monte Carlo estimator solves
//! this thousands of times per trial, so the solver stays allocation-light and
//! free of shared state.
//!
//! Implementation choices:
//! - SVD handles tall systems (more samples than coefficients) directly.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Rank deficiency is the caller's responsibility to rule out; see
//!   `fit::fit_quadratic`, which rejects fewer than three distinct times.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if no finite solution can be found.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Strict tolerance first; only loosen it if the strict solve is unusable.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
