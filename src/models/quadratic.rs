//! Quadratic displacement model `d(t) = a·t² + b·t + c`.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given time (for least squares)
//! - predict `d(t)` given coefficients (for residuals/plots)
//!
//! Coefficients are always ordered `[a, b, c]` (leading term first), matching
//! how the lab write-ups quote the fitted equation. The design row is ordered
//! the same way so the solved vector needs no reshuffling.

/// Number of coefficients in the model.
pub const COEFF_LEN: usize = 3;

/// Fill a design row `[t², t, 1]`.
pub fn fill_design_row(t: f64, out: &mut [f64; COEFF_LEN]) {
    out[0] = t * t;
    out[1] = t;
    out[2] = 1.0;
}

/// Evaluate `a·t² + b·t + c` (Horner form).
pub fn predict(coeffs: &[f64; COEFF_LEN], t: f64) -> f64 {
    (coeffs[0] * t + coeffs[1]) * t + coeffs[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_matches_expanded_form() {
        let coeffs = [0.5, -2.0, 3.0];
        for &t in &[0.0, 0.25, 1.0, 4.0] {
            let expanded = 0.5 * t * t - 2.0 * t + 3.0;
            assert!((predict(&coeffs, t) - expanded).abs() < 1e-12);
        }
    }

    #[test]
    fn design_row_dot_coeffs_is_prediction() {
        let coeffs = [1.5, 0.2, -0.7];
        let mut row = [0.0; COEFF_LEN];
        fill_design_row(2.0, &mut row);
        let dot: f64 = row.iter().zip(coeffs.iter()).map(|(x, c)| x * c).sum();
        assert!((dot - predict(&coeffs, 2.0)).abs() < 1e-12);
    }
}
