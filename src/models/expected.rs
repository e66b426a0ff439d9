//! Theoretical acceleration and relative error.
//!
//! For a cart of mass `m_c` pulled over a frictionless pulley by a hanging
//! mass `m_h`, both bodies share the acceleration
//!
//! ```text
//! α = m_h / (m_h + m_c) · g
//! ```
//!
//! The fan car has no closed form here (thrust is not measured), so its
//! expectation is absent rather than guessed.

use crate::domain::Masses;
use crate::error::AppError;

/// `m_h / (m_h + m_c) · g`.
///
/// Fails when the total mass is zero (the ratio is undefined), a mass is
/// negative, or any input is non-finite.
pub fn expected_acceleration(hanging: f64, cart: f64, gravity: f64) -> Result<f64, AppError> {
    if !(hanging.is_finite() && cart.is_finite() && gravity.is_finite()) {
        return Err(AppError::fit(format!(
            "Non-finite input to expected acceleration (hanging={hanging}, cart={cart}, g={gravity})."
        )));
    }
    if hanging < 0.0 || cart < 0.0 {
        return Err(AppError::fit(format!(
            "Masses must be >= 0 (hanging={hanging}, cart={cart})."
        )));
    }
    let total = hanging + cart;
    if total == 0.0 {
        return Err(AppError::fit(
            "Expected acceleration is undefined: hanging + cart mass is zero.",
        ));
    }
    Ok(hanging / total * gravity)
}

/// Expected acceleration for whichever masses the setup recorded.
pub fn expected_for_masses(masses: &Masses, gravity: f64) -> Result<Option<f64>, AppError> {
    match *masses {
        Masses::Single { .. } => Ok(None),
        Masses::Pair { cart, hanging } => expected_acceleration(hanging, cart, gravity).map(Some),
    }
}

/// `|expected - fitted| / |expected|`.
///
/// A zero expectation makes the ratio undefined and is reported as an error.
pub fn relative_error(expected: f64, fitted: f64) -> Result<f64, AppError> {
    if !(expected.is_finite() && fitted.is_finite()) {
        return Err(AppError::fit(format!(
            "Non-finite input to relative error (expected={expected}, fitted={fitted})."
        )));
    }
    if expected == 0.0 {
        return Err(AppError::fit(
            "Relative error is undefined: expected acceleration is zero.",
        ));
    }
    Ok((expected - fitted).abs() / expected.abs())
}
