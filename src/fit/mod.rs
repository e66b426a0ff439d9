//! Fitting and error estimation.
//!
//! Responsibilities:
//!
//! - least-squares quadratic fits and their comparison against theory (`fitter`)
//! - Monte Carlo refits under timing noise (`monte_carlo`, parallel)

pub mod fitter;
pub mod monte_carlo;

pub use fitter::*;
pub use monte_carlo::*;
