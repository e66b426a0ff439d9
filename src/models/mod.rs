//! Kinematic models.
//!
//! - `quadratic`: the displacement polynomial the fitter calibrates
//! - `expected`: closed-form theory the fit is compared against

pub mod expected;
pub mod quadratic;

pub use expected::*;
pub use quadratic::*;
