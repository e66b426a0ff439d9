//! Mathematical utilities: least squares and sample statistics.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
