//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - lab setup / table layout enums (`Setup`, `Axis`)
//! - validated experimental runs (`Trial`, `Masses`)
//! - fit and Monte Carlo outputs (`QuadraticFit`, `AnalyzedTrial`, `MonteCarloResult`)
//! - the serializable report schema (`ReportFile`)

pub mod types;

pub use types::*;
