//! Input/output helpers.
//!
//! - lab table ingest + validation (`ingest`)
//! - per-trial results CSV (`export`)
//! - JSON report read/write (`report`)

pub mod export;
pub mod ingest;
pub mod report;

pub use export::*;
pub use ingest::*;
pub use report::*;
