//! `kinematics-fit` library crate.
//!
//! Fits `d(t) = a t² + b t + c` to lab position/time trials, reports the
//! acceleration `2a` against the frictionless prediction `m_h / (m_h + m_c) · g`,
//! and estimates how much timing noise alone moves the result (Monte Carlo).
//!
//! The binary (`kfit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the fitting and Monte Carlo code is reusable from other front-ends

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
