//! Command-line parsing for the kinematics fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting code; `app` turns these structs into an `AnalysisConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{STANDARD_GRAVITY, Setup};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "kfit",
    version,
    about = "Fit constant-acceleration kinematics to lab position/time data"
)]
pub struct Cli {
    /// Log more (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit every trial, compare against theory, print and optionally export.
    Analyze(AnalyzeArgs),
    /// Analyze, then estimate timing-noise sensitivity by Monte Carlo.
    MonteCarlo(MonteCarloArgs),
    /// Re-render plots from a saved JSON report.
    Plot(PlotArgs),
}

/// Options shared by `analyze` and `monte-carlo`.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Input CSV (falls back to `KFIT_CSV` from the environment or `.env`).
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Table layout of the input CSV.
    #[arg(short, long, value_enum, default_value_t = Setup::RollingCart)]
    pub setup: Setup,

    /// Gravitational acceleration (m/s^2).
    #[arg(short, long, default_value_t = STANDARD_GRAVITY)]
    pub gravity: f64,

    /// Render ASCII plots in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub height: usize,

    /// Write SVG charts into this directory.
    #[arg(long, value_name = "DIR")]
    pub svg_dir: Option<PathBuf>,

    /// Export per-trial results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the full report (series, fits, Monte Carlo samples) to JSON.
    #[arg(long = "export-report", value_name = "JSON")]
    pub export_report: Option<PathBuf>,
}

/// Options for the Monte Carlo sensitivity run.
#[derive(Debug, Args, Clone)]
pub struct MonteCarloArgs {
    #[command(flatten)]
    pub common: AnalyzeArgs,

    /// Standard deviation of the Gaussian noise added to each time (s).
    #[arg(long, default_value_t = 0.1)]
    pub sigma: f64,

    /// Number of perturbed refits per trial.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub samples: usize,

    /// Random seed; equal seeds reproduce identical samples.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Histogram bins.
    #[arg(long, default_value_t = 100)]
    pub bins: usize,
}

/// Options for plotting a saved report.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Report JSON produced by `kfit ... --export-report`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,

    /// Also write SVG charts into this directory.
    #[arg(long, value_name = "DIR")]
    pub svg_dir: Option<PathBuf>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub height: usize,

    /// Histogram bins.
    #[arg(long, default_value_t = 100)]
    pub bins: usize,
}
