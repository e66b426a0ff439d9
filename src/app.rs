//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - builds an `AnalysisConfig`
//! - runs the analysis pipeline
//! - prints reports/plots
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{AnalyzeArgs, Cli, Command, MonteCarloArgs, PlotArgs};
use crate::domain::{AnalysisConfig, MonteCarloConfig, ReportFile};
use crate::error::AppError;
use crate::math::histogram;

pub mod pipeline;

/// Environment variable naming the default input CSV.
pub const CSV_ENV: &str = "KFIT_CSV";

/// Entry point for the `kfit` binary.
pub fn run() -> Result<(), AppError> {
    // `kfit` and `kfit --csv lab.csv` behave like `kfit analyze ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    init_tracing(cli.verbose);

    match cli.command {
        Command::Analyze(args) => handle_analyze(&args, None),
        Command::MonteCarlo(args) => handle_monte_carlo(&args),
        Command::Plot(args) => handle_plot(&args),
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_analyze(args: &AnalyzeArgs, monte_carlo: Option<MonteCarloConfig>) -> Result<(), AppError> {
    let config = config_from_args(args, monte_carlo, std::env::var(CSV_ENV).ok())?;
    debug!(?config, "resolved configuration");
    let run = pipeline::run_analysis(&config)?;

    print!("{}", crate::report::format_run_summary(&run.ingest, &config));
    print!("{}", crate::report::format_trials(&run.report.trials));
    if !run.monte_carlo.is_empty() {
        println!();
        print!("{}", crate::report::format_monte_carlo(&run.report.trials));
    }

    if config.plot {
        println!();
        print_plots(&run.report, config.plot_width, config.plot_height, histogram_bins(&config));
    }

    if let Some(dir) = &config.svg_dir {
        let written = crate::plot::write_all_svgs(dir, &run.report, histogram_bins(&config))?;
        for path in written {
            println!("Wrote {}", path.display());
        }
    }
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.analyzed, &run.monte_carlo)?;
        info!(path = %path.display(), "wrote results CSV");
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &config.export_report {
        crate::io::report::write_report_json(path, &run.report)?;
        info!(path = %path.display(), "wrote report JSON");
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_monte_carlo(args: &MonteCarloArgs) -> Result<(), AppError> {
    let mc = MonteCarloConfig {
        sigma: args.sigma,
        samples: args.samples,
        seed: args.seed,
        bins: args.bins,
    };
    crate::fit::validate_config(&mc)?;
    handle_analyze(&args.common, Some(mc))
}

fn handle_plot(args: &PlotArgs) -> Result<(), AppError> {
    if args.bins == 0 {
        return Err(AppError::usage("Histogram bin count must be >= 1."));
    }
    let report = crate::io::report::read_report_json(&args.report)?;

    print!("{}", crate::report::format_report_header(&report));
    print!("{}", crate::report::format_trials(&report.trials));
    if report.trials.iter().any(|t| t.monte_carlo.is_some()) {
        println!();
        print!("{}", crate::report::format_monte_carlo(&report.trials));
    }
    println!();
    print_plots(&report, args.width, args.height, args.bins);

    if let Some(dir) = &args.svg_dir {
        for path in crate::plot::write_all_svgs(dir, &report, args.bins)? {
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn print_plots(report: &ReportFile, width: usize, height: usize, bins: usize) {
    println!("Position - Time ({}):", report.setup.legend_title());
    println!("{}", crate::plot::render_position_time(&report.trials, true, width, height));

    for t in &report.trials {
        let Some(mc) = &t.monte_carlo else { continue };
        let Some(hist) = histogram(&mc.accelerations, bins) else {
            continue;
        };
        println!("Monte Carlo accelerations, trial {} {}:", t.column, t.label);
        println!(
            "{}",
            crate::plot::render_histogram(&hist, Some(t.acceleration), t.expected_acceleration, width, height)
        );
    }
}

fn histogram_bins(config: &AnalysisConfig) -> usize {
    config.monte_carlo.as_ref().map_or(100, |mc| mc.bins)
}

/// Build the run configuration from parsed flags.
///
/// `env_csv` is the value of `KFIT_CSV`; a `.env` file in the working
/// directory is loaded first so it can supply it.
pub fn config_from_args(
    args: &AnalyzeArgs,
    monte_carlo: Option<MonteCarloConfig>,
    env_csv: Option<String>,
) -> Result<AnalysisConfig, AppError> {
    let csv_path = match &args.csv {
        Some(p) => p.clone(),
        None => resolve_csv_from_env(env_csv)?,
    };

    Ok(AnalysisConfig {
        csv_path,
        setup: args.setup,
        gravity: args.gravity,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        svg_dir: args.svg_dir.clone(),
        export_results: args.export.clone(),
        export_report: args.export_report.clone(),
        monte_carlo,
    })
}

fn resolve_csv_from_env(env_csv: Option<String>) -> Result<PathBuf, AppError> {
    if let Some(v) = env_csv.filter(|v| !v.trim().is_empty()) {
        return Ok(PathBuf::from(v));
    }
    // `.env` values never override the real environment, so this only fills gaps.
    dotenvy::dotenv().ok();
    std::env::var(CSV_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| {
            AppError::usage(format!(
                "No input CSV: pass --csv or set {CSV_ENV} (environment or .env)."
            ))
        })
}

/// Rewrite argv so `kfit` defaults to `kfit analyze`.
///
/// Rules:
/// - `kfit`                       -> `kfit analyze`
/// - `kfit --csv lab.csv ...`     -> `kfit analyze --csv lab.csv ...`
/// - `kfit --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "monte-carlo" | "plot");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
        return argv;
    }

    argv
}
