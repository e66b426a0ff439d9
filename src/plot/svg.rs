//! Plotters-powered SVG charts.
//!
//! Three chart kinds mirror the lab write-up figures:
//! - position-time scatter of every trial
//! - the same scatter (faded) with each trial's fitted quadratic
//! - one Monte Carlo acceleration histogram per trial, with vertical markers at
//!   the fitted (red) and expected (magenta) accelerations
//!
//! The SVG backend needs no system fonts or native libraries; text is emitted
//! as SVG `<text>` elements and laid out by the viewer.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use crate::domain::{ReportFile, Setup, TrialReport};
use crate::error::AppError;
use crate::math::{Histogram, histogram};
use crate::plot::{curve_points, position_time_bounds};

const SIZE: (u32, u32) = (1024, 768);

pub const SCATTER_FILE: &str = "position_time_scatter.svg";
pub const QUADRATICS_FILE: &str = "position_time_quadratics.svg";

pub fn histogram_file_name(column: usize) -> String {
    format!("monte_carlo_trial_{column}.svg")
}

/// Render every chart the report supports into `dir`; returns written paths.
pub fn write_all_svgs(dir: &Path, report: &ReportFile, bins: usize) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::usage(format!("Failed to create SVG dir '{}': {e}", dir.display())))?;

    let mut written = Vec::new();

    let path = dir.join(SCATTER_FILE);
    write_position_time_svg(&path, &report.trials, report.setup, false)?;
    written.push(path);

    let path = dir.join(QUADRATICS_FILE);
    write_position_time_svg(&path, &report.trials, report.setup, true)?;
    written.push(path);

    for t in &report.trials {
        let Some(mc) = &t.monte_carlo else { continue };
        let Some(hist) = histogram(&mc.accelerations, bins) else {
            continue;
        };
        let path = dir.join(histogram_file_name(t.column));
        write_histogram_svg(&path, t, &hist)?;
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "wrote SVG charts");
    Ok(written)
}

/// Position-time chart; with `curves` the points are faded and fits overlaid.
pub fn write_position_time_svg(
    path: &Path,
    trials: &[TrialReport],
    setup: Setup,
    curves: bool,
) -> Result<(), AppError> {
    let bounds = position_time_bounds(trials, curves);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Position - Time Graph", ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(bounds.x_min..bounds.x_max, bounds.y_min..bounds.y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Displacement (m)")
        .draw()
        .map_err(plot_err)?;

    for (i, t) in trials.iter().enumerate() {
        let color = trial_color(i);
        let point_style = if curves { color.mix(0.3).filled() } else { color.filled() };

        let points = t
            .times
            .iter()
            .zip(t.displacements.iter())
            .map(move |(&x, &y)| Circle::new((x, y), 3, point_style));

        if curves {
            chart.draw_series(points).map_err(plot_err)?;
            let line = curve_points(&t.fit, bounds.x_min, bounds.x_max, 400);
            chart
                .draw_series(LineSeries::new(line, color.stroke_width(2)))
                .map_err(plot_err)?
                .label(t.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        } else {
            chart
                .draw_series(points)
                .map_err(plot_err)?
                .label(t.label.clone())
                .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    // The legend title has no slot in Plotters' series labels; put it under the caption.
    root.draw(&Text::new(
        setup.legend_title(),
        (SIZE.0 as i32 / 2 - 80, 44),
        ("sans-serif", 16),
    ))
    .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Histogram of one trial's Monte Carlo accelerations.
pub fn write_histogram_svg(path: &Path, trial: &TrialReport, hist: &Histogram) -> Result<(), AppError> {
    let markers = [
        Some(("fitted", trial.acceleration, RED)),
        trial.expected_acceleration.map(|e| ("expected", e, MAGENTA)),
    ];

    let mut x0 = hist.lo;
    let mut x1 = hist.hi;
    for (_, v, _) in markers.iter().flatten() {
        x0 = x0.min(*v);
        x1 = x1.max(*v);
    }
    let pad = 0.02 * (x1 - x0);
    let y1 = hist.max_count().max(1) as f64 * 1.1;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Trial {}: {}", trial.column, trial.label), ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d((x0 - pad)..(x1 + pad), 0.0..y1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Acceleration (m/s²)")
        .y_desc("Samples")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(hist.bins().filter(|(_, _, c)| *c > 0).map(|(left, right, count)| {
            Rectangle::new([(left, 0.0), (right, count as f64)], BLUE.mix(0.6).filled())
        }))
        .map_err(plot_err)?
        .label(format!("n = {}", hist.total()))
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], BLUE.mix(0.6).filled()));

    for (name, value, color) in markers.into_iter().flatten() {
        chart
            .draw_series(LineSeries::new(
                vec![(value, 0.0), (value, y1)],
                color.stroke_width(2),
            ))
            .map_err(plot_err)?
            .label(format!("{name} {value:.4}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

fn trial_color(i: usize) -> RGBColor {
    let (r, g, b) = Palette99::pick(i).rgb();
    RGBColor(r, g, b)
}

fn plot_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::usage(format!("Failed to render SVG chart: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MonteCarloReport, MonteCarloSummary, STANDARD_GRAVITY};
    use crate::plot::tests::report_trial;

    #[test]
    fn writes_expected_files() {
        let mut with_mc = report_trial(2, 0.4);
        with_mc.expected_acceleration = Some(0.81);
        with_mc.monte_carlo = Some(MonteCarloReport {
            sigma: 0.1,
            seed: 42,
            summary: MonteCarloSummary {
                mean: 0.8,
                std_dev: 0.01,
                min: 0.78,
                max: 0.82,
                p025: 0.78,
                p975: 0.82,
            },
            accelerations: vec![0.78, 0.79, 0.8, 0.8, 0.81, 0.82],
        });
        let report = ReportFile {
            tool: "kfit".to_string(),
            generated_at: chrono::Utc::now(),
            setup: Setup::RollingCart,
            gravity: STANDARD_GRAVITY,
            trials: vec![report_trial(1, 0.5), with_mc],
        };

        let dir = tempfile::tempdir().unwrap();
        let written = write_all_svgs(dir.path(), &report, 10).unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, [SCATTER_FILE, QUADRATICS_FILE, "monte_carlo_trial_2.svg"]);
        for p in &written {
            let text = std::fs::read_to_string(p).unwrap();
            assert!(text.contains("<svg"), "{}", p.display());
        }
    }
}
