//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: one marker per trial (`1`, `2`, ... then letters)
//! - fitted curves: `.`
//! - histogram bars: `#`, with `F` (fitted) and `E` (expected) marker columns

use crate::domain::TrialReport;
use crate::math::Histogram;
use crate::plot::{Bounds, curve_points, position_time_bounds};

const MARKERS: &[u8] = b"123456789abcdefghijklmnopqrstuvwxyz";

/// Marker character for the `i`-th trial on a shared plot.
pub fn trial_marker(i: usize) -> char {
    MARKERS[i % MARKERS.len()] as char
}

/// Position-time plot of every trial, optionally with fitted quadratics.
pub fn render_position_time(trials: &[TrialReport], curves: bool, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let bounds = position_time_bounds(trials, curves);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curves first so observations overlay them.
    if curves {
        for t in trials {
            for (x, y) in curve_points(&t.fit, bounds.x_min, bounds.x_max, width * 2) {
                if let Some((col, row)) = cell_for(x, y, &bounds, width, height) {
                    grid[row][col] = '.';
                }
            }
        }
    }

    for (i, t) in trials.iter().enumerate() {
        let marker = trial_marker(i);
        for (&x, &y) in t.times.iter().zip(t.displacements.iter()) {
            if let Some((col, row)) = cell_for(x, y, &bounds, width, height) {
                grid[row][col] = marker;
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: time=[{:.2}, {:.2}] s | displacement=[{:.3}, {:.3}] m\n",
        bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max
    ));
    push_grid(&mut out, grid);
    for (i, t) in trials.iter().enumerate() {
        out.push_str(&format!("  {} = {}\n", trial_marker(i), t.label));
    }
    out
}

/// Vertical-bar histogram of Monte Carlo accelerations.
///
/// Bins are merged down to the plot width when there are more bins than
/// columns. `fitted` / `expected` are drawn as marker columns.
pub fn render_histogram(
    hist: &Histogram,
    fitted: Option<f64>,
    expected: Option<f64>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let lo = [Some(hist.lo), fitted, expected].into_iter().flatten().fold(f64::INFINITY, f64::min);
    let hi = [Some(hist.hi), fitted, expected].into_iter().flatten().fold(f64::NEG_INFINITY, f64::max);
    let bounds = Bounds {
        x_min: lo,
        x_max: if hi > lo { hi } else { lo + 1.0 },
        y_min: 0.0,
        y_max: 1.0,
    };

    let mut columns = vec![0usize; width];
    for (left, right, count) in hist.bins() {
        let col = map_x(0.5 * (left + right), &bounds, width);
        columns[col] += count;
    }
    let peak = columns.iter().copied().max().unwrap_or(0).max(1);

    let mut grid = vec![vec![' '; width]; height];
    for (col, &count) in columns.iter().enumerate() {
        let bar = (count as f64 / peak as f64 * height as f64).round() as usize;
        for row in 0..bar.min(height) {
            grid[height - 1 - row][col] = '#';
        }
    }

    for (value, ch) in [(fitted, 'F'), (expected, 'E')] {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            let col = map_x(v, &bounds, width);
            for row in grid.iter_mut() {
                if row[col] == ' ' {
                    row[col] = '|';
                }
            }
            grid[0][col] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Histogram: acceleration=[{:.4}, {:.4}] m/s^2 | n={} | peak column={}\n",
        bounds.x_min,
        bounds.x_max,
        hist.total(),
        peak
    ));
    push_grid(&mut out, grid);
    if let Some(f) = fitted {
        out.push_str(&format!("  F = fitted {f:.4} m/s^2\n"));
    }
    if let Some(e) = expected {
        out.push_str(&format!("  E = expected {e:.4} m/s^2\n"));
    }
    out
}

fn push_grid(out: &mut String, grid: Vec<Vec<char>>) {
    for row in grid {
        out.push('|');
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
}

fn cell_for(x: f64, y: f64, bounds: &Bounds, width: usize, height: usize) -> Option<(usize, usize)> {
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    if x < bounds.x_min || x > bounds.x_max || y < bounds.y_min || y > bounds.y_max {
        return None;
    }
    Some((map_x(x, bounds, width), map_y(y, bounds, height)))
}

fn map_x(x: f64, bounds: &Bounds, width: usize) -> usize {
    let u = ((x - bounds.x_min) / (bounds.x_max - bounds.x_min)).clamp(0.0, 1.0);
    ((u * (width - 1) as f64).round() as usize).min(width - 1)
}

fn map_y(y: f64, bounds: &Bounds, height: usize) -> usize {
    let u = ((y - bounds.y_min) / (bounds.y_max - bounds.y_min)).clamp(0.0, 1.0);
    let row_from_bottom = (u * (height - 1) as f64).round() as usize;
    height - 1 - row_from_bottom.min(height - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::histogram;
    use crate::plot::tests::report_trial;

    #[test]
    fn position_time_plot_has_fixed_shape() {
        let trials = [report_trial(1, 0.5), report_trial(2, 1.0)];
        let out = render_position_time(&trials, true, 40, 12);
        let lines: Vec<&str> = out.lines().collect();

        // header + grid + one legend line per trial
        assert_eq!(lines.len(), 1 + 12 + 2);
        assert!(lines[0].starts_with("Plot: time=[0.00, 2.50] s"));
        assert!(out.contains('1') && out.contains('2') && out.contains('.'));
        assert_eq!(lines[13], "  1 = trial 1");
    }

    #[test]
    fn last_point_lands_top_right() {
        let trials = [report_trial(1, 1.0)];
        let out = render_position_time(&trials, false, 20, 6);
        let first_row = out.lines().nth(1).unwrap();
        // (2.5, 6.25) is the maximum in both axes.
        assert_eq!(first_row.chars().last(), Some('1'));
        assert_eq!(first_row.len(), 1 + 20);
    }

    #[test]
    fn histogram_marks_fitted_and_expected() {
        let values: Vec<f64> = (0..200).map(|i| 0.9 + 0.001 * (i % 50) as f64).collect();
        let hist = histogram(&values, 100).unwrap();
        let out = render_histogram(&hist, Some(0.92), Some(0.981), 30, 8);

        assert!(out.contains("n=200"));
        let top = out.lines().nth(1).unwrap();
        assert!(top.contains('F'));
        assert!(top.contains('E'));
        assert!(out.contains('#'));
        assert!(out.contains("E = expected 0.9810 m/s^2"));
    }
}
