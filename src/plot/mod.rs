//! Chart rendering.
//!
//! - `ascii`: fixed-size terminal plots (deterministic, good for golden tests)
//! - `svg`: Plotters-rendered SVG files
//!
//! Both render from the report types so a saved JSON report plots exactly like
//! a live run.

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;

use crate::domain::{QuadraticFit, TrialReport};

/// Axis-aligned plotting window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Sample a fitted quadratic on `n` evenly spaced times over `[t0, t1]`.
pub fn curve_points(fit: &QuadraticFit, t0: f64, t1: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let t = t0 + (t1 - t0) * i as f64 / (n - 1) as f64;
            (t, fit.predict(t))
        })
        .collect()
}

/// Window covering every observation and fitted curve, anchored at the origin.
///
/// Time runs from 0 (release) to the last recorded time. Displacement spans 0
/// to the largest observed value, widened if a fitted curve leaves that band.
pub fn position_time_bounds(trials: &[TrialReport], curves: bool) -> Bounds {
    let mut x_max = trials
        .iter()
        .flat_map(|t| t.times.iter().copied())
        .fold(0.0_f64, f64::max);
    if x_max <= 0.0 {
        x_max = 1.0;
    }

    let mut y_min = 0.0_f64;
    let mut y_max = trials
        .iter()
        .flat_map(|t| t.displacements.iter().copied())
        .fold(0.0_f64, f64::max);

    if curves {
        for t in trials {
            for (_, y) in curve_points(&t.fit, 0.0, x_max, 64) {
                if y.is_finite() {
                    y_min = y_min.min(y);
                    y_max = y_max.max(y);
                }
            }
        }
    }
    if y_max - y_min <= 0.0 {
        y_max = y_min + 1.0;
    }

    Bounds {
        x_min: 0.0,
        x_max,
        y_min,
        y_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, Masses};

    pub(crate) fn report_trial(column: usize, a: f64) -> TrialReport {
        let times: Vec<f64> = (1..=5).map(|i| 0.5 * i as f64).collect();
        let displacements: Vec<f64> = times.iter().map(|t| a * t * t).collect();
        TrialReport {
            column,
            label: format!("trial {column}"),
            masses: Masses::Single { cart: 1.0 },
            times,
            displacements,
            fit: QuadraticFit {
                a,
                b: 0.0,
                c: 0.0,
                quality: FitQuality {
                    sse: 0.0,
                    rmse: 0.0,
                    r_squared: 1.0,
                    n: 5,
                },
            },
            acceleration: 2.0 * a,
            expected_acceleration: None,
            relative_error: None,
            monte_carlo: None,
        }
    }

    #[test]
    fn curve_points_span_interval() {
        let t = report_trial(1, 0.5);
        let pts = curve_points(&t.fit, 0.0, 2.0, 5);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], (0.0, 0.0));
        assert_eq!(pts[4], (2.0, 2.0));
    }

    #[test]
    fn bounds_cover_all_trials() {
        let trials = [report_trial(1, 0.5), report_trial(2, 1.0)];
        let b = position_time_bounds(&trials, true);
        assert_eq!(b.x_min, 0.0);
        assert_eq!(b.x_max, 2.5);
        assert_eq!(b.y_min, 0.0);
        assert!((b.y_max - 6.25).abs() < 1e-12);
    }
}
