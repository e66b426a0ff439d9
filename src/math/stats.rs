//! Sample statistics for Monte Carlo output.

use crate::domain::MonteCarloSummary;

/// Fixed-width histogram over `[lo, hi]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lo: f64,
    pub hi: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        (self.hi - self.lo) / self.counts.len() as f64
    }

    /// `(left_edge, right_edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        let w = self.bin_width();
        self.counts
            .iter()
            .enumerate()
            .map(move |(i, &c)| (self.lo + i as f64 * w, self.lo + (i + 1) as f64 * w, c))
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (`n - 1` denominator). A single value has zero spread.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if values.len() < 2 {
        return Some(0.0);
    }
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Empirical quantile with linear interpolation between order statistics.
///
/// `sorted` must be ascending; `p` is clamped to `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Summarize a non-empty, all-finite sample.
pub fn summarize(values: &[f64]) -> Option<MonteCarloSummary> {
    if values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(MonteCarloSummary {
        mean: mean(values)?,
        std_dev: sample_std_dev(values)?,
        min: *sorted.first()?,
        max: *sorted.last()?,
        p025: quantile_sorted(&sorted, 0.025)?,
        p975: quantile_sorted(&sorted, 0.975)?,
    })
}

/// Bin finite values into `bins` equal-width buckets spanning their range.
///
/// A degenerate range (all values equal) is widened symmetrically so the
/// spike still lands in a bin of non-zero width.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let bins = bins.max(1);
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }

    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        let pad = (lo.abs() * 1e-3).max(1e-9);
        lo -= pad;
        hi += pad;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = ((v - lo) / width).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    Some(Histogram { lo, hi, counts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(3.0));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(5.0));
        assert!((quantile_sorted(&sorted, 0.125).unwrap() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn summary_of_known_sample() {
        let s = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert!((s.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
    }

    #[test]
    fn single_value_has_zero_spread() {
        let s = summarize(&[3.5]).unwrap();
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.p025, 3.5);
        assert_eq!(s.p975, 3.5);
    }

    #[test]
    fn summary_rejects_empty_and_nan() {
        assert!(summarize(&[]).is_none());
        assert!(summarize(&[1.0, f64::NAN]).is_none());
    }

    #[test]
    fn histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(|i| i as f64 / 10.0).collect();
        let h = histogram(&values, 10).unwrap();
        assert_eq!(h.counts.len(), 10);
        assert_eq!(h.total(), 100);
        assert!(h.counts.iter().all(|&c| c == 10), "{:?}", h.counts);
    }

    #[test]
    fn histogram_handles_identical_values() {
        let h = histogram(&[9.81; 5], 4).unwrap();
        assert_eq!(h.total(), 5);
        assert!(h.hi > h.lo);
        assert_eq!(h.max_count(), 5);
    }
}
