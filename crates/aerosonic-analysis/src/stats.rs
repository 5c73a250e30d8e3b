//! Summary statistics for measurement series
//!
//! - Min-max normalization
//! - Normal (Gaussian) maximum-likelihood fit and density
//! - Fixed-range histograms
//! - Calibration ratio between two series of the same sweep

use std::f64::consts::PI;
use std::ops::Range;

/// Scale values linearly onto [0, 1].
///
/// Returns `None` for empty input, non-finite extremes, or when all values
/// are equal.
pub fn normalize(values: &[f64]) -> Option<Vec<f64>> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range == 0.0 {
        return None;
    }
    Some(values.iter().map(|&v| (v - min) / range).collect())
}

/// Parameters of a normal distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    /// Mean.
    pub mean: f64,
    /// Standard deviation.
    pub std_dev: f64,
}

impl Normal {
    /// Probability density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.std_dev;
        (-0.5 * z * z).exp() / (self.std_dev * (2.0 * PI).sqrt())
    }
}

/// Maximum-likelihood normal fit: sample mean and population standard
/// deviation (divides by `n`, not `n − 1`).
pub fn fit_normal(values: &[f64]) -> Option<Normal> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(Normal {
        mean,
        std_dev: var.sqrt(),
    })
}

/// Count values into `bins` equal-width bins over `[lo, hi]`.
///
/// The last bin is closed on the right; values outside the range and NaNs
/// are ignored.
pub fn histogram(values: &[f64], bins: usize, (lo, hi): (f64, f64)) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    if bins == 0 || hi <= lo {
        return counts;
    }
    let width = (hi - lo) / bins as f64;
    for &v in values {
        if !(lo..=hi).contains(&v) {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

/// Left edges of the histogram bins plus the final right edge.
pub fn bin_edges(bins: usize, (lo, hi): (f64, f64)) -> Vec<f64> {
    (0..=bins)
        .map(|i| lo + (hi - lo) * i as f64 / bins as f64)
        .collect()
}

/// Mean ratio `reference[i] / measured[i]` over `indices`.
///
/// Used to scale a series measured through an attenuating cover back onto
/// the uncovered series in the range where neither saturates. Returns
/// `None` if the range is empty or out of bounds.
pub fn calibration_ratio(reference: &[f64], measured: &[f64], indices: Range<usize>) -> Option<f64> {
    if indices.is_empty() || indices.end > reference.len() || indices.end > measured.len() {
        return None;
    }
    let count = indices.len() as f64;
    let sum: f64 = indices.map(|i| reference[i] / measured[i]).sum();
    Some(sum / count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_to_unit_interval() {
        let n = normalize(&[2.0, 4.0, 3.0]).unwrap();
        assert_eq!(n, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn normalize_constant_is_none() {
        assert!(normalize(&[1.0, 1.0]).is_none());
        assert!(normalize(&[]).is_none());
    }

    #[test]
    fn normal_fit_uses_population_std() {
        let fit = fit_normal(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((fit.mean - 2.5).abs() < 1e-12);
        assert!((fit.std_dev - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn pdf_peak() {
        let n = Normal {
            mean: 0.0,
            std_dev: 1.0,
        };
        assert!((n.pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-12);
        assert!((n.pdf(1.0) - n.pdf(-1.0)).abs() < 1e-15);
    }

    #[test]
    fn histogram_closes_last_bin() {
        let counts = histogram(&[0.0, 0.5, 1.0, 2.9, 3.0, 3.1, -0.1], 3, (0.0, 3.0));
        assert_eq!(counts, vec![2, 1, 2]);
        assert_eq!(bin_edges(3, (0.0, 3.0)), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn calibration_ratio_averages() {
        let reference = [0.0, 2.0, 4.0, 9.0];
        let covered = [1.0, 1.0, 1.0, 3.0];
        assert_eq!(calibration_ratio(&reference, &covered, 1..4), Some(3.0));
        assert_eq!(calibration_ratio(&reference, &covered, 2..2), None);
        assert_eq!(calibration_ratio(&reference, &covered, 0..5), None);
    }
}
