//! Gaussian kernel density estimation.

use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// The evaluation grid extends this many bandwidths past the data.
pub const GRID_CUT: f64 = 3.0;

/// One density curve ready to be drawn.
#[derive(Debug, Clone)]
pub struct DensityCurve {
    pub label: String,
    pub bandwidth: f64,
    /// `(x, density)` pairs in ascending `x`.
    pub points: Vec<(f64, f64)>,
}

impl DensityCurve {
    /// Trapezoidal area under the curve.
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum()
    }

    pub fn peak(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .copied()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// Scott's rule: `sigma * n^(-1/5)`.
pub fn scott_bandwidth(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    values.iter().std_dev() * n.powf(-0.2)
}

/// Estimate the density of `values` on `grid_size` evenly spaced points.
///
/// Returns `None` for fewer than two values or a constant sample, where no
/// bandwidth can be chosen.
pub fn estimate_density(label: &str, values: &[f64], grid_size: usize) -> Option<DensityCurve> {
    if values.len() < 2 || grid_size < 2 {
        return None;
    }
    let bandwidth = scott_bandwidth(values);
    if !bandwidth.is_finite() || bandwidth <= 0.0 {
        return None;
    }
    let kernel = Normal::new(0.0, 1.0).ok()?;

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min) - GRID_CUT * bandwidth;
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + GRID_CUT * bandwidth;
    let step = (hi - lo) / (grid_size - 1) as f64;
    let norm = values.len() as f64 * bandwidth;

    let points = (0..grid_size)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density = values
                .iter()
                .map(|&v| kernel.pdf((x - v) / bandwidth))
                .sum::<f64>()
                / norm;
            (x, density)
        })
        .collect();

    Some(DensityCurve {
        label: label.to_string(),
        bandwidth,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_integrates_to_one() {
        let values = [7.5, 8.0, 8.0, 8.5, 9.0, 9.5, 10.0, 10.0, 10.0, 6.0];
        let curve = estimate_density("clean cup", &values, 200).unwrap();
        assert_eq!(curve.points.len(), 200);
        assert!((curve.area() - 1.0).abs() < 0.01, "area {}", curve.area());
        assert!(curve.points.iter().all(|&(_, d)| d >= 0.0));
    }

    #[test]
    fn test_scott_bandwidth() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let expected = values.iter().std_dev() * 5f64.powf(-0.2);
        assert!((scott_bandwidth(&values) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_peak_near_mode() {
        let values = [5.0, 5.1, 4.9, 5.0, 5.05, 4.95, 9.0];
        let (x, _) = estimate_density("uniformity", &values, 200).unwrap().peak().unwrap();
        assert!((x - 5.0).abs() < 0.5);
    }

    #[test]
    fn test_degenerate_samples() {
        assert!(estimate_density("uniformity", &[10.0], 200).is_none());
        assert!(estimate_density("uniformity", &[10.0, 10.0, 10.0], 200).is_none());
    }
}
