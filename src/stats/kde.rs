use itertools_num::linspace;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Number of grid points a density curve is evaluated on.
pub const KDE_GRID_POINTS: usize = 200;

/// Equal-width bins spanning the data range.
///
/// Chart bins are half-open, so the width is widened by a relative
/// `BIN_EDGE_SLACK` to keep the maximum inside the last of `bins` bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinSpec {
    pub start: f64,
    pub end: f64,
    pub size: f64,
}

pub const BIN_EDGE_SLACK: f64 = 1e-6;

impl BinSpec {
    pub fn for_values(values: &[f64], bins: usize) -> Option<Self> {
        let (min, max) = finite_range(values)?;
        let bins = bins.max(1);

        // A single repeated value still gets a unit-wide bin around it.
        let (start, size) = if min == max {
            (min - 0.5, 1.0 / bins as f64)
        } else {
            (min, (max - min) / bins as f64 * (1.0 + BIN_EDGE_SLACK))
        };

        Some(Self {
            start,
            end: start + size * bins as f64,
            size,
        })
    }
}

/// Gaussian kernel density estimate scaled to histogram counts, evaluated
/// over the data range. Bandwidth follows Scott's rule.
///
/// Returns `None` when the sample has fewer than two points or no spread.
pub fn density_curve(values: &[f64], bin_width: f64) -> Option<Vec<(f64, f64)>> {
    let sample: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sample.len() < 2 {
        return None;
    }

    let std_dev = sample.iter().std_dev();
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return None;
    }

    let n = sample.len() as f64;
    let bandwidth = std_dev * n.powf(-0.2);
    let kernel = Normal::new(0.0, 1.0).ok()?;
    let (min, max) = finite_range(&sample)?;

    let scale = n * bin_width / (n * bandwidth);
    let curve = linspace(min, max, KDE_GRID_POINTS)
        .map(|x| {
            let density: f64 = sample
                .iter()
                .map(|xi| kernel.pdf((x - xi) / bandwidth))
                .sum();
            (x, density * scale)
        })
        .collect();

    Some(curve)
}

fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left edges are generated while `edge < end - size / 1e6` and a value
    /// lands in bin `floor((v - start) / size + 1e-9)`; bins are half-open.
    fn rendered_bin_count(spec: &BinSpec) -> usize {
        let mut count = 0;
        let mut edge = spec.start;
        while edge < spec.end - spec.size / 1e6 {
            count += 1;
            edge += spec.size;
        }
        count
    }

    fn rendered_bin_index(spec: &BinSpec, value: f64) -> usize {
        ((value - spec.start) / spec.size + 1e-9).floor() as usize
    }

    #[test]
    fn test_bins_span_data_range() {
        let bins = BinSpec::for_values(&[0.0, 10.0, 30.0], 30).unwrap();
        assert_eq!(bins.start, 0.0);
        assert!(bins.end > 30.0);
        assert!((bins.size - 1.0).abs() < 1e-5);
        assert_eq!(rendered_bin_count(&bins), 30);
    }

    #[test]
    fn test_maximum_falls_inside_last_bin() {
        let values = [1.0, 3.0, 4.0, 5.0, 5.0, 5.0];
        let spec = BinSpec::for_values(&values, 20).unwrap();

        let last_index = ((5.0 - spec.start) / spec.size).floor();
        let bin_total = ((spec.end - spec.start) / spec.size).ceil();
        assert!(last_index < bin_total);

        let bin_count = rendered_bin_count(&spec);
        assert_eq!(bin_count, 20);
        for v in values {
            assert!(rendered_bin_index(&spec, v) < bin_count, "{} dropped", v);
        }
        assert_eq!(rendered_bin_index(&spec, 5.0), 19);
    }

    #[test]
    fn test_bins_for_constant_sample() {
        let bins = BinSpec::for_values(&[4.0, 4.0], 20).unwrap();
        assert!(bins.start < 4.0 && bins.end > 4.0);
        assert!(bins.size > 0.0);
        assert!(rendered_bin_index(&bins, 4.0) < rendered_bin_count(&bins));
    }

    #[test]
    fn test_bins_for_empty_sample() {
        assert!(BinSpec::for_values(&[], 20).is_none());
        assert!(BinSpec::for_values(&[f64::NAN], 20).is_none());
    }

    #[test]
    fn test_density_area_matches_counts() {
        let values: Vec<f64> = (0..500).map(|i| (i % 50) as f64).collect();
        let bin_width = 2.0;
        let curve = density_curve(&values, bin_width).unwrap();

        assert_eq!(curve.len(), KDE_GRID_POINTS);
        assert_eq!(curve.first().unwrap().0, 0.0);
        assert!((curve.last().unwrap().0 - 49.0).abs() < 1e-9);

        // Trapezoid area over the data range, in count units, divided by the
        // bin width approximates the sample size minus the clipped tails.
        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum();
        let approx_n = area / bin_width;
        assert!(approx_n > 400.0 && approx_n <= 500.0, "approx_n = {}", approx_n);
    }

    #[test]
    fn test_density_needs_spread() {
        assert!(density_curve(&[1.0], 1.0).is_none());
        assert!(density_curve(&[3.0, 3.0, 3.0], 1.0).is_none());
    }
}
