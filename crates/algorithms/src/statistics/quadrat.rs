//! Quadrat count analysis
//!
//! The study area is divided into square quadrats and the points in each are
//! counted. The variance-to-mean ratio (VMR) measures dispersion and a
//! Kolmogorov-Smirnov test compares the count distribution with a Poisson
//! distribution of the same mean.

use super::distribution::poisson_cumulative;
use super::{point_coords, PointPattern};
use geoprocs_core::vector::{Envelope, FeatureCollection};
use geoprocs_core::{Error, Result};
use serde::Serialize;
use tracing::debug;

/// Kolmogorov-Smirnov coefficient for α = 0.05
const KS_COEFFICIENT_05: f64 = 1.36;

/// Upper bound on the number of quadrats in one analysis
pub const MAX_QUADRATS: usize = 10_000_000;

#[derive(Debug, Clone, Default)]
pub struct QuadratParams {
    /// Study area; the envelope of the points when `None`
    pub extent: Option<Envelope>,
    /// Quadrat edge length; `sqrt(2A/n)` when `None`
    pub cell_size: Option<f64>,
}

/// Result of a quadrat analysis
#[derive(Debug, Clone, Serialize)]
pub struct QuadratReport {
    /// Points inside the study area
    pub points: usize,
    /// Points ignored because they fall outside the study area
    pub points_outside: usize,
    pub cell_size: f64,
    pub rows: usize,
    pub cols: usize,
    pub quadrats: usize,
    /// Grid extent after snapping to whole cells
    pub extent: Envelope,
    /// Mean count per quadrat (λ)
    pub mean: f64,
    /// Sample variance of the counts
    pub variance: f64,
    pub variance_mean_ratio: f64,
    pub chi_square: f64,
    pub ks_statistic: f64,
    pub ks_critical: f64,
    pub pattern: PointPattern,
}

/// Run a quadrat analysis on a point layer
pub fn quadrat_analysis(points: &FeatureCollection, params: QuadratParams) -> Result<QuadratReport> {
    let coords = point_coords(points)?;
    if coords.is_empty() {
        return Err(Error::InsufficientData("Quadrat analysis needs at least one point".into()));
    }

    let extent = match params.extent {
        Some(extent) => extent,
        None => coords
            .iter()
            .map(|&[x, y]| Envelope::new(x, y, x, y))
            .reduce(|a, b| a.expand_to_include(&b))
            .ok_or_else(|| Error::InsufficientData("No points".into()))?,
    };
    if extent.is_empty() {
        return Err(Error::InvalidParameter {
            name: "extent",
            value: format!("{:?}", extent),
            reason: "study area has no area".into(),
        });
    }

    let inside = coords
        .iter()
        .filter(|&&[x, y]| extent.contains_point(x, y))
        .count();
    if inside == 0 {
        return Err(Error::InsufficientData("No points fall inside the study area".into()));
    }

    let cell_size = params
        .cell_size
        .unwrap_or_else(|| (2.0 * extent.area() / inside as f64).sqrt());
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(Error::InvalidParameter {
            name: "cell_size",
            value: cell_size.to_string(),
            reason: "must be a positive number".into(),
        });
    }

    let grid = extent.snap_to_grid(cell_size);
    let cols = ((grid.width() / cell_size).round() as usize).max(1);
    let rows = ((grid.height() / cell_size).round() as usize).max(1);
    let quadrats = rows
        .checked_mul(cols)
        .filter(|&n| n <= MAX_QUADRATS)
        .ok_or_else(|| Error::InvalidParameter {
            name: "cell_size",
            value: cell_size.to_string(),
            reason: format!("grid would exceed {} quadrats", MAX_QUADRATS),
        })?;
    if quadrats < 2 {
        return Err(Error::InsufficientData(format!(
            "Cell size {} yields a single quadrat",
            cell_size
        )));
    }

    let mut counts = vec![0usize; quadrats];
    let mut outside = 0usize;
    for &[x, y] in &coords {
        if !extent.contains_point(x, y) {
            outside += 1;
            continue;
        }
        // Points on the max edge belong to the last cell
        let col = (((x - grid.min_x) / cell_size).floor() as usize).min(cols - 1);
        let row = (((y - grid.min_y) / cell_size).floor() as usize).min(rows - 1);
        counts[row * cols + col] += 1;
    }

    let m = quadrats as f64;
    let mean = inside as f64 / m;
    let variance = counts
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / (m - 1.0);
    let vmr = variance / mean;
    let chi_square = (m - 1.0) * vmr;

    // Observed vs Poisson cumulative distribution of counts
    let max_count = counts.iter().copied().max().unwrap_or(0);
    let mut frequency = vec![0usize; max_count + 1];
    for &c in &counts {
        frequency[c] += 1;
    }
    let expected = poisson_cumulative(mean, max_count);
    let mut observed = 0.0;
    let mut ks_statistic = 0.0_f64;
    for (k, &freq) in frequency.iter().enumerate() {
        observed += freq as f64 / m;
        ks_statistic = ks_statistic.max((observed - expected[k]).abs());
    }
    let ks_critical = KS_COEFFICIENT_05 / m.sqrt();

    let pattern = if ks_statistic > ks_critical {
        if vmr > 1.0 {
            PointPattern::Clustered
        } else {
            PointPattern::Dispersed
        }
    } else {
        PointPattern::Random
    };

    debug!(quadrats, inside, outside, vmr, ks_statistic, %pattern, "Quadrat analysis done");

    Ok(QuadratReport {
        points: inside,
        points_outside: outside,
        cell_size,
        rows,
        cols,
        quadrats,
        extent: grid,
        mean,
        variance,
        variance_mean_ratio: vmr,
        chi_square,
        ks_statistic,
        ks_critical,
        pattern,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::point_layer;
    use approx::assert_relative_eq;

    fn unit_grid(extent: f64) -> QuadratParams {
        QuadratParams {
            extent: Some(Envelope::new(0.0, 0.0, extent, extent)),
            cell_size: Some(1.0),
        }
    }

    #[test]
    fn test_one_point_per_quadrat() {
        let fc = point_layer(&[(0.5, 0.5), (1.5, 0.5), (0.5, 1.5), (1.5, 1.5)]);
        let report = quadrat_analysis(&fc, unit_grid(2.0)).unwrap();

        assert_eq!(report.quadrats, 4);
        assert_relative_eq!(report.mean, 1.0);
        assert_relative_eq!(report.variance, 0.0);
        assert_relative_eq!(report.chi_square, 0.0);
        assert_relative_eq!(report.ks_statistic, (-1.0_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(report.ks_critical, 0.68);
        assert_eq!(report.pattern, PointPattern::Random);
    }

    #[test]
    fn test_clustered() {
        let coords: Vec<(f64, f64)> = (0..50).map(|_| (0.5, 0.5)).collect();
        let report = quadrat_analysis(&point_layer(&coords), unit_grid(10.0)).unwrap();

        assert_eq!(report.quadrats, 100);
        assert!(report.variance_mean_ratio > 1.0);
        assert_eq!(report.pattern, PointPattern::Clustered);
    }

    #[test]
    fn test_dispersed() {
        let coords: Vec<(f64, f64)> = (0..100)
            .map(|i| ((i % 10) as f64 + 0.5, (i / 10) as f64 + 0.5))
            .collect();
        let report = quadrat_analysis(&point_layer(&coords), unit_grid(10.0)).unwrap();

        assert_relative_eq!(report.variance_mean_ratio, 0.0);
        assert_eq!(report.pattern, PointPattern::Dispersed);
    }

    #[test]
    fn test_edge_and_outside_points() {
        let fc = point_layer(&[(2.0, 2.0), (0.0, 0.0), (5.0, 5.0)]);
        let report = quadrat_analysis(&fc, unit_grid(2.0)).unwrap();
        assert_eq!(report.points, 2);
        assert_eq!(report.points_outside, 1);
    }

    #[test]
    fn test_default_cell_size_and_snapped_extent() {
        let fc = point_layer(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0), (5.0, 5.0)]);
        let report = quadrat_analysis(&fc, QuadratParams::default()).unwrap();

        let expected = (2.0 * 100.0 / 5.0_f64).sqrt();
        assert_relative_eq!(report.cell_size, expected);
        assert_eq!(report.cols, 2);
        assert_relative_eq!(report.extent.max_x, 2.0 * expected);
        assert_eq!(report.points, 5);
    }

    #[test]
    fn test_errors() {
        assert!(quadrat_analysis(&FeatureCollection::new(), QuadratParams::default()).is_err());

        let fc = point_layer(&[(0.0, 0.0), (1.0, 1.0)]);
        let bad_cell = QuadratParams {
            cell_size: Some(0.0),
            ..unit_grid(2.0)
        };
        assert!(matches!(
            quadrat_analysis(&fc, bad_cell),
            Err(Error::InvalidParameter { name: "cell_size", .. })
        ));

        let collinear = point_layer(&[(0.0, 0.0), (5.0, 0.0)]);
        assert!(quadrat_analysis(&collinear, QuadratParams::default()).is_err());

        let one_cell = QuadratParams {
            cell_size: Some(5.0),
            ..unit_grid(2.0)
        };
        assert!(matches!(quadrat_analysis(&fc, one_cell), Err(Error::InsufficientData(_))));
    }

    #[test]
    fn test_dense_poisson_like_counts_are_random() {
        let mut coords = Vec::new();
        for (center, n) in [((0.5, 0.5), 770), ((1.5, 0.5), 830), ((0.5, 1.5), 800), ((1.5, 1.5), 800)] {
            coords.extend(std::iter::repeat_n(center, n));
        }
        let report = quadrat_analysis(&point_layer(&coords), unit_grid(2.0)).unwrap();

        assert_relative_eq!(report.mean, 800.0);
        assert_relative_eq!(report.variance_mean_ratio, 0.75);
        assert_relative_eq!(report.ks_statistic, 0.245, epsilon = 1e-2);
        assert_eq!(report.pattern, PointPattern::Random);
    }

    #[test]
    fn test_tiny_cell_size_is_rejected() {
        let fc = point_layer(&[(1.0, 1.0), (9.0, 9.0)]);
        let params = QuadratParams {
            extent: Some(Envelope::new(0.0, 0.0, 10.0, 10.0)),
            cell_size: Some(1e-10),
        };
        assert!(matches!(
            quadrat_analysis(&fc, params),
            Err(Error::InvalidParameter { name: "cell_size", .. })
        ));
    }

    #[test]
    fn test_default_cell_size_counts_only_inside_points() {
        let fc = point_layer(&[
            (1.0, 1.0),
            (9.0, 1.0),
            (1.0, 9.0),
            (9.0, 9.0),
            (20.0, 20.0),
            (30.0, 30.0),
        ]);
        let params = QuadratParams {
            extent: Some(Envelope::new(0.0, 0.0, 10.0, 10.0)),
            cell_size: None,
        };
        let report = quadrat_analysis(&fc, params).unwrap();

        assert_relative_eq!(report.cell_size, (2.0 * 100.0 / 4.0_f64).sqrt());
        assert_eq!(report.points, 4);
        assert_eq!(report.points_outside, 2);
    }
}
