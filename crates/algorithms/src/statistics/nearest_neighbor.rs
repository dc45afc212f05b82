//! Average nearest neighbour analysis (Clark & Evans 1954)
//!
//! Compares the observed mean distance from each point to its nearest
//! neighbour with the mean expected for a random pattern of the same
//! density:
//!
//! ```text
//! expected = 0.5 / sqrt(n / A)
//! SE       = 0.26136 / sqrt(n² / A)
//! z        = (observed - expected) / SE
//! ```

use super::distribution::two_tailed_p;
use super::{point_coords, PointPattern};
use geoprocs_core::vector::{Envelope, FeatureCollection};
use geoprocs_core::{Error, Result};
use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::Serialize;
use tracing::debug;

/// Critical z-score for a two-tailed test at 95 % confidence
const Z_CRITICAL_95: f64 = 1.96;

#[derive(Debug, Clone, Serialize)]
pub struct NearestNeighborReport {
    pub points: usize,
    /// Study area used for the density
    pub area: f64,
    pub observed_mean_distance: f64,
    pub expected_mean_distance: f64,
    /// observed / expected; < 1 clustered, > 1 dispersed
    pub nearest_neighbor_ratio: f64,
    pub standard_error: f64,
    pub z_score: f64,
    pub p_value: f64,
    pub pattern: PointPattern,
}

/// Run the average nearest neighbour test.
///
/// `area` defaults to the area of the points' envelope.
pub fn average_nearest_neighbor(points: &FeatureCollection, area: Option<f64>) -> Result<NearestNeighborReport> {
    let coords = point_coords(points)?;
    let n = coords.len();
    if n < 2 {
        return Err(Error::InsufficientData(format!(
            "Nearest neighbour analysis needs at least 2 points, got {}",
            n
        )));
    }

    let area = match area {
        Some(a) => a,
        None => coords
            .iter()
            .map(|&[x, y]| Envelope::new(x, y, x, y))
            .reduce(|a, b| a.expand_to_include(&b))
            .map_or(0.0, |env| env.area()),
    };
    if !(area.is_finite() && area > 0.0) {
        return Err(Error::InvalidParameter {
            name: "area",
            value: area.to_string(),
            reason: "study area must be positive".into(),
        });
    }

    let tree = RTree::bulk_load(
        coords
            .iter()
            .enumerate()
            .map(|(i, &c)| GeomWithData::new(c, i))
            .collect::<Vec<_>>(),
    );

    let total: f64 = coords
        .iter()
        .enumerate()
        .map(|(i, c)| {
            tree.nearest_neighbor_iter(c)
                .find(|entry| entry.data != i)
                .map_or(0.0, |entry| {
                    let p = entry.geom();
                    ((p[0] - c[0]).powi(2) + (p[1] - c[1]).powi(2)).sqrt()
                })
        })
        .sum();

    let nf = n as f64;
    let observed = total / nf;
    let expected = 0.5 / (nf / area).sqrt();
    let standard_error = 0.26136 / (nf * nf / area).sqrt();
    let z_score = (observed - expected) / standard_error;
    let p_value = two_tailed_p(z_score);

    let pattern = if z_score < -Z_CRITICAL_95 {
        PointPattern::Clustered
    } else if z_score > Z_CRITICAL_95 {
        PointPattern::Dispersed
    } else {
        PointPattern::Random
    };

    debug!(n, observed, expected, z_score, %pattern, "Nearest neighbour analysis done");

    Ok(NearestNeighborReport {
        points: n,
        area,
        observed_mean_distance: observed,
        expected_mean_distance: expected,
        nearest_neighbor_ratio: observed / expected,
        standard_error,
        z_score,
        p_value,
        pattern,
    })
}
