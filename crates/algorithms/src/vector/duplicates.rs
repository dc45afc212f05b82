//! Duplicate geometry removal

use super::index::EnvelopeIndex;
use geo::{Coord, CoordsIter, Geometry};
use geoprocs_core::vector::{Envelope, FeatureCollection};
use std::mem::discriminant;
use tracing::debug;

/// Same geometry type, same number of coordinates, and every coordinate of
/// `a` within `tolerance` of the matching coordinate of `b`.
fn same_geometry(a: &Geometry<f64>, b: &Geometry<f64>, tolerance: f64) -> bool {
    if discriminant(a) != discriminant(b) || a.coords_count() != b.coords_count() {
        return false;
    }
    let tol2 = tolerance * tolerance;
    a.coords_iter().zip(b.coords_iter()).all(|(p, q): (Coord<f64>, Coord<f64>)| {
        let (dx, dy) = (p.x - q.x, p.y - q.y);
        dx * dx + dy * dy <= tol2
    })
}

/// Drop features whose geometry repeats an earlier feature's geometry.
///
/// The first occurrence is kept and input order is preserved. Features
/// without geometry are never considered duplicates. Returns the kept
/// features and the number removed.
pub fn delete_duplicates(features: &FeatureCollection, tolerance: f64) -> (FeatureCollection, usize) {
    let index = EnvelopeIndex::build(features);
    let mut removed = vec![false; features.len()];

    for (i, feature) in features.iter().enumerate() {
        if removed[i] {
            continue;
        }
        let Some(geom) = feature.geometry.as_ref() else {
            continue;
        };
        let Some(env) = Envelope::from_geometry(geom) else {
            continue;
        };

        for j in index.candidates(&env.expand_by(tolerance)) {
            if j <= i || removed[j] {
                continue;
            }
            let is_duplicate = features.features[j]
                .geometry
                .as_ref()
                .is_some_and(|other| same_geometry(geom, other, tolerance));
            if is_duplicate {
                removed[j] = true;
            }
        }
    }

    let mut kept = features.empty_like();
    kept.features = features
        .iter()
        .zip(&removed)
        .filter(|(_, r)| !**r)
        .map(|(f, _)| f.clone())
        .collect();

    let count = features.len() - kept.len();
    debug!(removed = count, kept = kept.len(), "Duplicate geometries removed");
    (kept, count)
}
