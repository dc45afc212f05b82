//! Delaunay triangulation of point layers

use super::overlay::polygonal_geometry;
use geo::{BooleanOps, Coord, CoordsIter, Geometry, LineString, MultiPolygon, Polygon};
use geoprocs_core::vector::{AttributeValue, Feature, FeatureCollection};
use geoprocs_core::{Error, Result};
use std::collections::HashSet;
use tracing::debug;

/// Output field holding the 0-based triangle number
pub const TRIANGLE_ID_FIELD: &str = "tri_id";

/// Distinct input coordinates in first-seen order
fn distinct_coords(points: &FeatureCollection) -> Vec<Coord<f64>> {
    let mut seen = HashSet::new();
    points
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .flat_map(|g| g.coords_iter())
        .filter(|c| c.x.is_finite() && c.y.is_finite())
        .filter(|c| seen.insert((c.x.to_bits(), c.y.to_bits())))
        .collect()
}

fn ccw_triangle(p0: Coord<f64>, p1: Coord<f64>, p2: Coord<f64>) -> Polygon<f64> {
    let cross = (p1.x - p0.x) * (p2.y - p0.y) - (p1.y - p0.y) * (p2.x - p0.x);
    let ring = if cross < 0.0 {
        vec![p0, p2, p1, p0]
    } else {
        vec![p0, p1, p2, p0]
    };
    Polygon::new(LineString::new(ring), vec![])
}

/// Triangulate the coordinates of a point layer.
///
/// Point and MultiPoint geometries contribute their points, other
/// geometries their vertices. Exact duplicate coordinates are merged. Each
/// output feature is a counter-clockwise triangle with a `tri_id` field.
/// With `clip_area` every triangle is intersected with it and triangles
/// falling outside are dropped; ids stay consecutive.
///
/// Fails with [`Error::InsufficientData`] for fewer than three distinct
/// points or a collinear set.
pub fn delaunay_triangulation(
    points: &FeatureCollection,
    clip_area: Option<&MultiPolygon<f64>>,
) -> Result<FeatureCollection> {
    let coords = distinct_coords(points);
    if coords.len() < 3 {
        return Err(Error::InsufficientData(format!(
            "Delaunay triangulation needs at least 3 distinct points, got {}",
            coords.len()
        )));
    }

    let vertices: Vec<delaunator::Point> = coords
        .iter()
        .map(|c| delaunator::Point { x: c.x, y: c.y })
        .collect();
    let triangulation = delaunator::triangulate(&vertices);
    if triangulation.triangles.is_empty() {
        return Err(Error::InsufficientData(
            "Input points are collinear, no triangle can be formed".to_string(),
        ));
    }
    debug!(
        points = coords.len(),
        triangles = triangulation.len(),
        "Delaunay triangulation built"
    );

    let mut out = points.empty_like();
    for tri in triangulation.triangles.chunks_exact(3) {
        let triangle = ccw_triangle(coords[tri[0]], coords[tri[1]], coords[tri[2]]);

        let geometry = match clip_area {
            Some(area) => match polygonal_geometry(triangle.intersection(area)) {
                Some(g) => g,
                None => continue,
            },
            None => Geometry::Polygon(triangle),
        };

        let id = out.len() as i64;
        out.push(Feature::new(geometry).with_property(TRIANGLE_ID_FIELD, AttributeValue::Int(id)));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::area;
    use approx::assert_relative_eq;
    use geo::{point, Rect, Winding};

    fn points(coords: &[(f64, f64)]) -> FeatureCollection {
        coords
            .iter()
            .map(|&(x, y)| Feature::new(Geometry::Point(point!(x: x, y: y))))
            .collect()
    }

    #[test]
    fn test_square_gives_two_ccw_triangles() {
        let fc = points(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let out = delaunay_triangulation(&fc, None).unwrap();
        assert_eq!(out.len(), 2);

        let mut total = 0.0;
        for (i, f) in out.iter().enumerate() {
            assert_eq!(f.get_property(TRIANGLE_ID_FIELD), Some(&AttributeValue::Int(i as i64)));
            let Some(Geometry::Polygon(p)) = &f.geometry else {
                panic!("triangle must be a polygon");
            };
            assert!(p.exterior().is_ccw(), "triangle {} is not counter-clockwise", i);
            total += area(f.geometry.as_ref().unwrap());
        }
        assert_relative_eq!(total, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_duplicates_are_merged() {
        let fc = points(&[(0.0, 0.0), (0.0, 0.0), (4.0, 0.0), (0.0, 3.0), (4.0, 0.0)]);
        let out = delaunay_triangulation(&fc, None).unwrap();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(area(out.features[0].geometry.as_ref().unwrap()), 6.0);
    }

    #[test]
    fn test_too_few_points() {
        let fc = points(&[(0.0, 0.0), (1.0, 1.0), (1.0, 1.0)]);
        assert!(matches!(
            delaunay_triangulation(&fc, None),
            Err(Error::InsufficientData(_))
        ));
    }

    #[test]
    fn test_collinear_points() {
        let fc = points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert!(matches!(
            delaunay_triangulation(&fc, None),
            Err(Error::InsufficientData(_))
        ));
    }

    #[test]
    fn test_clip_area_trims_triangles() {
        let fc = points(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let clip = MultiPolygon::new(vec![Rect::new((0.0, 0.0), (5.0, 10.0)).to_polygon()]);
        let out = delaunay_triangulation(&fc, Some(&clip)).unwrap();

        let total: f64 = out.iter().map(|f| area(f.geometry.as_ref().unwrap())).sum();
        assert_relative_eq!(total, 50.0, epsilon = 1e-6);
        for (i, f) in out.iter().enumerate() {
            assert_eq!(f.get_property(TRIANGLE_ID_FIELD), Some(&AttributeValue::Int(i as i64)));
        }
    }
}
