//! Spatial statistics on point and attribute data
//!
//! - **quadrat**: quadrat count analysis with a Kolmogorov-Smirnov test
//! - **nearest_neighbor**: Clark-Evans average nearest neighbour ratio
//! - **correlation**: Pearson correlation matrix of numeric fields

mod correlation;
mod distribution;
mod nearest_neighbor;
mod quadrat;

pub use correlation::{pearson_correlation, CorrelationReport};
pub use nearest_neighbor::{average_nearest_neighbor, NearestNeighborReport};
pub use quadrat::{quadrat_analysis, QuadratParams, QuadratReport};

use geo::Geometry;
use geoprocs_core::vector::FeatureCollection;
use geoprocs_core::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Classification of a point pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointPattern {
    Clustered,
    Random,
    Dispersed,
}

impl fmt::Display for PointPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PointPattern::Clustered => "clustered",
            PointPattern::Random => "random",
            PointPattern::Dispersed => "dispersed",
        };
        f.write_str(name)
    }
}

/// Coordinates of every Point and MultiPoint member.
///
/// Features without geometry are skipped; any other geometry type is an
/// error.
pub fn point_coords(features: &FeatureCollection) -> Result<Vec<[f64; 2]>> {
    let mut coords = Vec::with_capacity(features.len());
    for geom in features.iter().filter_map(|f| f.geometry.as_ref()) {
        match geom {
            Geometry::Point(p) => coords.push([p.x(), p.y()]),
            Geometry::MultiPoint(mp) => coords.extend(mp.iter().map(|p| [p.x(), p.y()])),
            other => {
                return Err(Error::UnsupportedGeometry(format!(
                    "expected points, found {}",
                    geometry_name(other)
                )))
            }
        }
    }
    Ok(coords)
}

/// GeoJSON type name of a geometry
pub fn geometry_name(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
pub(crate) fn point_layer(coords: &[(f64, f64)]) -> FeatureCollection {
    use geo::point;
    use geoprocs_core::vector::Feature;

    coords
        .iter()
        .map(|&(x, y)| Feature::new(Geometry::Point(point!(x: x, y: y))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, MultiPoint};
    use geoprocs_core::vector::Feature;

    #[test]
    fn test_point_coords_flattens_multipoints() {
        let mut fc = point_layer(&[(1.0, 2.0)]);
        fc.push(Feature::new(Geometry::MultiPoint(MultiPoint::new(vec![
            point!(x: 3.0, y: 4.0),
            point!(x: 5.0, y: 6.0),
        ]))));
        fc.push(Feature::default());

        assert_eq!(point_coords(&fc).unwrap(), vec![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    }

    #[test]
    fn test_point_coords_rejects_lines() {
        let mut fc = point_layer(&[(1.0, 2.0)]);
        fc.push(Feature::new(Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)])));
        assert!(matches!(point_coords(&fc), Err(Error::UnsupportedGeometry(_))));
    }
}
