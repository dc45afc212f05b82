//! Geometric measurements: area, length, perimeter
//!
//! All measurements are planar, in CRS units (square units for area).
//! Project geographic data before measuring.

use geo::{Area, Euclidean, Geometry, Length, Polygon};

fn polygon_perimeter(p: &Polygon<f64>) -> f64 {
    p.exterior().length::<Euclidean>()
        + p.interiors()
            .iter()
            .map(|r| r.length::<Euclidean>())
            .sum::<f64>()
}

/// Unsigned area of polygonal geometries, 0 for everything else
pub fn area(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Polygon(p) => p.unsigned_area(),
        Geometry::MultiPolygon(mp) => mp.unsigned_area(),
        Geometry::Rect(r) => r.unsigned_area(),
        Geometry::Triangle(t) => t.unsigned_area(),
        Geometry::GeometryCollection(gc) => gc.iter().map(area).sum(),
        _ => 0.0,
    }
}

/// Total length of exterior and interior rings
pub fn perimeter(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Polygon(p) => polygon_perimeter(p),
        Geometry::MultiPolygon(mp) => mp.0.iter().map(polygon_perimeter).sum(),
        Geometry::Rect(r) => polygon_perimeter(&r.to_polygon()),
        Geometry::Triangle(t) => polygon_perimeter(&t.to_polygon()),
        Geometry::GeometryCollection(gc) => gc.iter().map(perimeter).sum(),
        _ => 0.0,
    }
}

/// Length of linear geometries. Polygons measure their perimeter; points
/// have zero length.
pub fn length(geom: &Geometry<f64>) -> f64 {
    match geom {
        Geometry::Line(l) => l.length::<Euclidean>(),
        Geometry::LineString(ls) => ls.length::<Euclidean>(),
        Geometry::MultiLineString(mls) => mls.length::<Euclidean>(),
        Geometry::GeometryCollection(gc) => gc.iter().map(length).sum(),
        Geometry::Point(_) | Geometry::MultiPoint(_) => 0.0,
        polygonal => perimeter(polygonal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{line_string, point, polygon, Line, Coord};

    fn square_with_hole() -> Polygon<f64> {
        polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
            interiors: [[(x: 2.0, y: 2.0), (x: 4.0, y: 2.0), (x: 4.0, y: 4.0), (x: 2.0, y: 4.0)]],
        )
    }

    #[test]
    fn test_area_excludes_holes() {
        let a = area(&Geometry::Polygon(square_with_hole()));
        assert_relative_eq!(a, 96.0);
    }

    #[test]
    fn test_perimeter_includes_holes() {
        let p = perimeter(&Geometry::Polygon(square_with_hole()));
        assert_relative_eq!(p, 48.0);
    }

    #[test]
    fn test_length_linestring() {
        let ls = line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 4.0), (x: 3.0, y: 10.0)];
        assert_relative_eq!(length(&Geometry::LineString(ls)), 11.0);

        let line = Line::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 2.5 });
        assert_relative_eq!(length(&Geometry::Line(line)), 2.5);
    }

    #[test]
    fn test_length_of_polygon_is_perimeter() {
        assert_relative_eq!(length(&Geometry::Polygon(square_with_hole())), 48.0);
    }

    #[test]
    fn test_point_measures_zero() {
        let p = Geometry::Point(point!(x: 1.0, y: 1.0));
        assert_eq!(area(&p), 0.0);
        assert_eq!(length(&p), 0.0);
    }
}
