//! Axis-aligned envelopes

use geo::BoundingRect;
use geo_types::{Geometry, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in map units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Bounding box of a geometry, `None` for empty geometries
    pub fn from_geometry(geom: &Geometry<f64>) -> Option<Self> {
        geom.bounding_rect()
            .map(|rect| Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// True when the box has no positive area (a point, a line, or inverted)
    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Grow every side by `distance` (negative shrinks)
    pub fn expand_by(&self, distance: f64) -> Self {
        Self::new(
            self.min_x - distance,
            self.min_y - distance,
            self.max_x + distance,
            self.max_y + distance,
        )
    }

    /// Smallest envelope covering both
    pub fn expand_to_include(&self, other: &Envelope) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grow the max corner so width and height are whole multiples of
    /// `cell_size`, keeping the min corner. At least one cell is kept in each
    /// direction.
    pub fn snap_to_grid(&self, cell_size: f64) -> Self {
        let cols = (self.width() / cell_size).ceil().max(1.0);
        let rows = (self.height() / cell_size).ceil().max(1.0);
        Self::new(
            self.min_x,
            self.min_y,
            self.min_x + cols * cell_size,
            self.min_y + rows * cell_size,
        )
    }

    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Closed containment test
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Counter-clockwise rectangle polygon
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (self.min_x, self.min_y),
                (self.max_x, self.min_y),
                (self.max_x, self.max_y),
                (self.min_x, self.max_y),
                (self.min_x, self.min_y),
            ]),
            vec![],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo_types::line_string;

    #[test]
    fn test_from_geometry() {
        let ls = Geometry::LineString(line_string![(x: 2.0, y: -1.0), (x: -4.0, y: 3.0)]);
        let env = Envelope::from_geometry(&ls).unwrap();
        assert_eq!(env, Envelope::new(-4.0, -1.0, 2.0, 3.0));
        assert_relative_eq!(env.area(), 24.0);
    }

    #[test]
    fn test_expand() {
        let env = Envelope::new(0.0, 0.0, 10.0, 5.0).expand_by(1.0);
        assert_eq!(env, Envelope::new(-1.0, -1.0, 11.0, 6.0));
        let merged = env.expand_to_include(&Envelope::new(20.0, -3.0, 21.0, 0.0));
        assert_eq!(merged, Envelope::new(-1.0, -3.0, 21.0, 6.0));
    }

    #[test]
    fn test_snap_to_grid() {
        let env = Envelope::new(0.0, 0.0, 10.0, 4.5).snap_to_grid(3.0);
        assert_relative_eq!(env.max_x, 12.0);
        assert_relative_eq!(env.max_y, 6.0);

        let point = Envelope::new(5.0, 5.0, 5.0, 5.0).snap_to_grid(2.0);
        assert_relative_eq!(point.width(), 2.0);
        assert_relative_eq!(point.height(), 2.0);
    }

    #[test]
    fn test_is_empty() {
        assert!(Envelope::new(0.0, 0.0, 0.0, 3.0).is_empty());
        assert!(!Envelope::new(0.0, 0.0, 1.0, 3.0).is_empty());
    }
}
