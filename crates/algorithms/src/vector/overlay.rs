//! Overlay of feature collections
//!
//! `clip` and `erase` restrict any geometry by the union of a polygon mask
//! layer. `intersect`, `union` and `sym_difference` combine two polygon
//! layers piece by piece and merge their attributes. Candidate pairs come
//! from an envelope R-tree; the geometry work is done by `geo::BooleanOps`.

use super::index::EnvelopeIndex;
use geo::{Area, BooleanOps, Geometry, GeometryCollection, Intersects, LineString, MultiLineString, MultiPolygon, Polygon};
use geoprocs_core::vector::{AttributeValue, Envelope, Feature, FeatureCollection};
use std::collections::HashMap;
use tracing::warn;

/// Suffix appended to overlay fields whose name is taken by the input layer
const COLLISION_SUFFIX: &str = "_1";

pub(crate) fn as_multi_polygon(geom: &Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geom {
        Geometry::Polygon(p) => Some(MultiPolygon::new(vec![p.clone()])),
        Geometry::MultiPolygon(mp) => Some(mp.clone()),
        Geometry::Rect(r) => Some(MultiPolygon::new(vec![r.to_polygon()])),
        Geometry::Triangle(t) => Some(MultiPolygon::new(vec![t.to_polygon()])),
        _ => None,
    }
}

fn as_multi_line_string(geom: &Geometry<f64>) -> Option<MultiLineString<f64>> {
    match geom {
        Geometry::Line(l) => Some(MultiLineString::new(vec![LineString::from(vec![l.start, l.end])])),
        Geometry::LineString(ls) => Some(MultiLineString::new(vec![ls.clone()])),
        Geometry::MultiLineString(mls) => Some(mls.clone()),
        _ => None,
    }
}

/// Package a polygonal result: nothing, a `Polygon`, or a `MultiPolygon`.
/// Zero-area parts are dropped.
pub(crate) fn polygonal_geometry(mp: MultiPolygon<f64>) -> Option<Geometry<f64>> {
    let mut parts: Vec<Polygon<f64>> = mp.0.into_iter().filter(|p| p.unsigned_area() > 0.0).collect();
    match parts.len() {
        0 => None,
        1 => parts.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon::new(parts))),
    }
}

fn linear_geometry(mls: MultiLineString<f64>) -> Option<Geometry<f64>> {
    let mut parts: Vec<LineString<f64>> = mls.0.into_iter().filter(|ls| ls.0.len() >= 2).collect();
    match parts.len() {
        0 => None,
        1 => parts.pop().map(Geometry::LineString),
        _ => Some(Geometry::MultiLineString(MultiLineString::new(parts))),
    }
}

enum Restricted {
    Piece(Geometry<f64>),
    Empty,
    Unsupported,
}

impl From<Option<Geometry<f64>>> for Restricted {
    fn from(piece: Option<Geometry<f64>>) -> Self {
        piece.map_or(Restricted::Empty, Restricted::Piece)
    }
}

/// Part of `geom` inside the mask, or outside it when `invert` is set
fn restrict(geom: &Geometry<f64>, mask: &MultiPolygon<f64>, invert: bool) -> Restricted {
    match geom {
        Geometry::Point(p) => (mask.intersects(p) != invert).then(|| geom.clone()).into(),
        Geometry::MultiPoint(mp) => {
            let kept: Vec<_> = mp.iter().filter(|p| mask.intersects(*p) != invert).copied().collect();
            (!kept.is_empty()).then(|| Geometry::MultiPoint(kept.into())).into()
        }
        Geometry::GeometryCollection(gc) => {
            let mut pieces = Vec::new();
            for member in gc.iter() {
                match restrict(member, mask, invert) {
                    Restricted::Piece(piece) => pieces.push(piece),
                    Restricted::Empty => {}
                    Restricted::Unsupported => return Restricted::Unsupported,
                }
            }
            (!pieces.is_empty())
                .then(|| Geometry::GeometryCollection(GeometryCollection(pieces)))
                .into()
        }
        _ => {
            if let Some(lines) = as_multi_line_string(geom) {
                linear_geometry(mask.clip(&lines, invert)).into()
            } else if let Some(polygons) = as_multi_polygon(geom) {
                let piece = if invert {
                    polygons.difference(mask)
                } else {
                    polygons.intersection(mask)
                };
                polygonal_geometry(piece).into()
            } else {
                Restricted::Unsupported
            }
        }
    }
}

/// Union of the polygons of the selected features
fn dissolve(polygons: &[Option<MultiPolygon<f64>>], indices: &[usize]) -> MultiPolygon<f64> {
    indices
        .iter()
        .filter_map(|&i| polygons[i].as_ref())
        .fold(MultiPolygon::new(vec![]), |acc, mp| acc.union(mp))
}

fn layer_polygons(layer: &FeatureCollection) -> Vec<Option<MultiPolygon<f64>>> {
    layer
        .iter()
        .map(|f| f.geometry.as_ref().and_then(as_multi_polygon))
        .collect()
}

/// Union of every polygonal geometry in the layer; other geometries are
/// ignored
pub fn polygon_union(layer: &FeatureCollection) -> MultiPolygon<f64> {
    let polygons = layer_polygons(layer);
    let all: Vec<usize> = (0..polygons.len()).collect();
    dissolve(&polygons, &all)
}

fn mask_layer(input: &FeatureCollection, mask: &FeatureCollection, invert: bool) -> FeatureCollection {
    let mask_polygons = layer_polygons(mask);
    let index = EnvelopeIndex::build(mask);
    let mut out = input.empty_like();
    let mut skipped = 0usize;

    for feature in input.iter() {
        let Some((geom, env)) = feature
            .geometry
            .as_ref()
            .and_then(|g| Envelope::from_geometry(g).map(|env| (g, env)))
        else {
            skipped += 1;
            continue;
        };

        let candidates = index.candidates(&env);
        if candidates.is_empty() {
            if invert {
                out.push(feature.clone());
            }
            continue;
        }

        match restrict(geom, &dissolve(&mask_polygons, &candidates), invert) {
            Restricted::Piece(piece) => out.push(feature.with_geometry(piece)),
            Restricted::Empty => {}
            Restricted::Unsupported => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, "Features without a supported geometry were skipped");
    }
    out
}

/// Restrict every input feature to the union of the clip polygons.
///
/// Points are kept when they intersect the clip area, lines are cut at its
/// boundary and polygons are intersected with it. Attributes are copied;
/// features that end up empty are dropped.
pub fn clip(input: &FeatureCollection, clip_layer: &FeatureCollection) -> FeatureCollection {
    mask_layer(input, clip_layer, false)
}

/// Remove from every input feature the part covered by the erase polygons.
///
/// The complement of [`clip`]: features away from every erase polygon pass
/// through unchanged.
pub fn erase(input: &FeatureCollection, erase_layer: &FeatureCollection) -> FeatureCollection {
    mask_layer(input, erase_layer, true)
}

/// Output attribute schema of a two-layer overlay
struct Schema {
    input: Vec<String>,
    /// (field in the overlay layer, field in the output)
    overlay: Vec<(String, String)>,
}

impl Schema {
    fn new(input: &FeatureCollection, overlay: &FeatureCollection) -> Self {
        let input_fields = input.field_names();
        let overlay_fields = overlay
            .field_names()
            .into_iter()
            .map(|name| {
                let renamed = if input_fields.contains(&name) {
                    format!("{}{}", name, COLLISION_SUFFIX)
                } else {
                    name.clone()
                };
                (name, renamed)
            })
            .collect();

        Self {
            input: input_fields,
            overlay: overlay_fields,
        }
    }

    fn properties(&self, a: Option<&Feature>, b: Option<&Feature>) -> HashMap<String, AttributeValue> {
        let value = |f: Option<&Feature>, name: &str| {
            f.and_then(|f| f.get_property(name))
                .cloned()
                .unwrap_or(AttributeValue::Null)
        };

        let mut props = HashMap::with_capacity(self.input.len() + self.overlay.len());
        for name in &self.input {
            props.insert(name.clone(), value(a, name));
        }
        for (source, target) in &self.overlay {
            props.insert(target.clone(), value(b, source));
        }
        props
    }
}

/// A polygon layer prepared for overlay
struct PolygonLayer<'a> {
    features: &'a FeatureCollection,
    polygons: Vec<Option<MultiPolygon<f64>>>,
    index: EnvelopeIndex,
}

impl<'a> PolygonLayer<'a> {
    fn new(features: &'a FeatureCollection) -> Self {
        let polygons = layer_polygons(features);
        let skipped = polygons.iter().filter(|p| p.is_none()).count();
        if skipped > 0 {
            warn!(skipped, "Non-polygon features are ignored by the overlay");
        }
        Self {
            features,
            polygons,
            index: EnvelopeIndex::build(features),
        }
    }

    /// Polygons with their feature index and envelope
    fn iter(&self) -> impl Iterator<Item = (usize, &MultiPolygon<f64>, Envelope)> + '_ {
        self.polygons.iter().enumerate().filter_map(|(i, p)| {
            let p = p.as_ref()?;
            let env = self.features.features[i].geometry.as_ref().and_then(Envelope::from_geometry)?;
            Some((i, p, env))
        })
    }
}

fn intersection_pieces(a: &PolygonLayer, b: &PolygonLayer, schema: &Schema, out: &mut FeatureCollection) {
    for (i, pa, env) in a.iter() {
        for j in b.index.candidates(&env) {
            let Some(pb) = b.polygons[j].as_ref() else {
                continue;
            };
            if let Some(piece) = polygonal_geometry(pa.intersection(pb)) {
                out.push(Feature {
                    geometry: Some(piece),
                    properties: schema.properties(Some(&a.features.features[i]), Some(&b.features.features[j])),
                    id: None,
                });
            }
        }
    }
}

/// Pieces of `from` not covered by `other`. `from_is_input` selects which
/// side of the schema the attributes fill.
fn difference_pieces(
    from: &PolygonLayer,
    other: &PolygonLayer,
    from_is_input: bool,
    schema: &Schema,
    out: &mut FeatureCollection,
) {
    for (i, polygons, env) in from.iter() {
        let candidates = other.index.candidates(&env);
        let piece = if candidates.is_empty() {
            polygons.clone()
        } else {
            polygons.difference(&dissolve(&other.polygons, &candidates))
        };

        if let Some(piece) = polygonal_geometry(piece) {
            let feature = &from.features.features[i];
            let properties = if from_is_input {
                schema.properties(Some(feature), None)
            } else {
                schema.properties(None, Some(feature))
            };
            out.push(Feature {
                geometry: Some(piece),
                properties,
                id: None,
            });
        }
    }
}

/// One feature per intersecting pair of input and overlay polygons, carrying
/// the attributes of both. Overlay fields whose name already exists in the
/// input get the suffix `_1`.
pub fn intersect(input: &FeatureCollection, overlay: &FeatureCollection) -> FeatureCollection {
    let (a, b) = (PolygonLayer::new(input), PolygonLayer::new(overlay));
    let schema = Schema::new(input, overlay);
    let mut out = input.empty_like();
    intersection_pieces(&a, &b, &schema, &mut out);
    out
}

/// Intersection pieces, then input-only pieces, then overlay-only pieces.
/// Fields of the missing side are null.
pub fn union(input: &FeatureCollection, overlay: &FeatureCollection) -> FeatureCollection {
    let (a, b) = (PolygonLayer::new(input), PolygonLayer::new(overlay));
    let schema = Schema::new(input, overlay);
    let mut out = input.empty_like();
    intersection_pieces(&a, &b, &schema, &mut out);
    difference_pieces(&a, &b, true, &schema, &mut out);
    difference_pieces(&b, &a, false, &schema, &mut out);
    out
}

/// The parts covered by exactly one of the two layers
pub fn sym_difference(input: &FeatureCollection, overlay: &FeatureCollection) -> FeatureCollection {
    let (a, b) = (PolygonLayer::new(input), PolygonLayer::new(overlay));
    let schema = Schema::new(input, overlay);
    let mut out = input.empty_like();
    difference_pieces(&a, &b, true, &schema, &mut out);
    difference_pieces(&b, &a, false, &schema, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{area, length};
    use approx::assert_relative_eq;
    use geo::{line_string, point, Rect};

    fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Geometry<f64> {
        Geometry::Polygon(Rect::new((min_x, min_y), (max_x, max_y)).to_polygon())
    }

    fn text(s: &str) -> AttributeValue {
        AttributeValue::String(s.to_string())
    }

    fn mixed_input() -> FeatureCollection {
        let mut fc = FeatureCollection::new();
        fc.push(Feature::new(square(0.0, 0.0, 10.0, 10.0)).with_property("kind", text("parcel")));
        fc.push(Feature::new(Geometry::Point(point!(x: 7.0, y: 7.0))).with_property("kind", text("in")));
        fc.push(Feature::new(Geometry::Point(point!(x: 1.0, y: 1.0))).with_property("kind", text("out")));
        fc.push(
            Feature::new(Geometry::LineString(line_string![(x: 0.0, y: 5.0), (x: 20.0, y: 5.0)]))
                .with_property("kind", text("road")),
        );
        fc
    }

    /// Two adjacent squares covering x in [5, 15]
    fn mask() -> FeatureCollection {
        let mut fc = FeatureCollection::new();
        fc.push(Feature::new(square(5.0, 0.0, 10.0, 10.0)));
        fc.push(Feature::new(square(10.0, 0.0, 15.0, 10.0)));
        fc
    }

    fn kinds(fc: &FeatureCollection) -> Vec<String> {
        fc.iter().map(|f| f.get_property("kind").unwrap().to_string()).collect()
    }

    #[test]
    fn test_clip_mixed_geometries() {
        let out = clip(&mixed_input(), &mask());
        assert_eq!(kinds(&out), vec!["parcel", "in", "road"]);

        let parcel = out.features[0].geometry.as_ref().unwrap();
        assert!(matches!(parcel, Geometry::Polygon(_)));
        assert_relative_eq!(area(parcel), 50.0, epsilon = 1e-6);

        let road = out.features[2].geometry.as_ref().unwrap();
        assert_relative_eq!(length(road), 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_erase_is_complement_of_clip() {
        let out = erase(&mixed_input(), &mask());
        assert_eq!(kinds(&out), vec!["parcel", "out", "road"]);
        assert_relative_eq!(area(out.features[0].geometry.as_ref().unwrap()), 50.0, epsilon = 1e-6);
        assert_relative_eq!(length(out.features[2].geometry.as_ref().unwrap()), 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_erase_keeps_distant_features_unchanged() {
        let mut input = FeatureCollection::new();
        let far = Feature::new(square(100.0, 100.0, 101.0, 101.0)).with_property("kind", text("far"));
        input.push(far.clone());

        let out = erase(&input, &mask());
        assert_eq!(out.features, vec![far]);
    }

    fn collection(members: Vec<Geometry<f64>>, kind: &str) -> Feature {
        Feature::new(Geometry::GeometryCollection(GeometryCollection(members)))
            .with_property("kind", text(kind))
    }

    fn members(feature: &Feature) -> Vec<Geometry<f64>> {
        match feature.geometry.as_ref().unwrap() {
            Geometry::GeometryCollection(gc) => gc.0.clone(),
            other => panic!("expected a collection, got {:?}", other),
        }
    }

    #[test]
    fn test_collections_are_restricted_member_by_member() {
        let mut input = FeatureCollection::new();
        input.push(collection(
            vec![Geometry::Point(point!(x: 7.0, y: 7.0)), square(0.0, 0.0, 10.0, 10.0)],
            "overlapping",
        ));
        input.push(collection(vec![Geometry::Point(point!(x: 100.0, y: 100.0))], "far"));
        input.push(collection(vec![square(6.0, 1.0, 9.0, 4.0)], "covered"));

        let clipped = clip(&input, &mask());
        assert_eq!(kinds(&clipped), vec!["overlapping", "covered"]);
        let parts = members(&clipped.features[0]);
        assert_eq!(parts.len(), 2);
        assert!(matches!(parts[0], Geometry::Point(_)));
        assert_relative_eq!(area(&parts[1]), 50.0, epsilon = 1e-6);

        let erased = erase(&input, &mask());
        assert_eq!(kinds(&erased), vec!["overlapping", "far"]);
        let parts = members(&erased.features[0]);
        assert_eq!(parts.len(), 1);
        assert_relative_eq!(area(&parts[0]), 50.0, epsilon = 1e-6);
        assert_eq!(erased.features[1], input.features[1]);
    }

    #[test]
    fn test_polygon_union_merges_adjacent() {
        let merged = polygon_union(&mask());
        assert_eq!(merged.0.len(), 1);
        assert_relative_eq!(merged.unsigned_area(), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_clip_with_empty_input() {
        assert!(clip(&FeatureCollection::new(), &mask()).is_empty());
    }

    fn pair() -> (FeatureCollection, FeatureCollection) {
        let mut a = FeatureCollection::new();
        a.push(
            Feature::new(square(0.0, 0.0, 10.0, 10.0))
                .with_property("name", text("a"))
                .with_property("v", AttributeValue::Int(1)),
        );
        let mut b = FeatureCollection::new();
        b.push(
            Feature::new(square(5.0, 5.0, 15.0, 15.0))
                .with_property("name", text("b"))
                .with_property("w", AttributeValue::Int(2)),
        );
        (a, b)
    }

    #[test]
    fn test_intersect_merges_attributes() {
        let (a, b) = pair();
        let out = intersect(&a, &b);
        assert_eq!(out.len(), 1);

        let piece = &out.features[0];
        assert_relative_eq!(area(piece.geometry.as_ref().unwrap()), 25.0, epsilon = 1e-6);
        assert_eq!(piece.get_property("name"), Some(&text("a")));
        assert_eq!(piece.get_property("name_1"), Some(&text("b")));
        assert_eq!(piece.get_property("v"), Some(&AttributeValue::Int(1)));
        assert_eq!(piece.get_property("w"), Some(&AttributeValue::Int(2)));
    }

    #[test]
    fn test_intersect_touching_squares_is_empty() {
        let mut a = FeatureCollection::new();
        a.push(Feature::new(square(0.0, 0.0, 1.0, 1.0)));
        let mut b = FeatureCollection::new();
        b.push(Feature::new(square(1.0, 0.0, 2.0, 1.0)));
        assert!(intersect(&a, &b).is_empty());
    }

    #[test]
    fn test_union_pieces() {
        let (a, b) = pair();
        let out = union(&a, &b);
        assert_eq!(out.len(), 3);

        let areas: Vec<f64> = out.iter().map(|f| area(f.geometry.as_ref().unwrap())).collect();
        assert_relative_eq!(areas[0], 25.0, epsilon = 1e-6);
        assert_relative_eq!(areas[1], 75.0, epsilon = 1e-6);
        assert_relative_eq!(areas[2], 75.0, epsilon = 1e-6);

        assert_eq!(out.features[1].get_property("w"), Some(&AttributeValue::Null));
        assert_eq!(out.features[2].get_property("v"), Some(&AttributeValue::Null));
        assert_eq!(out.features[2].get_property("name_1"), Some(&text("b")));
    }

    #[test]
    fn test_sym_difference() {
        let (a, b) = pair();
        let out = sym_difference(&a, &b);
        assert_eq!(out.len(), 2);
        let total: f64 = out.iter().map(|f| area(f.geometry.as_ref().unwrap())).sum();
        assert_relative_eq!(total, 150.0, epsilon = 1e-6);
    }
}
