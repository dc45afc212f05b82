//! GeoJSON reading and writing on top of the `geojson` crate

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::vector::{AttributeValue, Feature, FeatureCollection};
use geo_types::Geometry;
use geojson::feature::Id;
use geojson::{GeoJson, JsonObject, JsonValue};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Read a GeoJSON file.
///
/// A bare Feature or Geometry document is wrapped in a one-feature collection.
pub fn read_geojson<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let text = fs::read_to_string(path.as_ref())?;
    parse_geojson(&text)
}

/// Parse GeoJSON text
pub fn parse_geojson(text: &str) -> Result<FeatureCollection> {
    let document: GeoJson = text.parse()?;
    match document {
        GeoJson::FeatureCollection(fc) => {
            let crs = fc.foreign_members.as_ref().and_then(crs_member);
            let features = fc
                .features
                .into_iter()
                .map(convert_feature)
                .collect::<Result<Vec<_>>>()?;
            Ok(FeatureCollection { features, crs })
        }
        GeoJson::Feature(f) => Ok(FeatureCollection {
            features: vec![convert_feature(f)?],
            crs: None,
        }),
        GeoJson::Geometry(g) => {
            let geometry = Geometry::<f64>::try_from(g)?;
            Ok(FeatureCollection {
                features: vec![Feature::new(geometry)],
                crs: None,
            })
        }
    }
}

/// Legacy `{"crs": {"type": "name", "properties": {"name": ...}}}` member
fn crs_member(members: &JsonObject) -> Option<CRS> {
    members
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()
        .map(CRS::parse)
}

fn convert_feature(feature: geojson::Feature) -> Result<Feature> {
    let geometry = feature
        .geometry
        .map(Geometry::<f64>::try_from)
        .transpose()?;

    let properties = feature
        .properties
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, json_to_attribute(v)))
        .collect::<HashMap<_, _>>();

    let id = feature.id.map(|id| match id {
        Id::String(s) => s,
        Id::Number(n) => n.to_string(),
    });

    Ok(Feature {
        geometry,
        properties,
        id,
    })
}

fn json_to_attribute(value: JsonValue) -> AttributeValue {
    match value {
        JsonValue::Null => AttributeValue::Null,
        JsonValue::Bool(b) => AttributeValue::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => AttributeValue::Int(i),
            None => n
                .as_f64()
                .map(AttributeValue::Float)
                .unwrap_or(AttributeValue::Null),
        },
        JsonValue::String(s) => AttributeValue::String(s),
        other => AttributeValue::String(other.to_string()),
    }
}

fn attribute_to_json(value: &AttributeValue) -> JsonValue {
    match value {
        AttributeValue::Null => JsonValue::Null,
        AttributeValue::Bool(b) => JsonValue::Bool(*b),
        AttributeValue::Int(i) => JsonValue::from(*i),
        AttributeValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        AttributeValue::String(s) => JsonValue::String(s.clone()),
    }
}

/// Convert a feature collection into a `geojson` document
pub fn to_geojson(collection: &FeatureCollection) -> geojson::FeatureCollection {
    let features = collection
        .features
        .iter()
        .map(|f| {
            let properties: JsonObject = f
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), attribute_to_json(v)))
                .collect();
            geojson::Feature {
                bbox: None,
                geometry: f
                    .geometry
                    .as_ref()
                    .map(|g| geojson::Geometry::new(geojson::Value::from(g))),
                id: f.id.clone().map(Id::String),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let foreign_members = collection.crs.as_ref().and_then(|c| c.urn()).map(|urn| {
        let mut members = JsonObject::new();
        members.insert(
            "crs".to_string(),
            serde_json::json!({ "type": "name", "properties": { "name": urn } }),
        );
        members
    });

    geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members,
    }
}

/// Serialize a feature collection as pretty-printed GeoJSON text
pub fn geojson_string(collection: &FeatureCollection) -> Result<String> {
    serde_json::to_string_pretty(&to_geojson(collection)).map_err(|e| Error::GeoJson(e.to_string()))
}

/// Write a feature collection to a GeoJSON file
pub fn write_geojson<P: AsRef<Path>>(collection: &FeatureCollection, path: P) -> Result<()> {
    fs::write(path.as_ref(), geojson_string(collection)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, Geometry};

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::5186" } },
        "features": [
            { "type": "Feature", "id": 7,
              "geometry": { "type": "Point", "coordinates": [1.5, 2.5] },
              "properties": { "name": "well", "depth": 12, "yield": 3.25, "dry": false, "note": null } },
            { "type": "Feature",
              "geometry": null,
              "properties": { "tags": ["a", "b"] } }
        ]
    }"#;

    #[test]
    fn test_parse_collection() {
        let fc = parse_geojson(SAMPLE).unwrap();
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.crs.as_ref().and_then(|c| c.epsg()), Some(5186));

        let first = &fc.features[0];
        assert_eq!(first.id.as_deref(), Some("7"));
        assert_eq!(first.get_property("depth"), Some(&AttributeValue::Int(12)));
        assert_eq!(first.get_property("yield"), Some(&AttributeValue::Float(3.25)));
        assert_eq!(first.get_property("dry"), Some(&AttributeValue::Bool(false)));
        assert_eq!(first.get_property("note"), Some(&AttributeValue::Null));
        assert!(matches!(first.geometry, Some(Geometry::Point(_))));

        let second = &fc.features[1];
        assert!(second.geometry.is_none());
        assert_eq!(
            second.get_property("tags"),
            Some(&AttributeValue::String("[\"a\",\"b\"]".into()))
        );
    }

    #[test]
    fn test_bare_geometry_is_wrapped() {
        let fc = parse_geojson(r#"{"type":"LineString","coordinates":[[0,0],[1,1]]}"#).unwrap();
        assert_eq!(fc.len(), 1);
        assert!(matches!(fc.features[0].geometry, Some(Geometry::LineString(_))));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parcels.geojson");

        let mut fc = FeatureCollection::new();
        fc.crs = Some(CRS::from_epsg(32719));
        fc.push(
            Feature::new(Geometry::Polygon(polygon![
                (x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 3.0), (x: 0.0, y: 0.0)
            ]))
            .with_property("owner", AttributeValue::String("ana".into()))
            .with_property("area", AttributeValue::Float(6.0)),
        );

        write_geojson(&fc, &path).unwrap();
        let back = read_geojson(&path).unwrap();

        assert_eq!(back.len(), 1);
        assert_eq!(back.crs.as_ref().and_then(|c| c.epsg()), Some(32719));
        assert_eq!(back.features[0].geometry, fc.features[0].geometry);
        assert_eq!(
            back.features[0].get_property("owner"),
            Some(&AttributeValue::String("ana".into()))
        );
        assert_eq!(back.features[0].get_property("area"), Some(&AttributeValue::Float(6.0)));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(matches!(parse_geojson("{ not json"), Err(Error::GeoJson(_))));
    }
}
