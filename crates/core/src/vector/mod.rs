//! Vector data model: features, attributes and envelopes

mod envelope;

pub use envelope::Envelope;

use crate::crs::CRS;
use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Numeric view of the value.
    ///
    /// Strings that parse as numbers count as numeric; booleans and nulls do not.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) if v.is_finite() => Some(*v),
            AttributeValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::String(v) => write!(f, "{}", v),
        }
    }
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    pub geometry: Option<Geometry<f64>>,
    pub properties: HashMap<String, AttributeValue>,
    pub id: Option<String>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Copy of this feature carrying a different geometry
    pub fn with_geometry(&self, geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: self.properties.clone(),
            id: self.id.clone(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_property(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.set_property(key, value);
        self
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }
}

/// Ordered collection of features sharing one CRS
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    pub crs: Option<CRS>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty collection with the same CRS as `self`
    pub fn empty_like(&self) -> Self {
        Self {
            features: Vec::new(),
            crs: self.crs.clone(),
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Every property key used by any feature, sorted
    pub fn field_names(&self) -> Vec<String> {
        self.features
            .iter()
            .flat_map(|f| f.properties.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Union of all feature envelopes, `None` when no feature has a geometry
    pub fn envelope(&self) -> Option<Envelope> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .filter_map(Envelope::from_geometry)
            .reduce(|acc, e| acc.expand_to_include(&e))
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
            crs: None,
        }
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{point, Geometry};

    #[test]
    fn test_attribute_numeric_view() {
        assert_eq!(AttributeValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(AttributeValue::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(AttributeValue::String(" 7.25 ".into()).as_f64(), Some(7.25));
        assert_eq!(AttributeValue::String("seven".into()).as_f64(), None);
        assert_eq!(AttributeValue::Bool(true).as_f64(), None);
        assert_eq!(AttributeValue::Null.as_f64(), None);
        assert_eq!(AttributeValue::Float(f64::NAN).as_f64(), None);
    }

    #[test]
    fn test_field_names_and_envelope() {
        let fc: FeatureCollection = vec![
            Feature::new(Geometry::Point(point!(x: 1.0, y: 2.0)))
                .with_property("b", AttributeValue::Int(1)),
            Feature::new(Geometry::Point(point!(x: -3.0, y: 5.0)))
                .with_property("a", AttributeValue::Null)
                .with_property("b", AttributeValue::Int(2)),
        ]
        .into_iter()
        .collect();

        assert_eq!(fc.field_names(), vec!["a".to_string(), "b".to_string()]);
        let env = fc.envelope().unwrap();
        assert_eq!(env, Envelope::new(-3.0, 2.0, 1.0, 5.0));
    }

    #[test]
    fn test_envelope_none_without_geometry() {
        let mut fc = FeatureCollection::new();
        fc.push(Feature {
            geometry: None,
            properties: HashMap::new(),
            id: Some("x".into()),
        });
        assert!(fc.envelope().is_none());
    }
}
