//! Field calculators that append measurements to features

use super::measurements::{area, length, perimeter};
use geoprocs_core::vector::{AttributeValue, FeatureCollection};
use geo::Geometry;

type Measure = fn(&Geometry<f64>) -> f64;

fn measure_into(features: &FeatureCollection, fields: &[(&str, Measure)]) -> FeatureCollection {
    let mut out = features.empty_like();
    out.features = features
        .iter()
        .map(|feature| {
            let mut measured = feature.clone();
            for (name, measure) in fields {
                let value = feature
                    .geometry
                    .as_ref()
                    .map_or(AttributeValue::Null, |g| AttributeValue::Float(measure(g)));
                measured.set_property(*name, value);
            }
            measured
        })
        .collect();
    out
}

/// Copy every feature and append its area (and optionally perimeter) as
/// float fields. Features without geometry get null values.
pub fn calculate_area(
    features: &FeatureCollection,
    area_field: &str,
    perimeter_field: Option<&str>,
) -> FeatureCollection {
    match perimeter_field {
        Some(perimeter_field) => {
            measure_into(
                features,
                &[(area_field, area as Measure), (perimeter_field, perimeter as Measure)],
            )
        }
        None => measure_into(features, &[(area_field, area as Measure)]),
    }
}

/// Copy every feature and append its length as a float field
pub fn calculate_length(features: &FeatureCollection, length_field: &str) -> FeatureCollection {
    measure_into(features, &[(length_field, length as Measure)])
}
