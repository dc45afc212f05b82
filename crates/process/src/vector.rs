//! Vector processes: measurements, overlay, triangulation and cleanup

use crate::descriptor::{
    optional, required, Category, ParamInfo, ParamKind, ProcessInfo, FEATURES, POINTS, RESULT_FEATURES,
};
use crate::error::Result;
use crate::process::Process;
use crate::validate;
use geoprocs_algorithms::vector::{
    calculate_area, calculate_length, clip, delaunay_triangulation, delete_duplicates, erase, intersect,
    polygon_union, sym_difference, union,
};
use geoprocs_core::FeatureCollection;

const FEATURES_OUT: &[ParamInfo] = &[RESULT_FEATURES];

// ═══ MEASUREMENTS ═══

pub static CALCULATE_AREA: ProcessInfo = ProcessInfo {
    name: "vector:CalculateArea",
    title: "Calculate area",
    description: "Adds planar area and perimeter fields to every feature",
    category: Category::Vector,
    inputs: &[
        FEATURES,
        optional(
            "area_field",
            "Area field",
            "Name of the area field",
            ParamKind::Text,
            Some("geom_area"),
        ),
        optional(
            "perimeter_field",
            "Perimeter field",
            "Name of the perimeter field; omitted when empty",
            ParamKind::Text,
            Some("geom_perim"),
        ),
    ],
    outputs: FEATURES_OUT,
};

#[derive(Debug, Clone)]
pub struct CalculateAreaInput {
    pub features: FeatureCollection,
    pub area_field: String,
    pub perimeter_field: Option<String>,
}

impl CalculateAreaInput {
    pub fn new(features: FeatureCollection) -> Self {
        Self {
            features,
            area_field: "geom_area".into(),
            perimeter_field: Some("geom_perim".into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CalculateArea;

impl Process for CalculateArea {
    type Input = CalculateAreaInput;
    type Output = FeatureCollection;

    fn info(&self) -> &'static ProcessInfo {
        &CALCULATE_AREA
    }

    fn validate(&self, input: &CalculateAreaInput) -> Result<()> {
        validate::field_name(&CALCULATE_AREA, "area_field", &input.area_field)?;
        if let Some(field) = &input.perimeter_field {
            validate::field_name(&CALCULATE_AREA, "perimeter_field", field)?;
        }
        Ok(())
    }

    fn execute(&self, input: CalculateAreaInput) -> geoprocs_core::Result<FeatureCollection> {
        Ok(calculate_area(
            &input.features,
            &input.area_field,
            input.perimeter_field.as_deref(),
        ))
    }
}

pub static CALCULATE_LENGTH: ProcessInfo = ProcessInfo {
    name: "vector:CalculateLength",
    title: "Calculate length",
    description: "Adds a planar length field; polygons get their perimeter",
    category: Category::Vector,
    inputs: &[
        FEATURES,
        optional(
            "length_field",
            "Length field",
            "Name of the length field",
            ParamKind::Text,
            Some("geom_len"),
        ),
    ],
    outputs: FEATURES_OUT,
};

#[derive(Debug, Clone)]
pub struct CalculateLengthInput {
    pub features: FeatureCollection,
    pub length_field: String,
}

impl CalculateLengthInput {
    pub fn new(features: FeatureCollection) -> Self {
        Self {
            features,
            length_field: "geom_len".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CalculateLength;

impl Process for CalculateLength {
    type Input = CalculateLengthInput;
    type Output = FeatureCollection;

    fn info(&self) -> &'static ProcessInfo {
        &CALCULATE_LENGTH
    }

    fn validate(&self, input: &CalculateLengthInput) -> Result<()> {
        validate::field_name(&CALCULATE_LENGTH, "length_field", &input.length_field)
    }

    fn execute(&self, input: CalculateLengthInput) -> geoprocs_core::Result<FeatureCollection> {
        Ok(calculate_length(&input.features, &input.length_field))
    }
}

// ═══ CLIP / ERASE ═══

pub static CLIP: ProcessInfo = ProcessInfo {
    name: "vector:Clip",
    title: "Clip",
    description: "Keeps the parts of the input features inside the clip polygons",
    category: Category::Vector,
    inputs: &[
        FEATURES,
        required(
            "clip_features",
            "Clip features",
            "Polygons bounding the output",
            ParamKind::Features,
        ),
    ],
    outputs: FEATURES_OUT,
};

#[derive(Debug, Clone)]
pub struct ClipInput {
    pub features: FeatureCollection,
    pub clip_features: FeatureCollection,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Clip;

impl Process for Clip {
    type Input = ClipInput;
    type Output = FeatureCollection;

    fn info(&self) -> &'static ProcessInfo {
        &CLIP
    }

    fn validate(&self, input: &ClipInput) -> Result<()> {
        validate::not_empty(&CLIP, "clip_features", &input.clip_features)
    }

    fn execute(&self, input: ClipInput) -> geoprocs_core::Result<FeatureCollection> {
        Ok(clip(&input.features, &input.clip_features))
    }
}

pub static ERASE: ProcessInfo = ProcessInfo {
    name: "vector:Erase",
    title: "Erase",
    description: "Removes the parts of the input features inside the erase polygons",
    category: Category::Vector,
    inputs: &[
        FEATURES,
        required(
            "erase_features",
            "Erase features",
            "Polygons to cut away",
            ParamKind::Features,
        ),
    ],
    outputs: FEATURES_OUT,
};

#[derive(Debug, Clone)]
pub struct EraseInput {
    pub features: FeatureCollection,
    pub erase_features: FeatureCollection,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Erase;

impl Process for Erase {
    type Input = EraseInput;
    type Output = FeatureCollection;

    fn info(&self) -> &'static ProcessInfo {
        &ERASE
    }

    fn validate(&self, input: &EraseInput) -> Result<()> {
        validate::not_empty(&ERASE, "erase_features", &input.erase_features)
    }

    fn execute(&self, input: EraseInput) -> geoprocs_core::Result<FeatureCollection> {
        Ok(erase(&input.features, &input.erase_features))
    }
}

// ═══ POLYGON OVERLAY ═══

const OVERLAY_INPUTS: &[ParamInfo] = &[
    FEATURES,
    required(
        "overlay_features",
        "Overlay features",
        "Second polygon layer",
        ParamKind::Features,
    ),
];

pub static INTERSECT: ProcessInfo = ProcessInfo {
    name: "vector:Intersect",
    title: "Intersect",
    description: "Areas covered by both layers, carrying the attributes of both",
    category: Category::Vector,
    inputs: OVERLAY_INPUTS,
    outputs: FEATURES_OUT,
};

pub static UNION: ProcessInfo = ProcessInfo {
    name: "vector:Union",
    title: "Union",
    description: "Areas covered by either layer, split where they overlap",
    category: Category::Vector,
    inputs: OVERLAY_INPUTS,
    outputs: FEATURES_OUT,
};

pub static SYM_DIFFERENCE: ProcessInfo = ProcessInfo {
    name: "vector:SymDifference",
    title: "Symmetric difference",
    description: "Areas covered by exactly one of the layers",
    category: Category::Vector,
    inputs: OVERLAY_INPUTS,
    outputs: FEATURES_OUT,
};

/// Input of the two-layer polygon overlays
#[derive(Debug, Clone)]
pub struct OverlayInput {
    pub features: FeatureCollection,
    pub overlay_features: FeatureCollection,
}

macro_rules! overlay_process {
    ($name:ident, $info:ident, $engine:ident) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Process for $name {
            type Input = OverlayInput;
            type Output = FeatureCollection;

            fn info(&self) -> &'static ProcessInfo {
                &$info
            }

            fn validate(&self, input: &OverlayInput) -> Result<()> {
                validate::not_empty(&$info, "overlay_features", &input.overlay_features)
            }

            fn execute(&self, input: OverlayInput) -> geoprocs_core::Result<FeatureCollection> {
                Ok($engine(&input.features, &input.overlay_features))
            }
        }
    };
}

overlay_process!(Intersect, INTERSECT, intersect);
overlay_process!(Union, UNION, union);
overlay_process!(SymDifference, SYM_DIFFERENCE, sym_difference);

// ═══ DELAUNAY ═══

pub static DELAUNAY_TRIANGULATION: ProcessInfo = ProcessInfo {
    name: "vector:DelaunayTriangulation",
    title: "Delaunay triangulation",
    description: "Triangulates a point layer; triangles are numbered in tri_id",
    category: Category::Vector,
    inputs: &[
        POINTS,
        optional(
            "clip_area",
            "Clip area",
            "Polygons the triangles are clipped to",
            ParamKind::Features,
            None,
        ),
    ],
    outputs: FEATURES_OUT,
};

#[derive(Debug, Clone)]
pub struct DelaunayInput {
    pub points: FeatureCollection,
    pub clip_area: Option<FeatureCollection>,
}

impl DelaunayInput {
    pub fn new(points: FeatureCollection) -> Self {
        Self {
            points,
            clip_area: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayTriangulation;

impl Process for DelaunayTriangulation {
    type Input = DelaunayInput;
    type Output = FeatureCollection;

    fn info(&self) -> &'static ProcessInfo {
        &DELAUNAY_TRIANGULATION
    }

    fn validate(&self, input: &DelaunayInput) -> Result<()> {
        validate::points(&DELAUNAY_TRIANGULATION, "points", &input.points)?;
        if let Some(area) = &input.clip_area {
            validate::not_empty(&DELAUNAY_TRIANGULATION, "clip_area", area)?;
        }
        Ok(())
    }

    fn execute(&self, input: DelaunayInput) -> geoprocs_core::Result<FeatureCollection> {
        let mask = input.clip_area.as_ref().map(polygon_union);
        delaunay_triangulation(&input.points, mask.as_ref())
    }
}

// ═══ DELETE DUPLICATES ═══

pub static DELETE_DUPLICATES: ProcessInfo = ProcessInfo {
    name: "vector:DeleteDuplicates",
    title: "Delete duplicates",
    description: "Drops features whose geometry repeats an earlier one",
    category: Category::Vector,
    inputs: &[
        FEATURES,
        optional(
            "tolerance",
            "Tolerance",
            "Largest vertex distance still treated as equal",
            ParamKind::Float {
                min: Some(0.0),
                max: None,
            },
            Some("0"),
        ),
    ],
    outputs: &[
        RESULT_FEATURES,
        required(
            "removed",
            "Removed",
            "Number of features dropped",
            ParamKind::Int {
                min: Some(0),
                max: None,
            },
        ),
    ],
};

#[derive(Debug, Clone)]
pub struct DeleteDuplicatesInput {
    pub features: FeatureCollection,
    pub tolerance: f64,
}

impl DeleteDuplicatesInput {
    pub fn new(features: FeatureCollection) -> Self {
        Self {
            features,
            tolerance: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeleteDuplicatesOutput {
    pub features: FeatureCollection,
    pub removed: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteDuplicates;

impl Process for DeleteDuplicates {
    type Input = DeleteDuplicatesInput;
    type Output = DeleteDuplicatesOutput;

    fn info(&self) -> &'static ProcessInfo {
        &DELETE_DUPLICATES
    }

    fn validate(&self, input: &DeleteDuplicatesInput) -> Result<()> {
        validate::non_negative(&DELETE_DUPLICATES, "tolerance", input.tolerance)
    }

    fn execute(&self, input: DeleteDuplicatesInput) -> geoprocs_core::Result<DeleteDuplicatesOutput> {
        let (features, removed) = delete_duplicates(&input.features, input.tolerance);
        Ok(DeleteDuplicatesOutput { features, removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessError;
    use crate::process::run;
    use approx::assert_relative_eq;
    use geo::{point, Geometry, LineString, Rect};
    use geoprocs_core::{AttributeValue, Feature};

    fn square(min: f64, max: f64) -> Feature {
        Feature::new(Geometry::Polygon(Rect::new((min, min), (max, max)).to_polygon()))
    }

    fn layer(features: Vec<Feature>) -> FeatureCollection {
        features.into_iter().collect()
    }

    fn float(feature: &Feature, field: &str) -> f64 {
        feature.get_property(field).and_then(AttributeValue::as_f64).unwrap()
    }

    #[test]
    fn test_calculate_area_defaults() {
        let out = run(&CalculateArea, CalculateAreaInput::new(layer(vec![square(0.0, 3.0)]))).unwrap();
        assert_relative_eq!(float(&out.features[0], "geom_area"), 9.0);
        assert_relative_eq!(float(&out.features[0], "geom_perim"), 12.0);
    }

    #[test]
    fn test_calculate_area_without_perimeter() {
        let input = CalculateAreaInput {
            perimeter_field: None,
            ..CalculateAreaInput::new(layer(vec![square(0.0, 2.0)]))
        };
        let out = run(&CalculateArea, input).unwrap();
        assert!(out.features[0].get_property("geom_perim").is_none());
    }

    #[test]
    fn test_empty_field_names_rejected() {
        let input = CalculateAreaInput {
            perimeter_field: Some("  ".into()),
            ..CalculateAreaInput::new(FeatureCollection::new())
        };
        assert!(matches!(
            run(&CalculateArea, input),
            Err(ProcessError::InvalidInput {
                param: "perimeter_field",
                ..
            })
        ));

        let input = CalculateLengthInput {
            length_field: String::new(),
            ..CalculateLengthInput::new(FeatureCollection::new())
        };
        assert!(run(&CalculateLength, input).is_err());
    }

    #[test]
    fn test_calculate_length_of_line() {
        let line = Feature::new(Geometry::LineString(LineString::from(vec![(0.0, 0.0), (3.0, 4.0)])));
        let out = run(&CalculateLength, CalculateLengthInput::new(layer(vec![line]))).unwrap();
        assert_relative_eq!(float(&out.features[0], "geom_len"), 5.0);
    }

    #[test]
    fn test_overlays_reject_empty_second_layer() {
        let input = layer(vec![square(0.0, 1.0)]);
        let err = run(
            &Clip,
            ClipInput {
                features: input.clone(),
                clip_features: FeatureCollection::new(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ProcessError::InvalidInput { param: "clip_features", .. }));

        for result in [
            run(
                &Intersect,
                OverlayInput {
                    features: input.clone(),
                    overlay_features: FeatureCollection::new(),
                },
            ),
            run(
                &Union,
                OverlayInput {
                    features: input.clone(),
                    overlay_features: FeatureCollection::new(),
                },
            ),
        ] {
            assert!(matches!(result, Err(ProcessError::InvalidInput { .. })));
        }
    }

    #[test]
    fn test_erase_and_intersect() {
        let input = layer(vec![square(0.0, 10.0)]);
        let cutter = layer(vec![square(5.0, 15.0)]);

        let erased = run(
            &Erase,
            EraseInput {
                features: input.clone(),
                erase_features: cutter.clone(),
            },
        )
        .unwrap();
        let erased_area = geoprocs_algorithms::vector::area(erased.features[0].geometry.as_ref().unwrap());
        assert_relative_eq!(erased_area, 75.0, epsilon = 1e-6);

        let shared = run(
            &Intersect,
            OverlayInput {
                features: input,
                overlay_features: cutter,
            },
        )
        .unwrap();
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn test_delaunay_rejects_non_points() {
        let err = run(&DelaunayTriangulation, DelaunayInput::new(layer(vec![square(0.0, 1.0)]))).unwrap_err();
        assert!(matches!(err, ProcessError::InvalidInput { param: "points", .. }));
    }

    #[test]
    fn test_delaunay_with_clip_area() {
        let points = layer(
            [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]
                .iter()
                .map(|&(x, y)| Feature::new(Geometry::Point(point!(x: x, y: y))))
                .collect(),
        );
        let input = DelaunayInput {
            points,
            clip_area: Some(layer(vec![square(0.0, 5.0)])),
        };
        let out = run(&DelaunayTriangulation, input).unwrap();
        let covered: f64 = out
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .map(geoprocs_algorithms::vector::area)
            .sum();
        assert_relative_eq!(covered, 25.0, epsilon = 1e-6);
    }

    #[test]
    fn test_delaunay_engine_error_is_wrapped() {
        let points = layer(vec![Feature::new(Geometry::Point(point!(x: 0.0, y: 0.0)))]);
        let err = run(&DelaunayTriangulation, DelaunayInput::new(points)).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Execution {
                process: "vector:DelaunayTriangulation",
                ..
            }
        ));
    }

    #[test]
    fn test_delete_duplicates() {
        let out = run(
            &DeleteDuplicates,
            DeleteDuplicatesInput::new(layer(vec![square(0.0, 1.0), square(0.0, 1.0), square(2.0, 3.0)])),
        )
        .unwrap();
        assert_eq!(out.removed, 1);
        assert_eq!(out.features.len(), 2);

        let input = DeleteDuplicatesInput {
            tolerance: -0.1,
            ..DeleteDuplicatesInput::new(FeatureCollection::new())
        };
        assert!(matches!(
            run(&DeleteDuplicates, input),
            Err(ProcessError::InvalidInput { param: "tolerance", .. })
        ));
    }
}
