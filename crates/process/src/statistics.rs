//! Spatial statistics processes over point and attribute data

use crate::descriptor::{
    optional, required, Category, ParamKind, ProcessInfo, FEATURES, POINTS, POSITIVE, RESULT_REPORT,
};
use crate::error::Result;
use crate::extent::expand_extent;
use crate::process::Process;
use crate::validate;
use geoprocs_algorithms::statistics::{
    average_nearest_neighbor, pearson_correlation, point_coords, quadrat_analysis, CorrelationReport,
    NearestNeighborReport, QuadratParams, QuadratReport,
};
use geoprocs_core::{Envelope, FeatureCollection};
use tracing::debug;

/// Envelope of the point coordinates
fn points_envelope(points: &FeatureCollection) -> geoprocs_core::Result<Option<Envelope>> {
    Ok(point_coords(points)?
        .iter()
        .map(|&[x, y]| Envelope::new(x, y, x, y))
        .reduce(|a, b| a.expand_to_include(&b)))
}

// ═══ QUADRAT ANALYSIS ═══

pub static QUADRAT_ANALYSIS: ProcessInfo = ProcessInfo {
    name: "statistics:QuadratAnalysis",
    title: "Quadrat analysis",
    description: "Counts points per square cell and tests the counts against a Poisson distribution",
    category: Category::Statistics,
    inputs: &[
        POINTS,
        optional(
            "extent",
            "Extent",
            "Study area; the envelope of the points by default",
            ParamKind::Extent,
            None,
        ),
        optional(
            "cell_size",
            "Cell size",
            "Quadrat edge length; sqrt(2A/n) by default",
            POSITIVE,
            None,
        ),
    ],
    outputs: &[RESULT_REPORT],
};

#[derive(Debug, Clone)]
pub struct QuadratInput {
    pub points: FeatureCollection,
    pub extent: Option<Envelope>,
    pub cell_size: Option<f64>,
}

impl QuadratInput {
    pub fn new(points: FeatureCollection) -> Self {
        Self {
            points,
            extent: None,
            cell_size: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QuadratAnalysis;

impl Process for QuadratAnalysis {
    type Input = QuadratInput;
    type Output = QuadratReport;

    fn info(&self) -> &'static ProcessInfo {
        &QUADRAT_ANALYSIS
    }

    fn validate(&self, input: &QuadratInput) -> Result<()> {
        validate::points(&QUADRAT_ANALYSIS, "points", &input.points)?;
        if let Some(cell_size) = input.cell_size {
            validate::positive(&QUADRAT_ANALYSIS, "cell_size", cell_size)?;
        }
        if let Some(extent) = &input.extent {
            if extent.is_empty() {
                return Err(validate::invalid(&QUADRAT_ANALYSIS, "extent", "study area has no area"));
            }
        }
        Ok(())
    }

    fn execute(&self, input: QuadratInput) -> geoprocs_core::Result<QuadratReport> {
        // Points on a line still get a study area one cell deep
        let extent = match input.extent {
            Some(extent) => Some(extent),
            None => points_envelope(&input.points)?.map(|env| {
                if env.is_empty() {
                    let expanded = expand_extent(&env, input.cell_size.unwrap_or(f64::NAN));
                    debug!(?expanded, "Point envelope has no area, expanded");
                    expanded
                } else {
                    env
                }
            }),
        };

        quadrat_analysis(
            &input.points,
            QuadratParams {
                extent,
                cell_size: input.cell_size,
            },
        )
    }
}

// ═══ NEAREST NEIGHBOUR ═══

pub static NEAREST_NEIGHBOR: ProcessInfo = ProcessInfo {
    name: "statistics:NearestNeighbor",
    title: "Average nearest neighbour",
    description: "Clark-Evans ratio of observed to expected nearest neighbour distance",
    category: Category::Statistics,
    inputs: &[
        POINTS,
        optional(
            "area",
            "Study area",
            "Area used for the point density; the points' envelope by default",
            POSITIVE,
            None,
        ),
    ],
    outputs: &[RESULT_REPORT],
};

#[derive(Debug, Clone)]
pub struct NearestNeighborInput {
    pub points: FeatureCollection,
    pub area: Option<f64>,
}

impl NearestNeighborInput {
    pub fn new(points: FeatureCollection) -> Self {
        Self { points, area: None }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl Process for NearestNeighbor {
    type Input = NearestNeighborInput;
    type Output = NearestNeighborReport;

    fn info(&self) -> &'static ProcessInfo {
        &NEAREST_NEIGHBOR
    }

    fn validate(&self, input: &NearestNeighborInput) -> Result<()> {
        validate::points(&NEAREST_NEIGHBOR, "points", &input.points)?;
        if let Some(area) = input.area {
            validate::positive(&NEAREST_NEIGHBOR, "area", area)?;
        }
        Ok(())
    }

    fn execute(&self, input: NearestNeighborInput) -> geoprocs_core::Result<NearestNeighborReport> {
        // Collinear points have no envelope area; fall back to a buffered box
        let area = match input.area {
            Some(area) => Some(area),
            None => points_envelope(&input.points)?
                .filter(Envelope::is_empty)
                .map(|env| expand_extent(&env, f64::NAN).area()),
        };
        average_nearest_neighbor(&input.points, area)
    }
}

// ═══ PEARSON CORRELATION ═══

pub static PEARSON_CORRELATION: ProcessInfo = ProcessInfo {
    name: "statistics:PearsonCorrelation",
    title: "Pearson correlation",
    description: "Correlation matrix of numeric attribute fields",
    category: Category::Statistics,
    inputs: &[
        FEATURES,
        required(
            "fields",
            "Fields",
            "At least two numeric fields",
            ParamKind::FieldList,
        ),
    ],
    outputs: &[RESULT_REPORT],
};

#[derive(Debug, Clone)]
pub struct PearsonInput {
    pub features: FeatureCollection,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PearsonCorrelation;

impl Process for PearsonCorrelation {
    type Input = PearsonInput;
    type Output = CorrelationReport;

    fn info(&self) -> &'static ProcessInfo {
        &PEARSON_CORRELATION
    }

    fn validate(&self, input: &PearsonInput) -> Result<()> {
        if input.fields.len() < 2 {
            return Err(validate::invalid(
                &PEARSON_CORRELATION,
                "fields",
                format!("at least two fields are required, got {}", input.fields.len()),
            ));
        }
        for field in &input.fields {
            validate::field_name(&PEARSON_CORRELATION, "fields", field)?;
        }
        Ok(())
    }

    fn execute(&self, input: PearsonInput) -> geoprocs_core::Result<CorrelationReport> {
        pearson_correlation(&input.features, input.fields.as_slice())
    }
}
