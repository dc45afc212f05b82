//! Raster processes: terrain derivatives and D8 flow direction

use crate::descriptor::{
    optional, Category, ParamInfo, ParamKind, ProcessInfo, DEM, RADIUS, RESULT_RASTER, Z_FACTOR,
};
use crate::error::Result;
use crate::process::Process;
use crate::validate;
use geoprocs_algorithms::hydrology::{flow_direction, D8Encoding};
use geoprocs_algorithms::terrain::{
    aspect, curvature, hillshade, slope, tpi, tri, AspectOutput, CurvatureParams, CurvatureType,
    HillshadeParams, SlopeParams, SlopeUnits, TpiParams, TriParams,
};
use geoprocs_core::Raster;

const RASTER_OUT: &[ParamInfo] = &[RESULT_RASTER];

// ═══ SLOPE ═══

pub static SLOPE: ProcessInfo = ProcessInfo {
    name: "raster:Slope",
    title: "Slope",
    description: "Steepness of the surface from a 3x3 Horn gradient",
    category: Category::Raster,
    inputs: &[
        DEM,
        optional(
            "units",
            "Units",
            "Output units",
            ParamKind::Choice {
                options: &["degrees", "percent", "radians"],
            },
            Some("degrees"),
        ),
        Z_FACTOR,
    ],
    outputs: RASTER_OUT,
};

#[derive(Debug, Clone)]
pub struct SlopeInput {
    pub dem: Raster<f64>,
    pub units: SlopeUnits,
    pub z_factor: f64,
}

impl SlopeInput {
    pub fn new(dem: Raster<f64>) -> Self {
        let defaults = SlopeParams::default();
        Self {
            dem,
            units: defaults.units,
            z_factor: defaults.z_factor,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Slope;

impl Process for Slope {
    type Input = SlopeInput;
    type Output = Raster<f64>;

    fn info(&self) -> &'static ProcessInfo {
        &SLOPE
    }

    fn validate(&self, input: &SlopeInput) -> Result<()> {
        validate::dem(&SLOPE, &input.dem)?;
        validate::positive(&SLOPE, "z_factor", input.z_factor)
    }

    fn execute(&self, input: SlopeInput) -> geoprocs_core::Result<Raster<f64>> {
        slope(
            &input.dem,
            SlopeParams {
                units: input.units,
                z_factor: input.z_factor,
            },
        )
    }
}

// ═══ ASPECT ═══

pub static ASPECT: ProcessInfo = ProcessInfo {
    name: "raster:Aspect",
    title: "Aspect",
    description: "Downslope direction, clockwise from north; flat cells are -1",
    category: Category::Raster,
    inputs: &[
        DEM,
        optional(
            "format",
            "Format",
            "Bearing in degrees or radians, or the compass sector 1-8",
            ParamKind::Choice {
                options: &["degrees", "radians", "compass"],
            },
            Some("degrees"),
        ),
    ],
    outputs: RASTER_OUT,
};

#[derive(Debug, Clone)]
pub struct AspectInput {
    pub dem: Raster<f64>,
    pub format: AspectOutput,
}

impl AspectInput {
    pub fn new(dem: Raster<f64>) -> Self {
        Self {
            dem,
            format: AspectOutput::Degrees,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Aspect;

impl Process for Aspect {
    type Input = AspectInput;
    type Output = Raster<f64>;

    fn info(&self) -> &'static ProcessInfo {
        &ASPECT
    }

    fn validate(&self, input: &AspectInput) -> Result<()> {
        validate::dem(&ASPECT, &input.dem)
    }

    fn execute(&self, input: AspectInput) -> geoprocs_core::Result<Raster<f64>> {
        aspect(&input.dem, input.format)
    }
}

// ═══ CURVATURE ═══

pub static CURVATURE: ProcessInfo = ProcessInfo {
    name: "raster:Curvature",
    title: "Curvature",
    description: "Zevenbergen-Thorne general, profile or plan curvature",
    category: Category::Raster,
    inputs: &[
        DEM,
        optional(
            "curvature_type",
            "Curvature type",
            "Which curvature to compute",
            ParamKind::Choice {
                options: &["general", "profile", "plan"],
            },
            Some("general"),
        ),
        Z_FACTOR,
    ],
    outputs: RASTER_OUT,
};

#[derive(Debug, Clone)]
pub struct CurvatureInput {
    pub dem: Raster<f64>,
    pub curvature_type: CurvatureType,
    pub z_factor: f64,
}

impl CurvatureInput {
    pub fn new(dem: Raster<f64>) -> Self {
        let defaults = CurvatureParams::default();
        Self {
            dem,
            curvature_type: defaults.curvature_type,
            z_factor: defaults.z_factor,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Curvature;

impl Process for Curvature {
    type Input = CurvatureInput;
    type Output = Raster<f64>;

    fn info(&self) -> &'static ProcessInfo {
        &CURVATURE
    }

    fn validate(&self, input: &CurvatureInput) -> Result<()> {
        validate::dem(&CURVATURE, &input.dem)?;
        validate::positive(&CURVATURE, "z_factor", input.z_factor)
    }

    fn execute(&self, input: CurvatureInput) -> geoprocs_core::Result<Raster<f64>> {
        curvature(
            &input.dem,
            CurvatureParams {
                curvature_type: input.curvature_type,
                z_factor: input.z_factor,
            },
        )
    }
}

// ═══ TPI / TRI ═══

pub static TPI: ProcessInfo = ProcessInfo {
    name: "raster:TPI",
    title: "Topographic Position Index",
    description: "Elevation minus the mean of the square neighbourhood",
    category: Category::Raster,
    inputs: &[DEM, RADIUS],
    outputs: RASTER_OUT,
};

pub static TRI: ProcessInfo = ProcessInfo {
    name: "raster:TRI",
    title: "Terrain Ruggedness Index",
    description: "Root mean square elevation difference to the neighbourhood",
    category: Category::Raster,
    inputs: &[DEM, RADIUS],
    outputs: RASTER_OUT,
};

/// Input shared by the radius-based indices
#[derive(Debug, Clone)]
pub struct NeighborhoodInput {
    pub dem: Raster<f64>,
    pub radius: usize,
}

impl NeighborhoodInput {
    pub fn new(dem: Raster<f64>) -> Self {
        Self { dem, radius: 1 }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tpi;

impl Process for Tpi {
    type Input = NeighborhoodInput;
    type Output = Raster<f64>;

    fn info(&self) -> &'static ProcessInfo {
        &TPI
    }

    fn validate(&self, input: &NeighborhoodInput) -> Result<()> {
        validate::dem(&TPI, &input.dem)?;
        validate::radius(&TPI, input.radius, &input.dem)
    }

    fn execute(&self, input: NeighborhoodInput) -> geoprocs_core::Result<Raster<f64>> {
        tpi(&input.dem, TpiParams { radius: input.radius })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tri;

impl Process for Tri {
    type Input = NeighborhoodInput;
    type Output = Raster<f64>;

    fn info(&self) -> &'static ProcessInfo {
        &TRI
    }

    fn validate(&self, input: &NeighborhoodInput) -> Result<()> {
        validate::dem(&TRI, &input.dem)?;
        validate::radius(&TRI, input.radius, &input.dem)
    }

    fn execute(&self, input: NeighborhoodInput) -> geoprocs_core::Result<Raster<f64>> {
        tri(&input.dem, TriParams { radius: input.radius })
    }
}

// ═══ HILLSHADE ═══

pub static HILLSHADE: ProcessInfo = ProcessInfo {
    name: "raster:Hillshade",
    title: "Hillshade",
    description: "Illumination of the surface by a distant light source, 0-255",
    category: Category::Raster,
    inputs: &[
        DEM,
        optional(
            "azimuth",
            "Azimuth",
            "Light direction in degrees clockwise from north",
            ParamKind::Float {
                min: Some(0.0),
                max: Some(360.0),
            },
            Some("315"),
        ),
        optional(
            "altitude",
            "Altitude",
            "Light elevation above the horizon in degrees",
            ParamKind::Float {
                min: Some(0.0),
                max: Some(90.0),
            },
            Some("45"),
        ),
        Z_FACTOR,
    ],
    outputs: RASTER_OUT,
};

#[derive(Debug, Clone)]
pub struct HillshadeInput {
    pub dem: Raster<f64>,
    pub azimuth: f64,
    pub altitude: f64,
    pub z_factor: f64,
}

impl HillshadeInput {
    pub fn new(dem: Raster<f64>) -> Self {
        let defaults = HillshadeParams::default();
        Self {
            dem,
            azimuth: defaults.azimuth,
            altitude: defaults.altitude,
            z_factor: defaults.z_factor,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Hillshade;

impl Process for Hillshade {
    type Input = HillshadeInput;
    type Output = Raster<f64>;

    fn info(&self) -> &'static ProcessInfo {
        &HILLSHADE
    }

    fn validate(&self, input: &HillshadeInput) -> Result<()> {
        validate::dem(&HILLSHADE, &input.dem)?;
        validate::in_range(&HILLSHADE, "azimuth", input.azimuth, 0.0, 360.0)?;
        validate::in_range(&HILLSHADE, "altitude", input.altitude, 0.0, 90.0)?;
        validate::positive(&HILLSHADE, "z_factor", input.z_factor)
    }

    fn execute(&self, input: HillshadeInput) -> geoprocs_core::Result<Raster<f64>> {
        hillshade(
            &input.dem,
            HillshadeParams {
                azimuth: input.azimuth,
                altitude: input.altitude,
                z_factor: input.z_factor,
                normalized: false,
            },
        )
    }
}

// ═══ FLOW DIRECTION ═══

pub static FLOW_DIRECTION: ProcessInfo = ProcessInfo {
    name: "raster:FlowDirection",
    title: "D8 flow direction",
    description: "Direction of steepest descent to one of the eight neighbours; 0 where none is lower",
    category: Category::Raster,
    inputs: &[
        DEM,
        optional(
            "encoding",
            "Encoding",
            "esri: powers of two clockwise from east (1..128); sequential: 1..8",
            ParamKind::Choice {
                options: &["esri", "sequential"],
            },
            Some("esri"),
        ),
    ],
    outputs: RASTER_OUT,
};

#[derive(Debug, Clone)]
pub struct FlowDirectionInput {
    pub dem: Raster<f64>,
    pub encoding: D8Encoding,
}

impl FlowDirectionInput {
    pub fn new(dem: Raster<f64>) -> Self {
        Self {
            dem,
            encoding: D8Encoding::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlowDirection;

impl Process for FlowDirection {
    type Input = FlowDirectionInput;
    type Output = Raster<u8>;

    fn info(&self) -> &'static ProcessInfo {
        &FLOW_DIRECTION
    }

    fn validate(&self, input: &FlowDirectionInput) -> Result<()> {
        validate::dem(&FLOW_DIRECTION, &input.dem)
    }

    fn execute(&self, input: FlowDirectionInput) -> geoprocs_core::Result<Raster<u8>> {
        flow_direction(&input.dem, input.encoding)
    }
}
