//! Static descriptions of processes and their parameters

use serde::Serialize;
use std::fmt;

/// Process category, the prefix of a process name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vector,
    Raster,
    Statistics,
}

impl Category {
    pub const ALL: &'static [Category] = &[Category::Vector, Category::Raster, Category::Statistics];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Vector => "vector",
            Category::Raster => "raster",
            Category::Statistics => "statistics",
        }
    }

    /// Case-insensitive lookup by name
    pub fn parse(name: &str) -> Option<Category> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of value a parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamKind {
    /// Single-band georeferenced raster
    Raster,
    /// Feature collection
    Features,
    Float { min: Option<f64>, max: Option<f64> },
    Int { min: Option<i64>, max: Option<i64> },
    Bool,
    Text,
    Choice { options: &'static [&'static str] },
    /// Bounding box
    Extent,
    /// List of attribute field names
    FieldList,
    /// Structured analysis result
    Report,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Raster => f.write_str("raster"),
            ParamKind::Features => f.write_str("features"),
            ParamKind::Float { min, max } => write!(f, "float{}", range(min, max)),
            ParamKind::Int { min, max } => write!(f, "int{}", range(min, max)),
            ParamKind::Bool => f.write_str("bool"),
            ParamKind::Text => f.write_str("text"),
            ParamKind::Choice { options } => write!(f, "one of {}", options.join("|")),
            ParamKind::Extent => f.write_str("extent"),
            ParamKind::FieldList => f.write_str("field list"),
            ParamKind::Report => f.write_str("report"),
        }
    }
}

fn range<T: fmt::Display>(min: &Option<T>, max: &Option<T>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!(" [{}, {}]", lo, hi),
        (Some(lo), None) => format!(" >= {}", lo),
        (None, Some(hi)) => format!(" <= {}", hi),
        (None, None) => String::new(),
    }
}

/// Description of one input or output of a process
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    /// Default value rendered as text
    pub default: Option<&'static str>,
}

/// Description of a process: what it is called and what goes in and out
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProcessInfo {
    /// Qualified name, `category:Name`
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub inputs: &'static [ParamInfo],
    pub outputs: &'static [ParamInfo],
}

impl ProcessInfo {
    /// Name without the category prefix
    pub fn short_name(&self) -> &'static str {
        self.name.split_once(':').map_or(self.name, |(_, short)| short)
    }

    pub fn input(&self, name: &str) -> Option<&'static ParamInfo> {
        self.inputs.iter().find(|p| p.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&'static ParamInfo> {
        self.outputs.iter().find(|p| p.name == name)
    }
}

// ─── Shared parameter definitions ───────────────────────────────────────

pub(crate) const fn required(
    name: &'static str,
    title: &'static str,
    description: &'static str,
    kind: ParamKind,
) -> ParamInfo {
    ParamInfo {
        name,
        title,
        description,
        kind,
        required: true,
        default: None,
    }
}

pub(crate) const fn optional(
    name: &'static str,
    title: &'static str,
    description: &'static str,
    kind: ParamKind,
    default: Option<&'static str>,
) -> ParamInfo {
    ParamInfo {
        name,
        title,
        description,
        kind,
        required: false,
        default,
    }
}

pub(crate) const POSITIVE: ParamKind = ParamKind::Float {
    min: Some(0.0),
    max: None,
};

pub(crate) const DEM: ParamInfo = required("dem", "DEM", "Input elevation raster", ParamKind::Raster);

pub(crate) const Z_FACTOR: ParamInfo = optional(
    "z_factor",
    "Z factor",
    "Multiplier applied to the cell size when horizontal and vertical units differ",
    POSITIVE,
    Some("1"),
);

pub(crate) const RADIUS: ParamInfo = optional(
    "radius",
    "Radius",
    "Neighbourhood radius in cells",
    ParamKind::Int {
        min: Some(1),
        max: None,
    },
    Some("1"),
);

pub(crate) const FEATURES: ParamInfo = required("features", "Features", "Input features", ParamKind::Features);

pub(crate) const POINTS: ParamInfo = required("points", "Points", "Input point features", ParamKind::Features);

pub(crate) const RESULT_RASTER: ParamInfo = required("result", "Result", "Output raster", ParamKind::Raster);

pub(crate) const RESULT_FEATURES: ParamInfo = required("result", "Result", "Output features", ParamKind::Features);

pub(crate) const RESULT_REPORT: ParamInfo = required("result", "Result", "Analysis report", ParamKind::Report);
