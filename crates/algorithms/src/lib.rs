//! # GeoProcs Algorithms
//!
//! The engines behind the GeoProcs processes.
//!
//! ## Modules
//!
//! - **terrain**: slope, aspect, curvature, TPI, TRI, hillshade
//! - **hydrology**: D8 flow direction
//! - **vector**: measurements, overlay, Delaunay triangulation, duplicate removal
//! - **statistics**: quadrat analysis, average nearest neighbour, Pearson correlation

pub mod hydrology;
pub mod statistics;
pub mod terrain;
pub mod vector;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::hydrology::{flow_direction, D8Encoding};
    pub use crate::statistics::{
        average_nearest_neighbor, pearson_correlation, quadrat_analysis, CorrelationReport,
        NearestNeighborReport, PointPattern, QuadratParams, QuadratReport,
    };
    pub use crate::terrain::{
        aspect, curvature, hillshade, slope, tpi, tri, AspectOutput, CurvatureParams,
        CurvatureType, HillshadeParams, SlopeParams, SlopeUnits, TpiParams, TriParams,
    };
    pub use crate::vector::{
        area, calculate_area, calculate_length, clip, delaunay_triangulation, delete_duplicates,
        erase, intersect, length, perimeter, polygon_union, sym_difference, union,
    };
    pub use geoprocs_core::prelude::*;
}
