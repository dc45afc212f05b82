//! # GeoProcs Core
//!
//! Shared data model for the GeoProcs workspace.
//!
//! This crate provides:
//! - `Raster<T>`: georeferenced grid used by every raster process
//! - `GeoTransform` and `CRS`: georeferencing metadata
//! - `Feature` / `FeatureCollection` / `Envelope`: the vector model
//! - GeoTIFF and GeoJSON readers and writers

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;
pub mod vector;

pub use crs::CRS;
pub use error::{Error, Result};
pub use raster::{GeoTransform, Raster, RasterElement};
pub use vector::{AttributeValue, Envelope, Feature, FeatureCollection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoTransform, Raster, RasterElement, Window3x3};
    pub use crate::vector::{AttributeValue, Envelope, Feature, FeatureCollection};
}
