//! Input checks shared by the process implementations

use crate::descriptor::ProcessInfo;
use crate::error::{ProcessError, Result};
use geo::Geometry;
use geoprocs_algorithms::statistics::geometry_name;
use geoprocs_core::{FeatureCollection, Raster};

pub(crate) fn invalid(info: &ProcessInfo, param: &'static str, reason: impl Into<String>) -> ProcessError {
    ProcessError::InvalidInput {
        process: info.name,
        param,
        reason: reason.into(),
    }
}

pub(crate) fn field_name(info: &ProcessInfo, param: &'static str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid(info, param, "field name must not be empty"));
    }
    Ok(())
}

/// Finite and strictly positive
pub(crate) fn positive(info: &ProcessInfo, param: &'static str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(info, param, format!("must be a positive number, got {}", value)));
    }
    Ok(())
}

/// Finite and zero or above
pub(crate) fn non_negative(info: &ProcessInfo, param: &'static str, value: f64) -> Result<()> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(invalid(info, param, format!("must be zero or positive, got {}", value)));
    }
    Ok(())
}

pub(crate) fn in_range(info: &ProcessInfo, param: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(invalid(
            info,
            param,
            format!("must be within [{}, {}], got {}", min, max, value),
        ));
    }
    Ok(())
}

/// At least one cell, with the full window fitting inside the raster
pub(crate) fn radius(info: &ProcessInfo, value: usize, dem: &Raster<f64>) -> Result<()> {
    if value < 1 {
        return Err(invalid(info, "radius", "must be at least 1 cell"));
    }
    let side = dem.rows().min(dem.cols());
    if value > side.saturating_sub(1) / 2 {
        return Err(invalid(
            info,
            "radius",
            format!("window of radius {} does not fit a {}x{} raster", value, dem.cols(), dem.rows()),
        ));
    }
    Ok(())
}

/// Large enough for a 3x3 window
pub(crate) fn dem(info: &ProcessInfo, dem: &Raster<f64>) -> Result<()> {
    if dem.rows() < 3 || dem.cols() < 3 {
        return Err(invalid(
            info,
            "dem",
            format!("raster must be at least 3x3, got {}x{}", dem.cols(), dem.rows()),
        ));
    }
    Ok(())
}

/// Every geometry present must be a Point or MultiPoint
pub(crate) fn points(info: &ProcessInfo, param: &'static str, features: &FeatureCollection) -> Result<()> {
    let offending = features
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .find(|g| !matches!(g, Geometry::Point(_) | Geometry::MultiPoint(_)));
    match offending {
        Some(geometry) => Err(invalid(
            info,
            param,
            format!("expected point geometries, found {}", geometry_name(geometry)),
        )),
        None => Ok(()),
    }
}

pub(crate) fn not_empty(info: &ProcessInfo, param: &'static str, features: &FeatureCollection) -> Result<()> {
    if features.is_empty() {
        return Err(invalid(info, param, "layer has no features"));
    }
    Ok(())
}
