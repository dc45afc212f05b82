//! Aspect calculation from DEMs
//!
//! Aspect is the compass direction a slope faces: 0° north, increasing
//! clockwise. Flat cells and cells without a full window are -1, which is
//! also the output no-data value.

use super::map_windows;
use geoprocs_core::raster::Raster;
use geoprocs_core::Result;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

const FLAT_THRESHOLD: f64 = 1e-10;

/// Output format for aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectOutput {
    /// Degrees (0-360)
    #[default]
    Degrees,
    /// Radians (0-2π)
    Radians,
    /// Eight compass sectors, 1 = N clockwise to 8 = NW
    Compass,
}

fn compass_sector(degrees: f64) -> f64 {
    // Sectors are 45° wide and centred on the cardinal/intercardinal bearings
    (((degrees + 22.5) / 45.0).floor() % 8.0) + 1.0
}

/// Calculate aspect from a DEM
pub fn aspect(dem: &Raster<f64>, output_format: AspectOutput) -> Result<Raster<f64>> {
    let cell_size = dem.cell_size();

    map_windows(dem, -1.0, |w| {
        let (dz_dx, dz_dy) = w.horn_gradient(cell_size);
        if dz_dx.abs() < FLAT_THRESHOLD && dz_dy.abs() < FLAT_THRESHOLD {
            return -1.0;
        }

        // Downslope vector in (east, north): pixel rows grow southward
        let bearing = (-dz_dx).atan2(dz_dy).rem_euclid(TAU);

        match output_format {
            AspectOutput::Degrees => bearing.to_degrees(),
            AspectOutput::Radians => bearing,
            AspectOutput::Compass => compass_sector(bearing.to_degrees()),
        }
    })
}
