//! Slope calculation from DEMs
//!
//! Rate of change of elevation from the Horn (1981) 3x3 stencil.

use super::map_windows;
use geoprocs_core::raster::Raster;
use geoprocs_core::Result;
use serde::{Deserialize, Serialize};

/// Units for slope output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlopeUnits {
    /// Degrees (0-90)
    #[default]
    Degrees,
    /// Rise over run times 100
    Percent,
    /// Radians (0-π/2)
    Radians,
}

/// Parameters for slope calculation
#[derive(Debug, Clone)]
pub struct SlopeParams {
    pub units: SlopeUnits,
    /// Multiplier applied to the cell size when the horizontal and vertical
    /// units differ
    pub z_factor: f64,
}

impl Default for SlopeParams {
    fn default() -> Self {
        Self {
            units: SlopeUnits::Degrees,
            z_factor: 1.0,
        }
    }
}

/// Calculate slope from a DEM
///
/// ```text
/// dz/dx = ((c + 2f + i) - (a + 2d + g)) / (8 * cellsize)
/// dz/dy = ((g + 2h + i) - (a + 2b + c)) / (8 * cellsize)
/// slope = atan(sqrt(dz/dx² + dz/dy²))
/// ```
pub fn slope(dem: &Raster<f64>, params: SlopeParams) -> Result<Raster<f64>> {
    let cell_size = dem.cell_size() * params.z_factor;

    map_windows(dem, f64::NAN, |w| {
        let (dz_dx, dz_dy) = w.horn_gradient(cell_size);
        let rise = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt();

        match params.units {
            SlopeUnits::Degrees => rise.atan().to_degrees(),
            SlopeUnits::Percent => rise * 100.0,
            SlopeUnits::Radians => rise.atan(),
        }
    })
}
