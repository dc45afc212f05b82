//! Topographic Position Index (TPI)
//!
//! TPI = z_center - mean(z_neighbors) over a square window of the given
//! radius (Weiss 2001). Positive values are ridges, negative values valleys.

use super::map_radius;
use geoprocs_core::raster::Raster;
use geoprocs_core::Result;

#[derive(Debug, Clone)]
pub struct TpiParams {
    /// Window half-size in cells
    pub radius: usize,
}

impl Default for TpiParams {
    fn default() -> Self {
        Self { radius: 1 }
    }
}

pub fn tpi(dem: &Raster<f64>, params: TpiParams) -> Result<Raster<f64>> {
    map_radius(dem, params.radius, |center, neighbours| {
        if neighbours.is_empty() {
            return None;
        }
        let mean = neighbours.iter().sum::<f64>() / neighbours.len() as f64;
        Some(center - mean)
    })
}
