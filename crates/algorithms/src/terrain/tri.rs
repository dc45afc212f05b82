//! Terrain Ruggedness Index (TRI)
//!
//! Root-mean-square elevation difference between a cell and its neighbours
//! (Riley et al. 1999):
//!
//!   TRI = sqrt( sum( (z_neighbor - z_center)² ) / n )

use super::map_radius;
use geoprocs_core::raster::Raster;
use geoprocs_core::Result;

#[derive(Debug, Clone)]
pub struct TriParams {
    pub radius: usize,
}

impl Default for TriParams {
    fn default() -> Self {
        Self { radius: 1 }
    }
}

pub fn tri(dem: &Raster<f64>, params: TriParams) -> Result<Raster<f64>> {
    map_radius(dem, params.radius, |center, neighbours| {
        if neighbours.is_empty() {
            return None;
        }
        let sum_sq: f64 = neighbours.iter().map(|v| (v - center).powi(2)).sum();
        Some((sum_sq / neighbours.len() as f64).sqrt())
    })
}
