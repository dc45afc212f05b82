//! Terrain derivatives from DEMs
//!
//! Every kernel reads a `Raster<f64>` DEM, processes rows in parallel and
//! returns a raster with the same shape and georeference. Border cells and
//! cells whose neighbourhood touches no-data are written as no-data.

mod aspect;
mod curvature;
mod hillshade;
mod slope;
mod tpi;
mod tri;

pub use aspect::{aspect, AspectOutput};
pub use curvature::{curvature, CurvatureParams, CurvatureType};
pub use hillshade::{hillshade, HillshadeParams};
pub use slope::{slope, SlopeParams, SlopeUnits};
pub use tpi::{tpi, TpiParams};
pub use tri::{tri, TriParams};

use crate::maybe_rayon::*;
use geoprocs_core::raster::{Raster, Window3x3};
use geoprocs_core::Result;

/// Apply `kernel` to the 3x3 window of every cell.
///
/// Cells without a complete window get `fill`, which also becomes the output
/// no-data value.
pub(crate) fn map_windows<F>(dem: &Raster<f64>, fill: f64, kernel: F) -> Result<Raster<f64>>
where
    F: Fn(&Window3x3) -> f64 + Sync + Send,
{
    let (rows, cols) = dem.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| Window3x3::read(dem, row, col).map_or(fill, |w| kernel(&w)))
                .collect::<Vec<_>>()
        })
        .collect();

    dem.derive(data, Some(fill))
}

/// Apply `kernel` to every cell whose square window of the given radius lies
/// inside the raster and whose centre is valid.
///
/// The kernel receives the centre value and the valid neighbours (centre
/// excluded). Everything else is NaN.
pub(crate) fn map_radius<F>(dem: &Raster<f64>, radius: usize, kernel: F) -> Result<Raster<f64>>
where
    F: Fn(f64, &[f64]) -> Option<f64> + Sync + Send,
{
    let (rows, cols) = dem.shape();
    let fits = radius
        .checked_mul(2)
        .and_then(|w| w.checked_add(1))
        .is_some_and(|side| side <= rows && side <= cols);
    if !fits {
        return dem.derive(vec![f64::NAN; rows * cols], Some(f64::NAN));
    }
    let side = 2 * radius + 1;
    let r = radius as isize;

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut neighbours = Vec::with_capacity(side * side - 1);
            let mut row_data = vec![f64::NAN; cols];

            if row < radius || row + radius >= rows {
                return row_data;
            }

            for col in radius..cols.saturating_sub(radius) {
                // In bounds: row and col are at least `radius` from every edge
                let center = unsafe { dem.get_unchecked(row, col) };
                if dem.is_nodata(center) {
                    continue;
                }

                neighbours.clear();
                for dr in -r..=r {
                    for dc in -r..=r {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        if let Some(v) = dem.get_offset(row, col, dr, dc) {
                            if !dem.is_nodata(v) {
                                neighbours.push(v);
                            }
                        }
                    }
                }

                if let Some(value) = kernel(center, &neighbours) {
                    row_data[col] = value;
                }
            }

            row_data
        })
        .collect();

    dem.derive(data, Some(f64::NAN))
}

#[cfg(test)]
pub(crate) mod test_dems {
    use geoprocs_core::{GeoTransform, Raster};

    /// Plane rising eastward with the given gradient, 1 m cells
    pub fn east_ramp(size: usize, gradient: f64) -> Raster<f64> {
        let mut dem = Raster::new(size, size);
        dem.set_transform(GeoTransform::new(0.0, size as f64, 1.0, -1.0));
        for r in 0..size {
            for c in 0..size {
                dem.set(r, c, c as f64 * gradient).unwrap();
            }
        }
        dem
    }

    /// Plane rising northward (towards row 0), 1 m cells
    pub fn north_ramp(size: usize) -> Raster<f64> {
        let mut dem = Raster::new(size, size);
        dem.set_transform(GeoTransform::new(0.0, size as f64, 1.0, -1.0));
        for r in 0..size {
            for c in 0..size {
                dem.set(r, c, (size - r) as f64).unwrap();
            }
        }
        dem
    }

    /// z = x² + y² centred on the middle cell
    pub fn bowl(size: usize) -> Raster<f64> {
        let mut dem = Raster::new(size, size);
        dem.set_transform(GeoTransform::new(0.0, size as f64, 1.0, -1.0));
        let mid = (size / 2) as f64;
        for r in 0..size {
            for c in 0..size {
                let x = c as f64 - mid;
                let y = r as f64 - mid;
                dem.set(r, c, x * x + y * y).unwrap();
            }
        }
        dem
    }
}
