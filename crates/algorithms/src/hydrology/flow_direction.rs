//! D8 flow direction
//!
//! Each cell drains to the neighbour with the steepest drop,
//! `(z - z_n) / distance`. Ties keep the first direction in the order
//! E, NE, N, NW, W, SW, S, SE. Cells without a lower neighbour, no-data
//! cells and cells whose neighbours are all no-data are 0.
//!
//! ```text
//!  Sequential      ESRI
//!   4  3  2      32  64 128
//!   5  0  1      16   0   1
//!   6  7  8       8   4   2
//! ```

use crate::maybe_rayon::*;
use geoprocs_core::raster::{d8, Raster};
use geoprocs_core::Result;
use serde::{Deserialize, Serialize};

/// Code table written to the output raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum D8Encoding {
    /// 1 = E counter-clockwise to 8 = SE
    Sequential,
    /// Powers of two clockwise from east
    #[default]
    Esri,
}

impl D8Encoding {
    fn codes(self) -> &'static [u8; 8] {
        match self {
            D8Encoding::Sequential => &d8::SEQUENTIAL_CODES,
            D8Encoding::Esri => &d8::ESRI_CODES,
        }
    }
}

/// Steepest-descent direction index for one cell
fn steepest(dem: &Raster<f64>, row: usize, col: usize, cell_size: f64) -> Option<usize> {
    let center = dem.get(row, col).ok().filter(|v| !dem.is_nodata(*v))?;

    let mut max_drop = 0.0_f64;
    let mut best = None;

    for (idx, &(dr, dc)) in d8::OFFSETS.iter().enumerate() {
        let Some(neighbor) = dem.get_offset(row, col, dr, dc) else {
            continue;
        };
        if dem.is_nodata(neighbor) {
            continue;
        }

        let drop = (center - neighbor) / (d8::DISTANCES[idx] * cell_size);
        if drop > max_drop {
            max_drop = drop;
            best = Some(idx);
        }
    }

    best
}

/// Compute D8 flow directions
pub fn flow_direction(dem: &Raster<f64>, encoding: D8Encoding) -> Result<Raster<u8>> {
    let (rows, cols) = dem.shape();
    let cell_size = dem.cell_size();
    let codes = encoding.codes();

    let output_data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| steepest(dem, row, col, cell_size).map_or(0, |idx| codes[idx]))
                .collect::<Vec<u8>>()
        })
        .collect();

    dem.derive(output_data, Some(0))
}
