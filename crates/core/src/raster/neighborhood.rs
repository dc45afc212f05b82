//! Neighbourhood access for raster kernels

use super::Raster;

/// The 3x3 window around an interior cell:
///
/// ```text
/// a b c
/// d e f
/// g h i
/// ```
///
/// Row 0 of the window is the northern row for north-up rasters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window3x3 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
    pub h: f64,
    pub i: f64,
}

impl Window3x3 {
    /// Read the window centred on `(row, col)`.
    ///
    /// `None` on the raster border and whenever any of the nine cells is
    /// no-data.
    pub fn read(raster: &Raster<f64>, row: usize, col: usize) -> Option<Self> {
        let (rows, cols) = raster.shape();
        if row == 0 || col == 0 || row + 1 >= rows || col + 1 >= cols {
            return None;
        }

        let at = |r: usize, c: usize| {
            // Bounds checked above
            let v = unsafe { raster.get_unchecked(r, c) };
            (!raster.is_nodata(v)).then_some(v)
        };

        Some(Self {
            a: at(row - 1, col - 1)?,
            b: at(row - 1, col)?,
            c: at(row - 1, col + 1)?,
            d: at(row, col - 1)?,
            e: at(row, col)?,
            f: at(row, col + 1)?,
            g: at(row + 1, col - 1)?,
            h: at(row + 1, col)?,
            i: at(row + 1, col + 1)?,
        })
    }

    /// Horn (1981) gradient in pixel orientation.
    ///
    /// `dz_dx > 0` means elevation rises eastward, `dz_dy > 0` means it rises
    /// with the row index (southward on north-up grids).
    pub fn horn_gradient(&self, cell_size: f64) -> (f64, f64) {
        let eight_cs = 8.0 * cell_size;
        let dz_dx = ((self.c + 2.0 * self.f + self.i) - (self.a + 2.0 * self.d + self.g)) / eight_cs;
        let dz_dy = ((self.g + 2.0 * self.h + self.i) - (self.a + 2.0 * self.b + self.c)) / eight_cs;
        (dz_dx, dz_dy)
    }

    /// The eight neighbours, clockwise from the north-west corner
    pub fn neighbors(&self) -> [f64; 8] {
        [self.a, self.b, self.c, self.f, self.i, self.h, self.g, self.d]
    }
}

/// D8 flow direction tables.
///
/// Directions are indexed 0..8 in the order E, NE, N, NW, W, SW, S, SE.
pub mod d8 {
    use std::f64::consts::SQRT_2;

    /// `(row_offset, col_offset)` per direction index
    pub const OFFSETS: [(isize, isize); 8] = [
        (0, 1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
        (0, -1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    /// Distance to the neighbour in cell units
    pub const DISTANCES: [f64; 8] = [1.0, SQRT_2, 1.0, SQRT_2, 1.0, SQRT_2, 1.0, SQRT_2];

    /// Sequential codes: 1 = E, counter-clockwise to 8 = SE
    pub const SEQUENTIAL_CODES: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

    /// ESRI codes: powers of two clockwise from east
    pub const ESRI_CODES: [u8; 8] = [1, 128, 64, 32, 16, 8, 4, 2];

    /// Index of the opposite direction
    pub fn opposite(index: usize) -> usize {
        (index + 4) % 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Raster<f64> {
        let mut r = Raster::new(4, 4);
        for row in 0..4 {
            for col in 0..4 {
                r.set(row, col, (row * 4 + col) as f64).unwrap();
            }
        }
        r
    }

    #[test]
    fn test_window_interior_and_border() {
        let r = ramp();
        let w = Window3x3::read(&r, 1, 1).unwrap();
        assert_eq!(w.a, 0.0);
        assert_eq!(w.e, 5.0);
        assert_eq!(w.i, 10.0);
        assert!(Window3x3::read(&r, 0, 1).is_none());
        assert!(Window3x3::read(&r, 1, 3).is_none());
    }

    #[test]
    fn test_window_rejects_nodata() {
        let mut r = ramp();
        r.set_nodata(Some(-1.0));
        r.set(0, 0, -1.0).unwrap();
        assert!(Window3x3::read(&r, 1, 1).is_none());
        assert!(Window3x3::read(&r, 2, 2).is_some());
    }

    #[test]
    fn test_horn_gradient_ramp() {
        let r = ramp();
        let w = Window3x3::read(&r, 1, 1).unwrap();
        let (dx, dy) = w.horn_gradient(1.0);
        assert!((dx - 1.0).abs() < 1e-12);
        assert!((dy - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_d8_tables() {
        assert_eq!(d8::opposite(0), 4);
        assert_eq!(d8::opposite(6), 2);
        assert_eq!(d8::ESRI_CODES[d8::opposite(0)], 16);
        assert_eq!(d8::OFFSETS[6], (1, 0));
    }
}
