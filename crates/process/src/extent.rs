//! Bounding-box helpers shared by the statistics processes

use geoprocs_core::Envelope;

/// Buffer applied when no usable cell size is given
const FALLBACK_BUFFER: f64 = 0.5;

/// Grow `extent` to a whole number of `cell_size` cells.
///
/// The grid starts at the minimum corner and always has at least one cell in
/// each direction, so a single point or a horizontal line of points still
/// yields an envelope with area. A cell size that is not a positive finite
/// number buffers the envelope by half a unit instead.
pub fn expand_extent(extent: &Envelope, cell_size: f64) -> Envelope {
    if cell_size.is_finite() && cell_size > 0.0 {
        extent.snap_to_grid(cell_size)
    } else {
        extent.expand_by(FALLBACK_BUFFER)
    }
}
