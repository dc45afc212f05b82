//! Vector analysis on feature collections
//!
//! - Measurements: area, perimeter, length, and the field calculators built
//!   on them
//! - Overlay: clip, erase, intersect, union, symmetric difference
//! - Delaunay triangulation of point layers
//! - Duplicate geometry removal

mod attributes;
mod delaunay;
mod duplicates;
mod index;
mod measurements;
mod overlay;

pub use attributes::{calculate_area, calculate_length};
pub use delaunay::{delaunay_triangulation, TRIANGLE_ID_FIELD};
pub use duplicates::delete_duplicates;
pub use index::EnvelopeIndex;
pub use measurements::{area, length, perimeter};
pub use overlay::{clip, erase, intersect, polygon_union, sym_difference, union};
