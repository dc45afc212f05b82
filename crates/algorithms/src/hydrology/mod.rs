//! Hydrological analysis on DEMs

mod flow_direction;

pub use flow_direction::{flow_direction, D8Encoding};
