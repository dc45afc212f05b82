//! Readers and writers for rasters (GeoTIFF) and features (GeoJSON)

mod geojson_io;
mod geotiff;

pub use geojson_io::{geojson_string, parse_geojson, read_geojson, to_geojson, write_geojson};
pub use geotiff::{read_geotiff, read_geotiff_from_buffer, write_geotiff, write_geotiff_to_buffer};
