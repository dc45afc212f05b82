//! Catalogue of every process shipped with GeoProcs

use crate::descriptor::{Category, ProcessInfo};
use crate::{raster, statistics, vector};

pub static REGISTRY: &[&ProcessInfo] = &[
    // ═══ VECTOR ═══
    &vector::CALCULATE_AREA,
    &vector::CALCULATE_LENGTH,
    &vector::CLIP,
    &vector::ERASE,
    &vector::INTERSECT,
    &vector::UNION,
    &vector::SYM_DIFFERENCE,
    &vector::DELAUNAY_TRIANGULATION,
    &vector::DELETE_DUPLICATES,
    // ═══ RASTER ═══
    &raster::SLOPE,
    &raster::ASPECT,
    &raster::CURVATURE,
    &raster::TPI,
    &raster::TRI,
    &raster::HILLSHADE,
    &raster::FLOW_DIRECTION,
    // ═══ STATISTICS ═══
    &statistics::QUADRAT_ANALYSIS,
    &statistics::NEAREST_NEIGHBOR,
    &statistics::PEARSON_CORRELATION,
];

pub fn all() -> &'static [&'static ProcessInfo] {
    REGISTRY
}

/// Look a process up by name.
///
/// `"slope"`, `"Slope"` and `"raster:slope"` all find `raster:Slope`; a
/// category prefix, when given, must match too.
pub fn find(name: &str) -> Option<&'static ProcessInfo> {
    let (category, short) = match name.split_once(':') {
        Some((category, short)) => (Some(category), short),
        None => (None, name),
    };
    REGISTRY.iter().copied().find(|info| {
        info.short_name().eq_ignore_ascii_case(short)
            && category.is_none_or(|c| info.category.name().eq_ignore_ascii_case(c))
    })
}

pub fn by_category(category: Category) -> impl Iterator<Item = &'static ProcessInfo> {
    REGISTRY.iter().copied().filter(move |info| info.category == category)
}
