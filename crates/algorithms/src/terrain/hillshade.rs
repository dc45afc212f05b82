//! Analytical hillshading
//!
//! Illumination of each cell by a light source at the given azimuth and
//! altitude, from Horn slope and aspect.

use super::map_windows;
use geoprocs_core::raster::Raster;
use geoprocs_core::Result;

#[derive(Debug, Clone)]
pub struct HillshadeParams {
    /// Sun azimuth in degrees, clockwise from north
    pub azimuth: f64,
    /// Sun altitude above the horizon in degrees
    pub altitude: f64,
    pub z_factor: f64,
    /// Output 0-1 instead of 0-255
    pub normalized: bool,
}

impl Default for HillshadeParams {
    fn default() -> Self {
        Self {
            azimuth: 315.0,
            altitude: 45.0,
            z_factor: 1.0,
            normalized: false,
        }
    }
}

pub fn hillshade(dem: &Raster<f64>, params: HillshadeParams) -> Result<Raster<f64>> {
    let cell_size = dem.cell_size() * params.z_factor;
    let azimuth = params.azimuth.to_radians();
    let zenith = (90.0 - params.altitude).to_radians();
    let (sin_zenith, cos_zenith) = zenith.sin_cos();
    let scale = if params.normalized { 1.0 } else { 255.0 };

    map_windows(dem, f64::NAN, |w| {
        let (dz_dx, dz_dy) = w.horn_gradient(cell_size);
        let slope = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt().atan();
        let facing = (-dz_dx).atan2(dz_dy);

        let shade = cos_zenith * slope.cos() + sin_zenith * slope.sin() * (azimuth - facing).cos();
        shade.clamp(0.0, 1.0) * scale
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::test_dems::east_ramp;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_surface_shade() {
        let dem = Raster::filled(6, 6, 100.0);
        let params = HillshadeParams {
            normalized: true,
            ..Default::default()
        };
        let result = hillshade(&dem, params).unwrap();
        // Flat: cos(zenith) = sin(altitude)
        assert_relative_eq!(result.get(3, 3).unwrap(), 45.0_f64.to_radians().sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_slope_facing_sun_is_brighter() {
        // West-facing slope lit from the west vs from the east
        let dem = east_ramp(7, 1.0);
        let lit = hillshade(
            &dem,
            HillshadeParams {
                azimuth: 270.0,
                ..Default::default()
            },
        )
        .unwrap();
        let shadowed = hillshade(
            &dem,
            HillshadeParams {
                azimuth: 90.0,
                ..Default::default()
            },
        )
        .unwrap();

        assert!(lit.get(3, 3).unwrap() > shadowed.get(3, 3).unwrap());
        assert!(lit.get(3, 3).unwrap() <= 255.0);
        assert!(lit.get(0, 0).unwrap().is_nan());
    }
}
