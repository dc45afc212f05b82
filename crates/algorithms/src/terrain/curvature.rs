//! Surface curvature from DEMs
//!
//! Second-order derivatives of the Zevenbergen & Thorne (1987) quadratic
//! surface fitted to the 3x3 window:
//!
//! ```text
//! p = (f - d) / 2cs        r = (d - 2e + f) / cs²
//! q = (b - h) / 2cs        t = (b - 2e + h) / cs²
//! s = (c - a - i + g) / 4cs²
//!
//! General = -(r + t) / 2
//! Profile = -(r p² + 2 s p q + t q²) / (p² + q²)
//! Plan    = -(r q² - 2 s p q + t p²) / (p² + q²)
//! ```
//!
//! Profile and plan curvature are 0 on flat cells.

use super::map_windows;
use geoprocs_core::raster::Raster;
use geoprocs_core::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurvatureType {
    #[default]
    General,
    Profile,
    Plan,
}

#[derive(Debug, Clone)]
pub struct CurvatureParams {
    pub curvature_type: CurvatureType,
    pub z_factor: f64,
}

impl Default for CurvatureParams {
    fn default() -> Self {
        Self {
            curvature_type: CurvatureType::General,
            z_factor: 1.0,
        }
    }
}

pub fn curvature(dem: &Raster<f64>, params: CurvatureParams) -> Result<Raster<f64>> {
    let cs = dem.cell_size() * params.z_factor;
    let cs2 = cs * cs;

    map_windows(dem, f64::NAN, |w| {
        let p = (w.f - w.d) / (2.0 * cs);
        let q = (w.b - w.h) / (2.0 * cs);
        let r = (w.d - 2.0 * w.e + w.f) / cs2;
        let s = (w.c - w.a - w.i + w.g) / (4.0 * cs2);
        let t = (w.b - 2.0 * w.e + w.h) / cs2;
        let p2q2 = p * p + q * q;

        match params.curvature_type {
            CurvatureType::General => -(r + t) / 2.0,
            _ if p2q2 < 1e-20 => 0.0,
            CurvatureType::Profile => -(r * p * p + 2.0 * s * p * q + t * q * q) / p2q2,
            CurvatureType::Plan => -(r * q * q - 2.0 * s * p * q + t * p * p) / p2q2,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::test_dems::{bowl, east_ramp};
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_has_no_curvature() {
        let dem = east_ramp(9, 3.0);
        for kind in [CurvatureType::General, CurvatureType::Profile, CurvatureType::Plan] {
            let result = curvature(
                &dem,
                CurvatureParams {
                    curvature_type: kind,
                    z_factor: 1.0,
                },
            )
            .unwrap();
            let val = result.get(4, 4).unwrap();
            assert!(val.abs() < 1e-10, "{:?} curvature of a plane: {}", kind, val);
        }
    }

    #[test]
    fn test_bowl_is_concave() {
        // z = x² + y² gives r = t = 2, so general = -2
        let result = curvature(&bowl(11), CurvatureParams::default()).unwrap();
        assert_relative_eq!(result.get(5, 5).unwrap(), -2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_profile_curvature_flat_centre_is_zero() {
        // Gradient vanishes at the bottom of the bowl
        let result = curvature(
            &bowl(11),
            CurvatureParams {
                curvature_type: CurvatureType::Profile,
                z_factor: 1.0,
            },
        )
        .unwrap();
        assert_eq!(result.get(5, 5).unwrap(), 0.0);
        assert!(result.get(0, 5).unwrap().is_nan());
    }

    #[test]
    fn test_profile_curvature_off_centre() {
        // Along the row through the centre, q = 0 and profile = -r = -2
        let result = curvature(
            &bowl(11),
            CurvatureParams {
                curvature_type: CurvatureType::Profile,
                z_factor: 1.0,
            },
        )
        .unwrap();
        assert_relative_eq!(result.get(5, 8).unwrap(), -2.0, epsilon = 1e-10);
    }
}
