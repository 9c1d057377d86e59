//! Web-Mercator world space.
//!
//! One tile of `TILE_SIZE` units covers the whole globe at zoom 0. `x` grows
//! eastward from the antimeridian and `y` grows northward from the southern
//! edge of the mercator square, so `(0°, 0°)` lands at the tile center.
//!
//! These formulas are duplicated in the GLSL snippet injected by
//! `gpu::glsl`; both must change together.

use std::f64::consts::{FRAC_PI_4, PI, TAU};

use serde::{Deserialize, Serialize};

use super::Vec3;

/// World units spanned by the globe at zoom 0.
pub const TILE_SIZE: f64 = 512.0;
/// Equatorial circumference used for ground scale (meters).
pub const EARTH_CIRCUMFERENCE: f64 = 40.03e6;
/// Degrees to radians, shared with the GLSL `radians()` built-in.
pub const DEGREES_TO_RADIANS: f64 = PI / 180.0;
/// World units per radian.
pub const WORLD_SCALE: f64 = TILE_SIZE / TAU;

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng_deg: f64,
    pub lat_deg: f64,
}

impl LngLat {
    pub fn new(lng_deg: f64, lat_deg: f64) -> Self {
        Self { lng_deg, lat_deg }
    }

    pub fn to_world(self) -> Vec3 {
        lng_lat_to_world(self.lng_deg, self.lat_deg)
    }
}

/// Project a longitude/latitude pair into mercator world space.
///
/// Latitudes of ±90° are a singularity and produce huge or non-finite `y`;
/// callers validate input.
pub fn lng_lat_to_world(lng_deg: f64, lat_deg: f64) -> Vec3 {
    let lambda = lng_deg * DEGREES_TO_RADIANS;
    let phi = lat_deg * DEGREES_TO_RADIANS;

    let x = TILE_SIZE * (lambda + PI) / TAU;
    let y = TILE_SIZE * (PI + (FRAC_PI_4 + phi * 0.5).tan().ln()) / TAU;

    Vec3::new(x, y, 0.0)
}

/// Same as [`lng_lat_to_world`], writing into a caller-owned buffer.
pub fn lng_lat_to_world_into(lng_deg: f64, lat_deg: f64, out: &mut [f64; 3]) -> &mut [f64; 3] {
    *out = lng_lat_to_world(lng_deg, lat_deg).as_array();
    out
}

/// World pixels per ground meter at zoom 0.
///
/// Blows up at ±90° latitude, where the cosine vanishes. `_lng_deg` does
/// not affect the result. It stays in the signature so call
/// sites can pass a full coordinate.
pub fn pixels_per_meter(lat_deg: f64, _lng_deg: f64) -> f64 {
    let lat_cos = (lat_deg * DEGREES_TO_RADIANS).cos();
    TILE_SIZE / EARTH_CIRCUMFERENCE / lat_cos
}
