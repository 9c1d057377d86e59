//! Camera matrices for drawing mercator world space.
//!
//! The camera model is fixed: the eye sits `CAMERA_ALTITUDE_FACTOR` canvas
//! heights above the focus point at zoom 0 and sees a vertical field of view
//! of `2 * HALF_FOV`. Both are calibration constants, not parameters.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use super::{DEGREES_TO_RADIANS, Mat4, Vec3, lng_lat_to_world};

/// Camera altitude in canvas heights at zoom 0.
pub const CAMERA_ALTITUDE_FACTOR: f64 = 1.5;
/// `atan(0.5 * canvas_height / altitude)` = `atan(1 / 3)`.
pub const HALF_FOV: f64 = 0.321_750_554_396_642_2;
/// Slack added beyond the farthest visible ground point.
pub const FAR_PLANE_PADDING: f64 = 1.01;

/// Per-frame camera input.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Focus point, degrees.
    pub longitude: f64,
    pub latitude: f64,
    /// `2^zoom`.
    pub scale: f64,
    /// Tilt away from straight down, degrees.
    #[serde(default)]
    pub pitch: f64,
    /// Heading, degrees.
    #[serde(default)]
    pub bearing: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl CameraState {
    pub fn from_zoom(
        longitude: f64,
        latitude: f64,
        zoom: f64,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Self {
        Self {
            longitude,
            latitude,
            scale: zoom.exp2(),
            pitch: 0.0,
            bearing: 0.0,
            canvas_width,
            canvas_height,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.scale.log2()
    }

    pub fn projection_params(&self) -> ProjectionParams {
        ProjectionParams {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            pitch: self.pitch,
            scale: self.scale,
            near_zoom_zero: None,
        }
    }
}

/// Inputs to [`projection_matrix`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub canvas_width: u32,
    pub canvas_height: u32,
    #[serde(default)]
    pub pitch: f64,
    pub scale: f64,
    /// Near plane distance at zoom 0; `canvas_height` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub near_zoom_zero: Option<f64>,
}

/// Derived perspective parameters for one [`ProjectionParams`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Frustum {
    pub altitude: f64,
    pub half_fov: f64,
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    /// Distance from the eye to the top edge of the visible ground slice.
    pub top_half_surface_distance: f64,
}

impl Frustum {
    pub fn from_params(params: &ProjectionParams) -> Self {
        let height = f64::from(params.canvas_height);
        let altitude = CAMERA_ALTITUDE_FACTOR * height;
        let pitch_rad = params.pitch * DEGREES_TO_RADIANS;

        let top_half_surface_distance =
            HALF_FOV.sin() * altitude / (FRAC_PI_2 - pitch_rad - HALF_FOV).sin();

        let near_zoom_zero = params.near_zoom_zero.unwrap_or(height);
        let far = ((FRAC_PI_2 - pitch_rad).cos() * top_half_surface_distance + altitude)
            * FAR_PLANE_PADDING;

        Self {
            altitude,
            half_fov: HALF_FOV,
            fov: 2.0 * HALF_FOV,
            aspect: f64::from(params.canvas_width) / height,
            near: near_zoom_zero / params.scale,
            far,
            top_half_surface_distance,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect, self.near, self.far)
    }
}

/// View matrix placing the camera over `state`'s focus point.
///
/// Read the composition right to left: recenter the world on the focus
/// point, turn by bearing, tilt by pitch, then back away along view z.
pub fn view_matrix(state: &CameraState) -> Mat4 {
    let distance = CAMERA_ALTITUDE_FACTOR * f64::from(state.canvas_height) / state.scale;
    let center = lng_lat_to_world(state.longitude, state.latitude);

    Mat4::IDENTITY
        .translate(Vec3::new(0.0, 0.0, -distance))
        .rotate_x(-state.pitch * DEGREES_TO_RADIANS)
        .rotate_z(state.bearing * DEGREES_TO_RADIANS)
        .translate(-center)
}

pub fn view_matrix_into(state: &CameraState, out: &mut Mat4) {
    *out = view_matrix(state);
}

pub fn projection_matrix(params: &ProjectionParams) -> Mat4 {
    Frustum::from_params(params).matrix()
}

pub fn projection_matrix_into(params: &ProjectionParams, out: &mut Mat4) {
    *out = projection_matrix(params);
}

/// `projection · view` for a single camera state.
pub fn view_projection_matrix(state: &CameraState) -> Mat4 {
    projection_matrix(&state.projection_params()).mul(&view_matrix(state))
}
