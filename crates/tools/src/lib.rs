//! Support code for the `pico` command-line tool.
//!
//! Camera state comes from a JSON file, command-line overrides, or both.
//! Everything here validates input before it reaches `foundation`, which
//! does no checking of its own.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use foundation::math::CameraState;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug)]
pub enum ToolError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Encode(serde_json::Error),
    InvalidCamera(String),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::Io { path, source } => write!(f, "I/O error on {path:?}: {source}"),
            ToolError::Parse { path, source } => {
                write!(f, "Camera parse error in {path:?}: {source}")
            }
            ToolError::Encode(err) => write!(f, "JSON encode error: {err}"),
            ToolError::InvalidCamera(msg) => write!(f, "Invalid camera: {msg}"),
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::Io { source, .. } => Some(source),
            ToolError::Parse { source, .. } => Some(source),
            ToolError::Encode(err) => Some(err),
            ToolError::InvalidCamera(_) => None,
        }
    }
}

/// Camera fields settable from the command line.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CameraOverrides {
    /// Focus longitude (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Focus latitude (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Zoom level; scale = 2^zoom
    #[arg(long, allow_negative_numbers = true)]
    pub zoom: Option<f64>,

    /// Tilt (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub pitch: Option<f64>,

    /// Heading (degrees)
    #[arg(long, allow_negative_numbers = true)]
    pub bearing: Option<f64>,

    /// Canvas width (pixels)
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height (pixels)
    #[arg(long)]
    pub height: Option<u32>,
}

impl CameraOverrides {
    fn apply(&self, mut camera: CameraState) -> CameraState {
        if let Some(lng) = self.lng {
            camera.longitude = lng;
        }
        if let Some(lat) = self.lat {
            camera.latitude = lat;
        }
        if let Some(zoom) = self.zoom {
            camera.scale = zoom.exp2();
        }
        if let Some(pitch) = self.pitch {
            camera.pitch = pitch;
        }
        if let Some(bearing) = self.bearing {
            camera.bearing = bearing;
        }
        if let Some(width) = self.width {
            camera.canvas_width = width;
        }
        if let Some(height) = self.height {
            camera.canvas_height = height;
        }
        camera
    }
}

pub fn load_camera(path: impl AsRef<Path>) -> Result<CameraState, ToolError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let camera: CameraState = serde_json::from_str(&payload).map_err(|source| ToolError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(?path, ?camera, "loaded camera");
    Ok(camera)
}

/// Build a camera from an optional JSON file plus overrides, then validate.
///
/// Without a file, `--width` and `--height` are required; the focus point
/// and zoom default to `0`.
pub fn resolve_camera(
    file: Option<&Path>,
    overrides: &CameraOverrides,
) -> Result<CameraState, ToolError> {
    let base = match file {
        Some(path) => load_camera(path)?,
        None => {
            let (Some(width), Some(height)) = (overrides.width, overrides.height) else {
                return Err(ToolError::InvalidCamera(
                    "--width and --height are required without --camera".to_string(),
                ));
            };
            CameraState::from_zoom(0.0, 0.0, 0.0, width, height)
        }
    };

    let camera = overrides.apply(base);
    validate_camera(&camera)?;
    Ok(camera)
}

pub fn validate_camera(camera: &CameraState) -> Result<(), ToolError> {
    let invalid = |msg: String| -> Result<(), ToolError> { Err(ToolError::InvalidCamera(msg)) };

    if !(camera.scale.is_finite() && camera.scale > 0.0) {
        return invalid(format!("scale must be positive, got {}", camera.scale));
    }
    if camera.canvas_width == 0 || camera.canvas_height == 0 {
        return invalid(format!(
            "canvas must be non-empty, got {}x{}",
            camera.canvas_width, camera.canvas_height
        ));
    }
    if !(camera.longitude > -180.0 && camera.longitude <= 180.0) {
        return invalid(format!(
            "longitude must be in (-180, 180], got {}",
            camera.longitude
        ));
    }
    if !(camera.latitude > -90.0 && camera.latitude < 90.0) {
        return invalid(format!(
            "latitude must be in (-90, 90), got {}",
            camera.latitude
        ));
    }
    if !(camera.pitch.is_finite() && camera.bearing.is_finite()) {
        return invalid("pitch and bearing must be finite".to_string());
    }
    Ok(())
}

/// Inject the mercator projection into a shader file.
///
/// Writes to `output` when given; the injected source is returned either way.
pub fn inject_file(input: &Path, output: Option<&Path>) -> Result<String, ToolError> {
    let source = fs::read_to_string(input).map_err(|source| ToolError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let injected = gpu::glsl::inject_glsl_projection(&source);

    if let Some(out) = output {
        fs::write(out, &injected).map_err(|source| ToolError::Io {
            path: out.to_path_buf(),
            source,
        })?;
        info!("wrote {out:?}");
    }
    Ok(injected)
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value).map_err(ToolError::Encode)
}

#[cfg(test)]
mod tests {
    use super::{CameraOverrides, ToolError, inject_file, load_camera, resolve_camera};
    use foundation::math::CameraState;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let id = format!("pico_tools_{label}_{}", std::process::id());
        dir.push(id);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    const CAMERA_JSON: &str = r#"{
        "longitude": -122.42,
        "latitude": 37.77,
        "scale": 4096.0,
        "pitch": 45.0,
        "canvas_width": 1280,
        "canvas_height": 720
    }"#;

    #[test]
    fn loads_camera_file() {
        let dir = temp_dir("load");
        let path = dir.join("camera.json");
        fs::write(&path, CAMERA_JSON).expect("write camera");

        let camera = load_camera(&path).expect("load camera");
        assert_eq!(
            camera,
            CameraState {
                longitude: -122.42,
                latitude: 37.77,
                scale: 4096.0,
                pitch: 45.0,
                bearing: 0.0,
                canvas_width: 1280,
                canvas_height: 720,
            }
        );
    }

    #[test]
    fn overrides_win_over_file() {
        let dir = temp_dir("override");
        let path = dir.join("camera.json");
        fs::write(&path, CAMERA_JSON).expect("write camera");

        let overrides = CameraOverrides {
            zoom: Some(3.0),
            bearing: Some(-20.0),
            ..CameraOverrides::default()
        };
        let camera = resolve_camera(Some(&path), &overrides).expect("resolve");
        assert_eq!(camera.scale, 8.0);
        assert_eq!(camera.bearing, -20.0);
        assert_eq!(camera.longitude, -122.42);
    }

    #[test]
    fn flags_alone_need_canvas_size() {
        let err = resolve_camera(None, &CameraOverrides::default()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidCamera(_)));

        let overrides = CameraOverrides {
            width: Some(800),
            height: Some(600),
            ..CameraOverrides::default()
        };
        let camera = resolve_camera(None, &overrides).expect("resolve");
        assert_eq!(camera, CameraState::from_zoom(0.0, 0.0, 0.0, 800, 600));
    }

    #[test]
    fn rejects_out_of_range_camera() {
        let base = CameraOverrides {
            width: Some(800),
            height: Some(600),
            ..CameraOverrides::default()
        };

        for bad in [
            CameraOverrides {
                lat: Some(90.0),
                ..base.clone()
            },
            CameraOverrides {
                lng: Some(-180.0),
                ..base.clone()
            },
            CameraOverrides {
                height: Some(0),
                ..base.clone()
            },
            CameraOverrides {
                zoom: Some(f64::INFINITY),
                ..base.clone()
            },
        ] {
            let err = resolve_camera(None, &bad).unwrap_err();
            assert!(
                matches!(err, ToolError::InvalidCamera(_)),
                "expected invalid camera for {bad:?}, got {err}"
            );
        }
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let dir = temp_dir("errors");
        let missing = dir.join("missing.json");
        assert!(matches!(
            load_camera(&missing).unwrap_err(),
            ToolError::Io { .. }
        ));

        let bad = dir.join("bad.json");
        fs::write(&bad, r#"{ "longitude": 1.0 }"#).expect("write bad");
        let err = load_camera(&bad).unwrap_err();
        assert!(matches!(err, ToolError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn injects_shader_file() {
        let dir = temp_dir("inject");
        let input = dir.join("points.vert");
        let output = dir.join("points.injected.vert");
        fs::write(&input, "#version 300 es\nvoid main() {}\n").expect("write shader");

        let injected = inject_file(&input, Some(&output)).expect("inject");
        assert_eq!(fs::read_to_string(&output).expect("read output"), injected);
        assert_eq!(
            injected,
            format!(
                "#version 300 es\n{}void main() {{}}\n",
                gpu::glsl::PROJECTION_GLSL
            )
        );
    }
}
