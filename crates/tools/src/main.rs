use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::math::{
    EARTH_CIRCUMFERENCE, Frustum, ProjectionParams, TILE_SIZE, lng_lat_to_world,
    pixels_per_meter, view_matrix, view_projection_matrix,
};
use serde::Serialize;
use tools::{CameraOverrides, ToolError, inject_file, resolve_camera, to_json};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Web-Mercator projection and camera matrix tool")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project a longitude/latitude into world space (tile units)
    World {
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
    },

    /// Ground scale at zoom 0
    Scale {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Accepted for symmetry with `world`; does not change the result
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        lng: f64,
    },

    /// Print the view matrix (column-major)
    View {
        /// Camera JSON file; flags override its fields
        #[arg(long)]
        camera: Option<PathBuf>,

        #[command(flatten)]
        overrides: CameraOverrides,
    },

    /// Print the projection matrix (column-major) and its frustum
    Projection {
        /// Camera JSON file; flags override its fields
        #[arg(long)]
        camera: Option<PathBuf>,

        #[command(flatten)]
        overrides: CameraOverrides,

        /// Near plane at zoom 0 (default: canvas height)
        #[arg(long)]
        near_zoom_zero: Option<f64>,
    },

    /// Inject the GLSL mercator projection into a vertex shader
    Inject {
        /// Shader source file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct WorldReport {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Serialize)]
struct ScaleReport {
    pixels_per_meter: f64,
    meters_per_pixel: f64,
    tile_size: f64,
    earth_circumference: f64,
}

#[derive(Serialize)]
struct ViewReport {
    camera: foundation::math::CameraState,
    view: [f64; 16],
    view_projection: [f64; 16],
}

#[derive(Serialize)]
struct ProjectionReport {
    params: ProjectionParams,
    frustum: Frustum,
    projection: [f64; 16],
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), ToolError> {
    let args = Args::parse();

    match args.command {
        Command::World { lng, lat } => {
            let p = lng_lat_to_world(lng, lat);
            print_json(&WorldReport {
                x: p.x,
                y: p.y,
                z: p.z,
            })
        }
        Command::Scale { lat, lng } => {
            let ppm = pixels_per_meter(lat, lng);
            print_json(&ScaleReport {
                pixels_per_meter: ppm,
                meters_per_pixel: 1.0 / ppm,
                tile_size: TILE_SIZE,
                earth_circumference: EARTH_CIRCUMFERENCE,
            })
        }
        Command::View { camera, overrides } => {
            let camera = resolve_camera(camera.as_deref(), &overrides)?;
            info!(zoom = camera.zoom(), "building view matrix");
            print_json(&ViewReport {
                camera,
                view: view_matrix(&camera).0,
                view_projection: view_projection_matrix(&camera).0,
            })
        }
        Command::Projection {
            camera,
            overrides,
            near_zoom_zero,
        } => {
            let camera = resolve_camera(camera.as_deref(), &overrides)?;
            let params = ProjectionParams {
                near_zoom_zero,
                ..camera.projection_params()
            };
            let frustum = Frustum::from_params(&params);
            if !frustum.far.is_finite() || frustum.far <= 0.0 {
                warn!(
                    pitch = camera.pitch,
                    "pitch is past the horizon; far plane is degenerate"
                );
            }
            print_json(&ProjectionReport {
                params,
                frustum,
                projection: frustum.matrix().0,
            })
        }
        Command::Inject { input, output } => {
            let injected = inject_file(&input, output.as_deref())?;
            if output.is_none() {
                print!("{injected}");
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ToolError> {
    println!("{}", to_json(value)?);
    Ok(())
}
