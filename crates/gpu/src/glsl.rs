//! GLSL side of the mercator projection.
//!
//! Vertex shaders that take raw longitude/latitude positions call
//! `PICO_project_mercator` to land in the same world space the CPU camera
//! matrices expect. The snippet mirrors `foundation::math::lng_lat_to_world`
//! term for term.

use tracing::debug;

/// Injected ahead of the shader body. Uses only `radians`, `tan` and `log`.
pub const PROJECTION_GLSL: &str = "
const float PICO_TILE_SIZE = 512.0;
const float PICO_PI = 3.1415926536;
const float PICO_WORLD_SCALE = PICO_TILE_SIZE / (PICO_PI * 2.0);

vec4 PICO_project_mercator(vec4 position) {
    return vec4(
        (radians(position.x) + PICO_PI) * PICO_WORLD_SCALE,
        (PICO_PI + log(tan(PICO_PI * 0.25 + radians(position.y) * 0.5))) * PICO_WORLD_SCALE,
        position.z,
        position.w
    );
}
";

/// Name of the injected projection function.
pub const PROJECTION_FN: &str = "PICO_project_mercator";

/// `PICO_TILE_SIZE` as the GPU sees it.
pub const GLSL_TILE_SIZE: f32 = 512.0;
/// `PICO_PI`; the literal `3.1415926536` rounds to this `f32`.
pub const GLSL_PI: f32 = std::f32::consts::PI;
/// `PICO_WORLD_SCALE`.
pub const GLSL_WORLD_SCALE: f32 = GLSL_TILE_SIZE / (GLSL_PI * 2.0);

/// A `#version` line found in shader source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VersionDirective {
    pub version: u32,
    pub es: bool,
    /// Byte offset just past the directive's trailing newline.
    pub line_end: usize,
}

/// Find the first line of the form `#version <digits>[ es]` terminated by a
/// newline.
///
/// The directive must start the line. Only spaces, tabs and `\r` may trail
/// it. Any other profile (`core`, `compatibility`) does not match.
pub fn find_version_directive(source: &str) -> Option<VersionDirective> {
    let mut start = 0;
    for line in source.split_inclusive('\n') {
        let line_end = start + line.len();
        if let Some((version, es)) = parse_version_line(line) {
            return Some(VersionDirective {
                version,
                es,
                line_end,
            });
        }
        start = line_end;
    }
    None
}

fn parse_version_line(line: &str) -> Option<(u32, bool)> {
    let body = line.strip_suffix('\n')?;
    let rest = body.strip_prefix("#version ")?;

    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits == 0 {
        return None;
    }
    let version = rest[..digits].parse().ok()?;

    let tail = &rest[digits..];
    let spaced = tail.trim_start_matches([' ', '\t']);
    let (es, tail) = match spaced.strip_prefix("es") {
        Some(after) if spaced.len() < tail.len() => (true, after),
        _ => (false, tail),
    };

    tail.chars()
        .all(|c| matches!(c, ' ' | '\t' | '\r'))
        .then_some((version, es))
}

/// Insert [`PROJECTION_GLSL`] into a vertex shader.
///
/// The snippet goes right after the `#version` line when there is one, and
/// at the very start otherwise. Injecting twice yields two copies; call this
/// once per shader.
pub fn inject_glsl_projection(source: &str) -> String {
    let at = match find_version_directive(source) {
        Some(directive) => {
            debug!(
                version = directive.version,
                es = directive.es,
                "injecting mercator projection after #version"
            );
            directive.line_end
        }
        None => {
            debug!("no #version directive; prepending mercator projection");
            0
        }
    };

    let mut out = String::with_capacity(source.len() + PROJECTION_GLSL.len());
    out.push_str(&source[..at]);
    out.push_str(PROJECTION_GLSL);
    out.push_str(&source[at..]);
    out
}

/// CPU evaluation of `PICO_project_mercator` in single precision.
pub fn project_mercator_f32(position: [f32; 4]) -> [f32; 4] {
    let [x, y, z, w] = position;
    [
        (x.to_radians() + GLSL_PI) * GLSL_WORLD_SCALE,
        (GLSL_PI + (GLSL_PI * 0.25 + y.to_radians() * 0.5).tan().ln()) * GLSL_WORLD_SCALE,
        z,
        w,
    ]
}
