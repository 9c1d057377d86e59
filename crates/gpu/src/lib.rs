pub mod glsl;

pub use glsl::*;
