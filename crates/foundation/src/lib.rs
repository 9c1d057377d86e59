// Foundation crate: mercator math and camera matrices, no rendering.
pub mod math;

pub use math::*;
