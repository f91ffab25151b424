//! Coordinate and camera types shared by the renderers and the scene.
//!
//! World space:
//! - +X right, +Y up, +Z toward the viewer
//! - the camera sits on +Z looking down -Z
//!
//! Pixel space (text layout, scissor math) is logical pixels, origin top-left, +Y down.

mod camera;
mod viewport;

pub use camera::{Camera, Ray};
pub use viewport::Viewport;
