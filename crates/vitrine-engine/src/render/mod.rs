//! GPU rendering subsystem.
//!
//! Renderers consume `scene` draw streams and issue GPU commands via wgpu.
//! Each renderer owns its GPU resources (pipelines, buffers) and creates them
//! lazily on first use.
//!
//! Convention:
//! - quads and glass meshes are in world space and go through the camera's
//!   view-projection matrix;
//! - text anchors are projected on the CPU and laid out in physical pixels.

mod common;
mod ctx;
mod glass;
mod offscreen;
mod quad;
mod text;
mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use glass::{GlassMaterial, GlassMesh, GlassRenderer};
pub use offscreen::OffscreenTarget;
pub use quad::QuadRenderer;
pub use text::TextRenderer;
pub use texture::{decode_image, DecodedImage, TextureId, TextureStore};
