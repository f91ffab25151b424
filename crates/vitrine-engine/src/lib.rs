//! Vitrine engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the portfolio scene:
//! the window loop, the device, input translation, frame timing, camera math and
//! the renderers for the content and composite passes.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod mesh;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
