//! Font loading and text metrics.

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem};
