//! Vitrine scene crate.
//!
//! Per-frame layout and animation for the glass portfolio: a refracting
//! lens/bar/cube that follows the pointer or docks at the bottom, floating
//! images with single selection, navigation labels and a title that fades out
//! on scroll.
//!
//! Everything here is CPU-side and deterministic given a [`FrameInput`]; the
//! output is a pair of world-space draw lists plus a description of the glass
//! mesh, which the binary hands to the engine renderers.

pub mod breakpoint;
pub mod config;
pub mod damp;
pub mod frame;
pub mod gallery;
pub mod glass;
pub mod measure;
pub mod nav;
pub mod scroll;
pub mod title;

pub use frame::{FrameInput, FrameOutput, Portfolio};

/// Commonly used types.
pub mod prelude {
    pub use crate::breakpoint::Breakpoint;
    pub use crate::config::{ConfigError, PortfolioConfig};
    pub use crate::damp::{Damped, DampingTimes};
    pub use crate::frame::{FrameInput, FrameOutput, Portfolio};
    pub use crate::gallery::{Gallery, ImageSpec, Selection};
    pub use crate::glass::{GlassController, GlassDraw, GlassMode, GlassOverrides, GlassTransform, Material};
    pub use crate::measure::{FontMeasure, MeasureText};
    pub use crate::nav::{NavBar, NavItem, NavTarget, Navigator};
    pub use crate::scroll::{ScrollState, ScrollTracker};
    pub use crate::title::Title;
}
