//! World-space draw stream.
//!
//! The portfolio records quads and text into a `DrawList` every tick; renderers
//! consume it back to front. There is no depth buffer: transparent content is
//! composited purely by depth order.

mod cmd;
mod list;

pub use cmd::{DrawCmd, QuadCmd, TextCmd};
pub use list::{DrawItem, DrawList};
