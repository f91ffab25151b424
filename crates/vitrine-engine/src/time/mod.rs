//! Frame timing.
//!
//! One `FrameClock` per render loop; call `tick()` once per presented frame to
//! obtain the `FrameTime` that feeds damping and idle motion.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
