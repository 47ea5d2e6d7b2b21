//! Shared utilities: easing curves and frame timing.

pub mod easing;
/// Frame pacing and FPS smoothing.
pub mod frame_timing;
