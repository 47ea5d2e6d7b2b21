//! Camera system for viewing the scene.
//!
//! Provides the perspective camera, hotspot framing math, the user-driven
//! orbit controller, and the scripted transition state machine that takes
//! the camera over from it.

/// Scripted camera transitions (idle / animating state machine).
pub mod animation;
/// Core camera struct, poses and GPU uniform types.
pub mod core;
/// Framing poses for hotspots.
pub mod framing;
/// Orbit/pan/zoom input controller.
pub mod orbit;

pub use animation::{CameraAnimator, TransitionKind};
pub use self::core::{Camera, CameraPose, CameraUniform};
pub use framing::{compute_framing_pose, lerp};
pub use orbit::{CameraInput, OrbitControls};
