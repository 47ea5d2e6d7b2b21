//! Framing math: where to put the camera to look at a hotspot.

use glam::Vec3;

use super::core::CameraPose;

/// Multiplier from hotspot distance (to the scene origin) to view distance.
const DISTANCE_FACTOR: f32 = 1.8;
/// Lower clamp of the view distance, as a fraction of the base distance.
const MIN_DISTANCE_RATIO: f32 = 0.7;
/// Upper clamp of the view distance, as a fraction of the base distance.
const MAX_DISTANCE_RATIO: f32 = 1.5;
/// Outward offset along the origin→hotspot direction.
const OUTWARD_RATIO: f32 = 0.7;
/// Vertical lift above the hotspot.
const LIFT_RATIO: f32 = 0.5;
/// Below this distance the hotspot counts as sitting at the origin.
const ORIGIN_EPSILON: f32 = 0.01;

/// Componentwise linear interpolation. `t` is not clamped.
#[inline]
#[must_use]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// View distance for a hotspot `distance_to_hotspot` away from the origin,
/// clamped to `[0.7, 1.5] × base_distance`.
#[must_use]
pub fn dynamic_distance(distance_to_hotspot: f32, base_distance: f32) -> f32 {
    (distance_to_hotspot * DISTANCE_FACTOR).clamp(
        base_distance * MIN_DISTANCE_RATIO,
        base_distance * MAX_DISTANCE_RATIO,
    )
}

/// Camera pose that frames a hotspot at `hotspot`.
///
/// The camera backs away from the model center along the origin→hotspot
/// direction and rises above it, so far-out hotspots get proportionally more
/// room and central ones never pull the eye inside the model.
#[must_use]
pub fn compute_framing_pose(hotspot: Vec3, base_distance: f32) -> CameraPose {
    let distance_to_hotspot = hotspot.length();
    let distance = dynamic_distance(distance_to_hotspot, base_distance);

    let direction = if distance_to_hotspot > ORIGIN_EPSILON {
        hotspot / distance_to_hotspot
    } else {
        Vec3::Z
    };

    let position = hotspot
        + direction * (distance * OUTWARD_RATIO)
        + Vec3::new(0.0, distance * LIFT_RATIO, 0.0);

    CameraPose::new(position, hotspot)
}
