//! User-driven camera control: orbit, pan, zoom, inertia and auto-rotate.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::core::Camera;
use crate::config::{CameraOptions, SettingsConfig};
use crate::input::{InputEvent, MouseButton};

/// Keeps the polar angle away from the poles so the view never flips.
const POLAR_EPSILON: f32 = 1e-3;
/// Motion below this is treated as settled.
const MOTION_EPSILON: f32 = 1e-6;
/// Auto-rotate speed 1.0 = one revolution per this many seconds.
const AUTO_ROTATE_PERIOD_SECS: f32 = 60.0;

/// The input controller collaborator.
///
/// Owns the orbit target and the user-facing `auto_rotate`/`enabled` flags.
/// The camera animator suspends both while a scripted transition runs, moves
/// the camera itself, and calls [`sync`](Self::sync) so the controller picks
/// up from the new pose.
pub trait CameraInput {
    /// Whether idle frames spin the camera around the target.
    fn auto_rotate(&self) -> bool;
    /// Enable or disable auto-rotation.
    fn set_auto_rotate(&mut self, enabled: bool);
    /// Whether pointer input moves the camera.
    fn enabled(&self) -> bool;
    /// Enable or disable pointer input.
    fn set_enabled(&mut self, enabled: bool);
    /// Point the camera orbits around.
    fn target(&self) -> Vec3;
    /// Move the orbit target without moving the eye.
    fn set_target(&mut self, target: Vec3);
    /// Apply one idle frame of accumulated input to the camera.
    fn update(&mut self, camera: &mut Camera, dt: f32);
    /// Re-derive internal state from a camera that was moved externally.
    /// Must not move the eye.
    fn sync(&mut self, camera: &mut Camera);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Rotate,
    Pan,
}

/// Orbit controller in the style of a turntable: horizontal drag spins
/// around +Y, vertical drag tilts, right/middle (or shift+left) drag pans,
/// scroll zooms.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Vec3,
    enabled: bool,
    auto_rotate: bool,
    auto_rotate_speed: f32,

    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    damping_factor: f32,
    /// Closest allowed eye-target distance.
    pub min_distance: f32,
    /// Farthest allowed eye-target distance.
    pub max_distance: f32,

    viewport_height: f32,
    drag: Option<DragMode>,
    cursor: Option<Vec2>,
    shift_pressed: bool,

    delta_theta: f32,
    delta_phi: f32,
    pan_pixels: Vec2,
    pan_offset: Vec3,
    zoom_scale: f32,
}

impl OrbitControls {
    /// Controller tuned by `options`, orbiting the origin.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
            damping_factor: options.damping_factor.clamp(0.0, 1.0),
            min_distance: options.znear * 2.0,
            max_distance: options.zfar * 0.5,
            viewport_height: 1.0,
            drag: None,
            cursor: None,
            shift_pressed: false,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_pixels: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            zoom_scale: 1.0,
        }
    }

    /// Apply the interaction flags from the configuration document.
    pub fn apply_settings(&mut self, settings: &SettingsConfig) {
        self.auto_rotate = settings.auto_rotate;
        self.auto_rotate_speed = settings.rotate_speed;
        self.set_enabled(settings.enable_controls);
        let camera = &settings.camera;
        self.rotate_speed = camera.rotate_speed;
        self.pan_speed = camera.pan_speed;
        self.zoom_speed = camera.zoom_speed;
        self.damping_factor = camera.damping_factor.clamp(0.0, 1.0);
    }

    /// Auto-rotate speed (2.0 = one revolution every 30 s).
    #[must_use]
    pub fn auto_rotate_speed(&self) -> f32 {
        self.auto_rotate_speed
    }

    /// Viewport height in pixels; drag distances are measured against it.
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feed a pointer event. Returns `true` if it changed pending motion.
    ///
    /// Cursor tracking and button release are always processed so a drag
    /// never gets stuck, but no motion accumulates while disabled.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::CursorMoved { x, y } => {
                let position = Vec2::new(x, y);
                let previous = self.cursor.replace(position);
                match (self.drag, previous) {
                    (Some(mode), Some(previous)) if self.enabled => {
                        self.apply_drag(mode, position - previous);
                        true
                    }
                    _ => false,
                }
            }
            InputEvent::CursorLeft => {
                self.cursor = None;
                self.drag = None;
                false
            }
            InputEvent::MouseButton { button, pressed } => {
                if !pressed {
                    self.drag = None;
                    return false;
                }
                if !self.enabled {
                    return false;
                }
                self.drag = Some(match button {
                    MouseButton::Left if !self.shift_pressed => DragMode::Rotate,
                    _ => DragMode::Pan,
                });
                false
            }
            InputEvent::Scroll { delta } => {
                if !self.enabled || delta == 0.0 {
                    return false;
                }
                let factor = (1.0 - delta * self.zoom_speed).clamp(0.5, 2.0);
                self.zoom_scale *= factor;
                true
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                false
            }
        }
    }

    fn apply_drag(&mut self, mode: DragMode, delta: Vec2) {
        match mode {
            DragMode::Rotate => {
                let scale = TAU * self.rotate_speed / self.viewport_height;
                self.delta_theta -= delta.x * scale;
                self.delta_phi -= delta.y * scale;
            }
            DragMode::Pan => self.pan_pixels += delta,
        }
    }

    fn has_motion(&self) -> bool {
        self.delta_theta.abs() > MOTION_EPSILON
            || self.delta_phi.abs() > MOTION_EPSILON
            || self.pan_pixels != Vec2::ZERO
            || self.pan_offset.length_squared() > MOTION_EPSILON
            || (self.zoom_scale - 1.0).abs() > MOTION_EPSILON
            || (self.auto_rotate && self.drag.is_none() && self.auto_rotate_speed != 0.0)
    }

    fn clear_motion(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.pan_pixels = Vec2::ZERO;
        self.pan_offset = Vec3::ZERO;
        self.zoom_scale = 1.0;
    }

    /// Convert accumulated pan pixels into a world-space offset at the
    /// target's depth.
    fn pan_to_world(&self, camera: &Camera, distance: f32) -> Vec3 {
        let (right, up, _) = camera.basis();
        let half_height = distance * (camera.fovy.to_radians() / 2.0).tan();
        let world_per_pixel = 2.0 * half_height / self.viewport_height * self.pan_speed;
        (-right * self.pan_pixels.x + up * self.pan_pixels.y) * world_per_pixel
    }
}

impl CameraInput for OrbitControls {
    fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.drag = None;
            self.clear_motion();
        }
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn update(&mut self, camera: &mut Camera, dt: f32) {
        if !self.has_motion() {
            self.sync(camera);
            return;
        }

        let offset = camera.eye - self.target;
        let radius = offset.length().max(MOTION_EPSILON);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        if self.auto_rotate && self.drag.is_none() {
            theta -= TAU / AUTO_ROTATE_PERIOD_SECS * self.auto_rotate_speed * dt;
        }

        let world_pan = self.pan_to_world(camera, radius);
        self.pan_offset += world_pan;
        self.pan_pixels = Vec2::ZERO;

        let damping = if self.damping_factor > 0.0 {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.delta_theta * damping;
        phi = (phi + self.delta_phi * damping).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.target += self.pan_offset * damping;

        let radius = (radius * self.zoom_scale).clamp(self.min_distance, self.max_distance);
        self.zoom_scale = 1.0;

        let sin_phi = phi.sin();
        camera.eye = self.target
            + Vec3::new(
                radius * sin_phi * theta.sin(),
                radius * phi.cos(),
                radius * sin_phi * theta.cos(),
            );
        camera.target = self.target;

        if damping < 1.0 {
            self.delta_theta *= 1.0 - damping;
            self.delta_phi *= 1.0 - damping;
            self.pan_offset *= 1.0 - damping;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
    }

    fn sync(&mut self, camera: &mut Camera) {
        camera.target = self.target;
    }
}
