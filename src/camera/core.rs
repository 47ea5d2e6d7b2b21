use glam::{Mat4, Quat, Vec2, Vec3};

use crate::picking::Ray;

/// Camera position plus the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position in world space.
    pub position: Vec3,
    /// Look-at target in world space.
    pub look_at: Vec3,
}

impl CameraPose {
    /// Pose from an eye position and look-at target.
    #[must_use]
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }
}

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
    /// Camera forward direction for lighting.
    pub forward: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
}

impl Camera {
    /// Camera at `eye` looking at `target` with +Y up.
    #[must_use]
    pub fn looking_at(eye: Vec3, target: Vec3, aspect: f32, fovy: f32, znear: f32, zfar: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            aspect,
            fovy,
            znear,
            zfar,
        }
    }

    /// Current pose (eye + look-at target).
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.eye, self.target)
    }

    /// Build the view matrix.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Build the projection matrix ([0,1] depth range).
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }

    /// Unit vector from eye toward target.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::NEG_Z)
    }

    /// Right/up/forward basis of the view.
    #[must_use]
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.forward();
        let right = forward.cross(self.up).normalize_or(Vec3::X);
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// Rotation that turns a +Z-facing quad toward the camera.
    #[must_use]
    pub fn billboard_rotation(&self) -> Quat {
        let (right, up, forward) = self.basis();
        Quat::from_mat3(&glam::Mat3::from_cols(right, up, -forward))
    }

    /// Ray through normalized device coordinates (`x`, `y` in `[-1, 1]`,
    /// +Y up) from the eye.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let (right, up, forward) = self.basis();
        let tan_half_fov = (self.fovy.to_radians() / 2.0).tan();
        let ray_x = ndc.x * self.aspect * tan_half_fov;
        let ray_y = ndc.y * tan_half_fov;
        Ray::new(self.eye, forward + right * ray_x + up * ray_y)
    }

    /// Project a world-space point to normalized device coordinates.
    /// Returns `None` for points behind the camera.
    #[must_use]
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.build_matrix() * point.extend(1.0);
        (clip.w > 0.0).then(|| Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.0,
            forward: [0.0, 0.0, -1.0],
            fovy: 75.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
        self.aspect = camera.aspect;
        self.forward = camera.forward().to_array();
        self.fovy = camera.fovy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> Camera {
        Camera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.5, 75.0, 0.1, 1000.0)
    }

    #[test]
    fn center_ray_points_at_target() {
        let camera = test_camera();
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, camera.eye);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn ndc_ray_round_trips_through_projection() {
        let camera = test_camera();
        let point = Vec3::new(1.0, -0.5, 0.0);
        let ndc = camera.project(point).unwrap();
        let ray = camera.ray_from_ndc(ndc);
        // The ray must pass (close to) the projected point.
        let t = (point - ray.origin).dot(ray.direction);
        assert!((ray.point_at(t) - point).length() < 1e-3);
    }

    #[test]
    fn points_behind_camera_do_not_project() {
        let camera = test_camera();
        assert!(camera.project(Vec3::new(0.0, 0.0, 10.0)).is_none());
    }

    #[test]
    fn uniform_tracks_camera() {
        let camera = test_camera();
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);
        assert_eq!(uniform.position, [0.0, 0.0, 5.0]);
        assert_eq!(uniform.forward, [0.0, 0.0, -1.0]);
        assert_eq!(uniform.aspect, 1.5);
    }

    #[test]
    fn billboard_faces_camera() {
        let camera = test_camera();
        let normal = camera.billboard_rotation() * Vec3::Z;
        assert!((normal - Vec3::Z).length() < 1e-5);
    }
}
