//! Orbit camera: mouse-drag rotation and scroll zoom around a target,
//! with an optional follow mode that re-targets the helicopter each frame.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Orbit/follow camera with configurable FOV and clipping planes.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera orbits around and looks at.
    pub look_at: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Drag-to-rotate sensitivity (radians per pixel).
    pub sensitivity: f32,
    /// Orbit yaw around the target, radians.
    yaw: f32,
    /// Orbit pitch above the horizon, radians.
    pitch: f32,
    /// Distance from the target.
    radius: f32,
}

impl OrbitCamera {
    /// Create a camera at `eye` looking at `look_at`.
    pub fn new(width: f32, height: f32, eye: Vec3, look_at: Vec3) -> Self {
        let offset = eye - look_at;
        let radius = offset.length().max(1e-4);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        Self {
            look_at,
            fov_degrees: 45.0,
            near: 0.01,
            far: 500.0,
            width,
            height,
            sensitivity: 0.01,
            yaw,
            pitch,
            radius,
        }
    }

    /// Update viewport size (call on window resize).
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    /// Rotate around the target by a mouse-drag delta and zoom by a
    /// scroll amount. Pitch is clamped short of the poles; zoom shrinks
    /// the orbit radius toward a minimum.
    pub fn orbit(&mut self, delta: Vec2, zoom: f32) {
        self.yaw += delta.x * self.sensitivity;
        let max_pitch = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = (self.pitch + delta.y * self.sensitivity).clamp(-max_pitch, max_pitch);
        self.radius = (self.radius * (1.0 - zoom)).max(0.1);
    }

    /// Re-target the orbit onto `target`, keeping the current offset.
    pub fn follow(&mut self, target: Vec3) {
        self.look_at = target;
    }

    /// Camera position in world space, derived from the spherical offset.
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.look_at + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.radius
    }

    /// Distance from the orbit target.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.look_at, Vec3::Y)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        let aspect = self.width / self.height.max(1.0);
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4], // w unused, padding
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }

    pub fn update(&mut self, camera: &OrbitCamera) {
        self.view_proj = camera.view_projection_matrix().to_cols_array_2d();
        let pos = camera.position();
        self.position = [pos.x, pos.y, pos.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn construction_recovers_eye_position() {
        let eye = Vec3::new(10.0, 10.0, 10.0);
        let cam = OrbitCamera::new(1280.0, 720.0, eye, Vec3::ZERO);
        let pos = cam.position();
        assert_relative_eq!(pos.x, eye.x, epsilon = 1e-4);
        assert_relative_eq!(pos.y, eye.y, epsilon = 1e-4);
        assert_relative_eq!(pos.z, eye.z, epsilon = 1e-4);
    }

    #[test]
    fn orbit_preserves_radius() {
        let mut cam = OrbitCamera::new(1280.0, 720.0, Vec3::new(0.0, 5.0, 10.0), Vec3::ZERO);
        let before = cam.radius();
        cam.orbit(Vec2::new(35.0, -12.0), 0.0);
        assert_relative_eq!(cam.radius(), before, epsilon = 1e-6);
        let dist = cam.position().distance(cam.look_at);
        assert_relative_eq!(dist, before, epsilon = 1e-4);
    }

    #[test]
    fn zoom_shrinks_radius() {
        let mut cam = OrbitCamera::new(1280.0, 720.0, Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        cam.orbit(Vec2::ZERO, 0.05);
        assert_relative_eq!(cam.radius(), 9.5, epsilon = 1e-4);
    }

    #[test]
    fn follow_keeps_relative_offset() {
        let mut cam = OrbitCamera::new(1280.0, 720.0, Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO);
        let offset = cam.position();
        let target = Vec3::new(-2.0, 7.5, 1.0);
        cam.follow(target);
        let new_offset = cam.position() - target;
        assert_relative_eq!(new_offset.x, offset.x, epsilon = 1e-4);
        assert_relative_eq!(new_offset.y, offset.y, epsilon = 1e-4);
        assert_relative_eq!(new_offset.z, offset.z, epsilon = 1e-4);
    }

    #[test]
    fn pitch_is_clamped_short_of_poles() {
        let mut cam = OrbitCamera::new(1280.0, 720.0, Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        cam.orbit(Vec2::new(0.0, 100000.0), 0.0);
        // position must stay well-defined: not directly above the target
        let pos = cam.position();
        assert!(pos.x.abs() + pos.z.abs() > 1e-3);
    }
}
