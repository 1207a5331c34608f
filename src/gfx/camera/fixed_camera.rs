use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use crate::config::CameraConfig;
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Stationary perspective camera, Y up
///
/// Only the aspect ratio changes after construction.
#[derive(Debug, Clone, Copy)]
pub struct FixedCamera {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for FixedCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl FixedCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            eye: config.eye,
            target: config.target,
            up: Vector3::unit_y(),
            aspect,
            fovy: config.fov.into(),
            znear: config.near,
            zfar: config.far,
            uniform: CameraUniform::default(),
        };
        camera.update_view_proj();
        camera
    }

    /// Ignores zero-sized (minimized) windows
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_eye_looks_down_negative_z() {
        let camera = FixedCamera::new(&CameraConfig::default(), 16.0 / 9.0);
        assert!((camera.eye - Vector3::new(0.0, 0.0, 20.0)).magnitude() < 1e-5);
        assert_eq!(camera.uniform.view_position, [camera.eye.x, camera.eye.y, camera.eye.z, 1.0]);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = FixedCamera::new(&CameraConfig::default(), 1.0);
        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }

    #[test]
    fn test_resize_changes_projection() {
        let mut camera = FixedCamera::new(&CameraConfig::default(), 1.5);
        camera.resize_projection(0, 600);
        assert_eq!(camera.aspect, 1.5);

        let before = camera.uniform.view_proj;
        camera.resize_projection(800, 400);
        camera.update_view_proj();
        assert_eq!(camera.aspect, 2.0);
        assert_ne!(camera.uniform.view_proj, before);
    }
}
