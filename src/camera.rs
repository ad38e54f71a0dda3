use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::types::FrameUniform;

/// Fixed perspective camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::from_array(config.position),
            target: Vec3::from_array(config.target),
            fov: config.fov,
            near: config.near,
            far: config.far,
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }

    /// World up, unless the camera looks straight up or down; then screen
    /// up is -Z so the far edge of the grid sits at the top
    pub fn up(&self) -> Vec3 {
        if self.forward().dot(Vec3::Y).abs() > 0.999 {
            Vec3::NEG_Z
        } else {
            Vec3::Y
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), self.up())
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect.max(f32::EPSILON), self.near, self.far)
    }

    /// Per-object uniform for a drawable of size `width` x `height`
    pub fn to_uniform(
        &self,
        model: Mat4,
        width: u32,
        height: u32,
        fog: [f32; 2],
        fog_color: [f32; 3],
    ) -> FrameUniform {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        FrameUniform {
            view: self.view().to_cols_array_2d(),
            proj: self.projection(w / h).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            fog: [fog[0], fog[1], 0.0, 0.0],
            fog_color: [fog_color[0], fog_color[1], fog_color[2], 1.0],
            viewport: [w, h, 1.0 / w, 1.0 / h],
        }
    }
}
