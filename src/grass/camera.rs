//! Free-flying perspective camera for the grass field

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Camera flight speed (units/s)
pub const FLY_SPEED: f32 = 10.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view (radians)
    pub fovy: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 90f32.to_radians(),
        }
    }
}

impl FlyCamera {
    /// Move position and target together along a (unnormalized) direction
    pub fn fly(&mut self, direction: Vec3, dt: f32) {
        let delta = direction * dt * FLY_SPEED;
        self.position += delta;
        self.target += delta;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy, aspect, Z_NEAR, Z_FAR)
    }
}

/// Uniform block shared by the generate and render shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub position: [f32; 4],
    pub time: f32,
    pub blade_count: u32,
    pub _pad: [u32; 2],
}

impl CameraUniform {
    pub fn new(camera: &FlyCamera, aspect: f32, time: f32, blade_count: u32) -> Self {
        let view = camera.view();
        let proj = camera.projection(aspect);
        Self {
            view_proj: (proj * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            position: camera.position.extend(1.0).to_array(),
            time,
            blade_count,
            _pad: [0; 2],
        }
    }
}
