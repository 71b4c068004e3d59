//! Camera state
//!
//! Position plus yaw/pitch facing, nudged by discrete input events. The
//! view matrix is rebuilt from the camera basis every frame.

use super::math::{Vec3, Vec4, Mat4};

pub struct Camera {
    pub position: Vec3,
    /// Rotation about Y, radians
    pub yaw: f32,
    /// Rotation about X, radians, clamped short of straight up/down
    pub pitch: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self { position, yaw: 0.0, pitch: 0.0 }
    }

    /// World-space facing direction derived from yaw and pitch
    pub fn direction(&self) -> Vec3 {
        let rotation = Mat4::rotation_y(self.yaw) * Mat4::rotation_x(self.pitch);
        rotation.mul_vec4(Vec4::new(0.0, 0.0, 1.0, 0.0)).to_vec3()
    }

    /// View matrix looking from the camera position along its direction
    pub fn view_matrix(&self) -> Mat4 {
        let target = self.position + self.direction();
        Mat4::look_at(self.position, target, Vec3::UP)
    }

    pub fn rotate_yaw(&mut self, delta: f32) {
        self.yaw += delta;
    }

    pub fn rotate_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
    }

    /// Step along the facing direction (negative = backward)
    pub fn move_forward(&mut self, amount: f32) {
        self.position = self.position + self.direction() * amount;
    }

    pub fn move_vertical(&mut self, amount: f32) {
        self.position.y += amount;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
