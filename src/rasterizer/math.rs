//! Vector and matrix math for the 3D pipeline
//!
//! Row-major 4x4 matrices, homogeneous Vec4 for projective transforms.

use std::ops::{Add, Sub, Mul};
use serde::{Serialize, Deserialize};

/// 2D Vector (texture coordinates, screen positions)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation between self and other at factor t
    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Normalize; the zero vector stays the zero vector
    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        Vec3 {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
        }
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Linear interpolation between self and other at factor t
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

/// 4D homogeneous vector
///
/// w=1 for points, w=0 for directions. After a perspective transform the
/// w component carries the view-space depth used for the perspective
/// divide and perspective-correct interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Promote a point to homogeneous coordinates (w = 1)
    pub fn from_vec3(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z, w: 1.0 }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3 { x: self.x, y: self.y, z: self.z }
    }
}

/// Row-major 4x4 transform matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    pub fn identity() -> Self {
        Self {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn scale(v: Vec3) -> Self {
        let mut m = Self::identity();
        m.m[0][0] = v.x;
        m.m[1][1] = v.y;
        m.m[2][2] = v.z;
        m
    }

    pub fn translation(v: Vec3) -> Self {
        let mut m = Self::identity();
        m.m[0][3] = v.x;
        m.m[1][3] = v.y;
        m.m[2][3] = v.z;
        m
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m.m[1][1] = c;
        m.m[1][2] = -s;
        m.m[2][1] = s;
        m.m[2][2] = c;
        m
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m.m[0][0] = c;
        m.m[0][2] = s;
        m.m[2][0] = -s;
        m.m[2][2] = c;
        m
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        m.m[0][0] = c;
        m.m[0][1] = -s;
        m.m[1][0] = s;
        m.m[1][1] = c;
        m
    }

    /// Euler XYZ rotation, composed as Rz * Ry * Rx
    pub fn rotation(euler: Vec3) -> Self {
        Self::rotation_z(euler.z) * Self::rotation_y(euler.y) * Self::rotation_x(euler.x)
    }

    /// World transform: Translation * Rotation * Scale
    pub fn world(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self::translation(position) * Self::rotation(rotation) * Self::scale(scale)
    }

    /// Perspective projection mapping view-space Z into [0, 1]
    ///
    /// `aspect` is height/width (it scales X). Row 3 = (0,0,1,0) so the
    /// transformed w carries the original view-space z for the divide.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut m = Self { m: [[0.0; 4]; 4] };
        let inv_tan = 1.0 / (fov / 2.0).tan();
        m.m[0][0] = aspect * inv_tan;
        m.m[1][1] = inv_tan;
        m.m[2][2] = far / (far - near);
        m.m[2][3] = (-far * near) / (far - near);
        m.m[3][2] = 1.0;
        m
    }

    /// View matrix from camera eye, look-at target, and up hint
    ///
    /// Rows are the orthonormal camera basis (right, up, forward) with
    /// translation -dot(basis, eye). An up hint parallel to the view
    /// direction would make the basis collapse, so it falls back to the
    /// world X axis in that case.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - eye).normalize();
        let mut right = up.cross(forward).normalize();
        if right == Vec3::ZERO {
            right = Vec3::new(1.0, 0.0, 0.0).cross(forward).normalize();
        }
        let up = forward.cross(right);

        Self {
            m: [
                [right.x, right.y, right.z, -right.dot(eye)],
                [up.x, up.y, up.z, -up.dot(eye)],
                [forward.x, forward.y, forward.z, -forward.dot(eye)],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4 {
            x: m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3] * v.w,
            y: m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3] * v.w,
            z: m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3] * v.w,
            w: m[3][0] * v.x + m[3][1] * v.y + m[3][2] * v.z + m[3][3] * v.w,
        }
    }

    /// Transform a point, then divide x,y,z by w
    ///
    /// A zero w (point at infinity) leaves the vector undivided; the
    /// clipper keeps w bounded away from zero for everything that reaches
    /// the rasterizer.
    pub fn project_vec4(&self, v: Vec4) -> Vec4 {
        let mut result = self.mul_vec4(v);
        if result.w != 0.0 {
            result.x /= result.w;
            result.y /= result.w;
            result.z /= result.w;
        }
        result
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, other: Mat4) -> Mat4 {
        let mut out = Mat4 { m: [[0.0; 4]; 4] };
        for row in 0..4 {
            for col in 0..4 {
                out.m[row][col] = self.m[row][0] * other.m[0][col]
                    + self.m[row][1] * other.m[1][col]
                    + self.m[row][2] * other.m[2][col]
                    + self.m[row][3] * other.m[3][col];
            }
        }
        out
    }
}

/// Barycentric weights of point p in screen-space triangle (a, b, c)
///
/// Returns (alpha, beta, gamma) summing to 1 inside the triangle, or
/// (-1,-1,-1) when the triangle is degenerate (zero screen area). Callers
/// rasterizing a triangle should reject degenerates up front instead of
/// testing the sentinel per pixel.
pub fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Vec3 {
    let d = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);

    if d == 0.0 {
        return Vec3::new(-1.0, -1.0, -1.0);
    }

    let alpha = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / d;
    let beta = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / d;
    let gamma = 1.0 - alpha - beta;

    Vec3::new(alpha, beta, gamma)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(b) - 32.0).abs() < EPS);
    }

    #[test]
    fn test_vec3_cross_right_handed() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert!((c.z - 1.0).abs() < EPS);
        assert!(c.x.abs() < EPS && c.y.abs() < EPS);
    }

    #[test]
    fn test_normalize_zero_vector_stays_zero() {
        let v = Vec3::ZERO.normalize();
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn test_rotation_preserves_magnitude() {
        let v = Vec3::new(1.0, -2.0, 3.0);
        let r = Mat4::rotation(Vec3::new(0.7, -1.3, 2.1));
        let rotated = r.mul_vec4(Vec4::from_vec3(v)).to_vec3();
        assert!((rotated.len() - v.len()).abs() < EPS);
    }

    #[test]
    fn test_world_composition_order() {
        // T*R*S: scale first, then rotate, then translate
        let w = Mat4::world(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            Vec3::new(2.0, 2.0, 2.0),
        );
        // (1,0,0) -> scaled (2,0,0) -> rotated 90deg about Z (0,2,0) -> translated (10,2,0)
        let p = w.mul_vec4(Vec4::from_vec3(Vec3::new(1.0, 0.0, 0.0)));
        assert!((p.x - 10.0).abs() < EPS);
        assert!((p.y - 2.0).abs() < EPS);
        assert!(p.z.abs() < EPS);
    }

    #[test]
    fn test_look_at_maps_eye_to_origin_and_target_to_forward() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec3::new(1.0, 2.0, 8.0);
        let view = Mat4::look_at(eye, target, Vec3::UP);

        let e = view.mul_vec4(Vec4::from_vec3(eye));
        assert!(e.x.abs() < EPS && e.y.abs() < EPS && e.z.abs() < EPS);

        let t = view.mul_vec4(Vec4::from_vec3(target));
        assert!(t.x.abs() < EPS && t.y.abs() < EPS);
        assert!((t.z - 5.0).abs() < EPS);
    }

    #[test]
    fn test_look_at_degenerate_up_still_orthonormal() {
        // Up parallel to the view direction: basis must not collapse
        let view = Mat4::look_at(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), Vec3::UP);
        for row in 0..3 {
            let len = (view.m[row][0] * view.m[row][0]
                + view.m[row][1] * view.m[row][1]
                + view.m[row][2] * view.m[row][2])
                .sqrt();
            assert!((len - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_perspective_divide_round_trip() {
        let proj = Mat4::perspective(std::f32::consts::FRAC_PI_3, 600.0 / 800.0, 1.0, 100.0);
        let v = Vec4::from_vec3(Vec3::new(0.5, -0.25, 10.0));

        let undivided = proj.mul_vec4(v);
        let divided = proj.project_vec4(v);

        assert!((divided.x * divided.w - undivided.x).abs() < EPS);
        assert!((divided.y * divided.w - undivided.y).abs() < EPS);
        assert!((divided.z * divided.w - undivided.z).abs() < EPS);
        // w carries the view-space z
        assert!((divided.w - 10.0).abs() < EPS);
    }

    #[test]
    fn test_project_vec4_zero_w_unmodified() {
        let proj = Mat4::identity();
        let dir = Vec4::new(1.0, 2.0, 3.0, 0.0);
        let out = proj.project_vec4(dir);
        assert_eq!(out, dir);
    }

    #[test]
    fn test_barycentric_unit_weights_at_vertices() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        let c = Vec2::new(5.0, 10.0);

        let wa = barycentric(a, a, b, c);
        assert!((wa.x - 1.0).abs() < EPS && wa.y.abs() < EPS && wa.z.abs() < EPS);
        let wb = barycentric(b, a, b, c);
        assert!(wb.x.abs() < EPS && (wb.y - 1.0).abs() < EPS && wb.z.abs() < EPS);
        let wc = barycentric(c, a, b, c);
        assert!(wc.x.abs() < EPS && wc.y.abs() < EPS && (wc.z - 1.0).abs() < EPS);
    }

    #[test]
    fn test_barycentric_sums_to_one_inside() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        let c = Vec2::new(5.0, 10.0);
        let w = barycentric(Vec2::new(5.0, 3.0), a, b, c);
        assert!(w.x >= 0.0 && w.y >= 0.0 && w.z >= 0.0);
        assert!((w.x + w.y + w.z - 1.0).abs() < EPS);
    }

    #[test]
    fn test_barycentric_degenerate_triangle() {
        // Collinear points have zero area
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 1.0);
        let c = Vec2::new(2.0, 2.0);
        let w = barycentric(Vec2::new(1.0, 1.0), a, b, c);
        assert_eq!(w, Vec3::new(-1.0, -1.0, -1.0));
    }
}
