//! Back-face visibility and directional lighting
//!
//! Both tests derive the same face normal: cross product of the first two
//! edges, right-handed, normalized. They run in view space on the
//! transformed (pre-clip, pre-projection) vertices.

use super::math::Vec3;

/// A single directional light: all rays parallel, as from an infinitely
/// distant source. The direction points from the light toward the scene.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub direction: Vec3,
}

impl Light {
    pub fn new(direction: Vec3) -> Self {
        Self { direction: direction.normalize() }
    }
}

/// Face normal of triangle (v0, v1, v2): cross(v1-v0, v2-v0), normalized
pub fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    let ab = v1 - v0;
    let ac = v2 - v0;
    ab.cross(ac).normalize()
}

/// Back-face test: visible iff the normal points strictly toward the
/// camera position. Zero (edge-on) counts as back-facing.
pub fn is_facing_camera(camera_pos: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> bool {
    let normal = face_normal(v0, v1, v2);
    let camera_ray = camera_pos - v0;
    normal.dot(camera_ray) > 0.0
}

/// Lambertian intensity of the face under `light_dir`. The light direction
/// points from the light, so the dot is negated to orient it toward the
/// surface. Unclamped; `Color::shade` clamps at application time.
pub fn light_intensity(light_dir: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> f32 {
    let normal = face_normal(v0, v1, v2);
    -normal.dot(light_dir)
}
