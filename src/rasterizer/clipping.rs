//! View-frustum clipping
//!
//! Six planes bound the visible volume in view space; polygons are clipped
//! against them with Sutherland-Hodgman before projection, so nothing with
//! w near zero ever reaches the perspective divide or the rasterizer.

use super::math::{Vec2, Vec3};

/// Hard cap on polygon size. A triangle clipped against a convex frustum
/// gains at most one vertex per plane, so 9 is the practical worst case;
/// one slot of headroom on top of that.
pub const MAX_POLYGON_VERTICES: usize = 10;

/// A clip plane: a point on the plane and its inward-pointing unit normal
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

/// The six frustum planes in clipping order: left, right, top, bottom,
/// near, far
#[derive(Debug, Clone, Copy)]
pub struct FrustumPlanes {
    pub planes: [Plane; 6],
}

impl FrustumPlanes {
    /// Build the frustum in view space. Side planes pass through the
    /// origin with half-angle sine/cosine normals; near and far sit on
    /// the Z axis.
    pub fn new(fov_x: f32, fov_y: f32, z_near: f32, z_far: f32) -> Self {
        let (sin_half_x, cos_half_x) = (fov_x / 2.0).sin_cos();
        let (sin_half_y, cos_half_y) = (fov_y / 2.0).sin_cos();
        let origin = Vec3::ZERO;

        Self {
            planes: [
                // left
                Plane { point: origin, normal: Vec3::new(cos_half_x, 0.0, sin_half_x) },
                // right
                Plane { point: origin, normal: Vec3::new(-cos_half_x, 0.0, sin_half_x) },
                // top
                Plane { point: origin, normal: Vec3::new(0.0, -cos_half_y, sin_half_y) },
                // bottom
                Plane { point: origin, normal: Vec3::new(0.0, cos_half_y, sin_half_y) },
                // near
                Plane { point: Vec3::new(0.0, 0.0, z_near), normal: Vec3::new(0.0, 0.0, 1.0) },
                // far
                Plane { point: Vec3::new(0.0, 0.0, z_far), normal: Vec3::new(0.0, 0.0, -1.0) },
            ],
        }
    }
}

/// A clip-stage polygon: bounded parallel vertex/UV arrays with one
/// explicit length. Starts life as a triangle, is reshaped by each clip
/// stage, and is re-fanned into triangles afterwards.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: [Vec3; MAX_POLYGON_VERTICES],
    uvs: [Vec2; MAX_POLYGON_VERTICES],
    len: usize,
}

impl Polygon {
    fn empty() -> Self {
        Self {
            vertices: [Vec3::ZERO; MAX_POLYGON_VERTICES],
            uvs: [Vec2::default(); MAX_POLYGON_VERTICES],
            len: 0,
        }
    }

    pub fn from_triangle(
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        uv0: Vec2,
        uv1: Vec2,
        uv2: Vec2,
    ) -> Self {
        let mut polygon = Self::empty();
        polygon.push(v0, uv0);
        polygon.push(v1, uv1);
        polygon.push(v2, uv2);
        polygon
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices[..self.len]
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs[..self.len]
    }

    /// Append a vertex; silently dropped at capacity (documented soft cap)
    fn push(&mut self, vertex: Vec3, uv: Vec2) {
        if self.len < MAX_POLYGON_VERTICES {
            self.vertices[self.len] = vertex;
            self.uvs[self.len] = uv;
            self.len += 1;
        }
    }

    /// One Sutherland-Hodgman stage: clip against a single plane.
    ///
    /// Walks each edge (previous -> current, wrapping from last to first).
    /// Signed distance `d = dot(v - plane.point, normal)`; strictly
    /// positive means inside. A sign change across an edge emits the
    /// intersection at `t = d_prev / (d_prev - d_cur)`, interpolating
    /// position and UV together; an inside current vertex is emitted
    /// unmodified. A vertex exactly on the plane (d == 0) is outside for
    /// emission and never produces a crossing, since the sign product is
    /// non-negative.
    pub fn clip_against_plane(&mut self, plane: &Plane) {
        let mut out = Polygon::empty();
        if self.len == 0 {
            return;
        }

        let mut prev = self.len - 1;
        let mut d_prev = (self.vertices[prev] - plane.point).dot(plane.normal);

        for cur in 0..self.len {
            let d_cur = (self.vertices[cur] - plane.point).dot(plane.normal);

            if d_cur * d_prev < 0.0 {
                let t = d_prev / (d_prev - d_cur);
                out.push(
                    self.vertices[prev].lerp(self.vertices[cur], t),
                    self.uvs[prev].lerp(self.uvs[cur], t),
                );
            }

            if d_cur > 0.0 {
                out.push(self.vertices[cur], self.uvs[cur]);
            }

            prev = cur;
            d_prev = d_cur;
        }

        *self = out;
    }

    /// Clip against all six frustum planes in order. Each stage consumes
    /// the previous stage's output; dropping below 3 vertices makes the
    /// polygon vanish at triangulation.
    pub fn clip(&mut self, frustum: &FrustumPlanes) {
        for plane in &frustum.planes {
            self.clip_against_plane(plane);
        }
    }

    /// Fan re-triangulation from vertex 0: an N-vertex polygon yields
    /// exactly N-2 triangles, zero for N < 3.
    pub fn triangles(&self) -> Vec<([Vec3; 3], [Vec2; 3])> {
        let mut out = Vec::new();
        if self.len < 3 {
            return out;
        }
        for i in 0..self.len - 2 {
            out.push((
                [self.vertices[0], self.vertices[i + 1], self.vertices[i + 2]],
                [self.uvs[0], self.uvs[i + 1], self.uvs[i + 2]],
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn wide_frustum() -> FrustumPlanes {
        FrustumPlanes::new(
            std::f32::consts::FRAC_PI_2,
            std::f32::consts::FRAC_PI_2,
            0.1,
            100.0,
        )
    }

    #[test]
    fn test_frustum_normals_are_unit_length() {
        let frustum = wide_frustum();
        for plane in &frustum.planes {
            assert!((plane.normal.len() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_fully_inside_triangle_is_unchanged() {
        let frustum = wide_frustum();
        let verts = [
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(1.0, 0.0, 10.0),
            Vec3::new(0.0, 1.0, 10.0),
        ];
        let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];

        let mut polygon =
            Polygon::from_triangle(verts[0], verts[1], verts[2], uvs[0], uvs[1], uvs[2]);
        polygon.clip(&frustum);

        assert_eq!(polygon.len(), 3);
        for i in 0..3 {
            assert_eq!(polygon.vertices()[i], verts[i]);
            assert_eq!(polygon.uvs()[i], uvs[i]);
        }
    }

    #[test]
    fn test_fully_behind_near_plane_vanishes() {
        let frustum = wide_frustum();
        let mut polygon = Polygon::from_triangle(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(1.0, 0.0, -5.0),
            Vec3::new(0.0, 1.0, -5.0),
            Vec2::default(),
            Vec2::default(),
            Vec2::default(),
        );
        polygon.clip(&frustum);
        assert_eq!(polygon.len(), 0);
        assert!(polygon.triangles().is_empty());
    }

    #[test]
    fn test_fully_outside_one_side_plane_vanishes() {
        let frustum = wide_frustum();
        // Far off to the left of a 90-degree frustum
        let mut polygon = Polygon::from_triangle(
            Vec3::new(-100.0, 0.0, 1.0),
            Vec3::new(-101.0, 1.0, 1.0),
            Vec3::new(-100.0, 1.0, 1.0),
            Vec2::default(),
            Vec2::default(),
            Vec2::default(),
        );
        polygon.clip(&frustum);
        assert!(polygon.is_empty());
    }

    #[test]
    fn test_near_plane_crossing_clamps_to_plane() {
        let plane = Plane {
            point: Vec3::new(0.0, 0.0, 1.0),
            normal: Vec3::new(0.0, 0.0, 1.0),
        };
        let mut polygon = Polygon::from_triangle(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 2.0, -5.0),
            Vec3::new(2.0, 0.0, -5.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 0.0),
        );
        polygon.clip_against_plane(&plane);

        assert_eq!(polygon.len(), 3);
        for v in polygon.vertices() {
            assert!(v.z >= 1.0 - EPS);
        }
    }

    #[test]
    fn test_interpolation_factor_splits_uv() {
        // Edge from z=3 (inside) to z=-1 (outside) against the z=1 plane
        // crosses at t=0.5: UV must land halfway
        let plane = Plane {
            point: Vec3::new(0.0, 0.0, 1.0),
            normal: Vec3::new(0.0, 0.0, 1.0),
        };
        let mut polygon = Polygon::from_triangle(
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(1.0, 0.0, 3.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        );
        polygon.clip_against_plane(&plane);

        assert_eq!(polygon.len(), 4);
        let crossed: Vec<_> = polygon
            .vertices()
            .iter()
            .zip(polygon.uvs())
            .filter(|(v, _)| (v.z - 1.0).abs() < EPS)
            .collect();
        assert_eq!(crossed.len(), 2);
        for (_, uv) in crossed {
            assert!((uv.y - 0.5).abs() < EPS);
        }
    }

    #[test]
    fn test_vertex_on_plane_counts_as_outside() {
        let plane = Plane {
            point: Vec3::new(0.0, 0.0, 1.0),
            normal: Vec3::new(0.0, 0.0, 1.0),
        };
        // d values: 0, 1, 2 - the on-plane vertex is dropped and no
        // spurious crossing is generated against it
        let mut polygon = Polygon::from_triangle(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 2.0),
            Vec3::new(0.0, 1.0, 3.0),
            Vec2::default(),
            Vec2::default(),
            Vec2::default(),
        );
        polygon.clip_against_plane(&plane);

        assert_eq!(polygon.len(), 2);
        assert!(polygon.triangles().is_empty());
    }

    #[test]
    fn test_triangle_fan_counts() {
        let mut polygon = Polygon::empty();
        for i in 0..5 {
            polygon.push(Vec3::new(i as f32, 0.0, 0.0), Vec2::default());
        }
        let tris = polygon.triangles();
        assert_eq!(tris.len(), 3);
        for (verts, _) in &tris {
            // Every fan triangle shares vertex 0
            assert_eq!(verts[0], polygon.vertices()[0]);
        }
    }

    #[test]
    fn test_push_beyond_capacity_is_dropped() {
        let mut polygon = Polygon::empty();
        for i in 0..MAX_POLYGON_VERTICES + 3 {
            polygon.push(Vec3::new(i as f32, 0.0, 0.0), Vec2::default());
        }
        assert_eq!(polygon.len(), MAX_POLYGON_VERTICES);
    }
}
