//! Frame orchestration
//!
//! Sequences the per-face geometry pipeline for each mesh:
//! model -> world -> view -> back-face cull -> frustum clip -> refan ->
//! project + viewport map -> flat lighting -> render list. The list is
//! rebuilt from scratch every frame and rasterized in one pass at the end.

use super::camera::Camera;
use super::clipping::{FrustumPlanes, Polygon};
use super::light::{is_facing_camera, light_intensity, Light};
use super::math::{Mat4, Vec3, Vec4};
use super::mesh::Mesh;
use super::render::{
    draw_triangle_wireframe, draw_vertex_markers, rasterize_triangle, Framebuffer, Triangle,
};
use super::types::{Color, RenderOptions, Texture};

/// Soft cap on render-list size per frame; triangles beyond it are
/// dropped and counted, never an error
pub const MAX_RENDER_TRIANGLES: usize = 10_000;

const WIREFRAME_COLOR: Color = Color { r: 0, g: 255, b: 0, a: 255 };
const MARKER_COLOR: Color = Color { r: 255, g: 0, b: 0, a: 255 };

pub struct Pipeline {
    width: usize,
    height: usize,
    projection: Mat4,
    frustum: FrustumPlanes,
    triangles: Vec<Triangle>,
    /// Render-list capacity; pub so callers can tighten it
    pub max_triangles: usize,
    dropped: usize,
}

impl Pipeline {
    /// Build the per-session projection state. The horizontal FOV is
    /// derived from the vertical one through the aspect ratio so the
    /// side frustum planes match the projection exactly.
    pub fn new(width: usize, height: usize, fov_y: f32, z_near: f32, z_far: f32) -> Self {
        let aspect_x = width as f32 / height as f32;
        let aspect_y = height as f32 / width as f32;
        let fov_x = 2.0 * ((fov_y / 2.0).tan() * aspect_x).atan();

        Self {
            width,
            height,
            projection: Mat4::perspective(fov_y, aspect_y, z_near, z_far),
            frustum: FrustumPlanes::new(fov_x, fov_y, z_near, z_far),
            triangles: Vec::new(),
            max_triangles: MAX_RENDER_TRIANGLES,
            dropped: 0,
        }
    }

    /// Clear the render list for a new frame
    pub fn begin_frame(&mut self) {
        self.triangles.clear();
        self.dropped = 0;
    }

    /// Render-ready triangles accumulated so far this frame
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Triangles dropped on the capacity cap this frame
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Run the geometry pipeline for one mesh, appending the surviving
    /// triangles to the render list.
    pub fn process_mesh(
        &mut self,
        mesh: &Mesh,
        camera: &Camera,
        light: &Light,
        options: &RenderOptions,
    ) {
        let world = mesh.world_matrix();
        let view = camera.view_matrix();

        for face in &mesh.faces {
            // Face indices are 1-based; decremented exactly once here.
            // Faces pointing outside the vertex list are skipped.
            let gathered = [face.a, face.b, face.c].map(|idx| {
                idx.checked_sub(1).and_then(|i| mesh.vertices.get(i)).copied()
            });
            let (Some(a), Some(b), Some(c)) = (gathered[0], gathered[1], gathered[2]) else {
                continue;
            };

            // Model space -> world -> view
            let transformed = [a, b, c].map(|v| {
                view.mul_vec4(world.mul_vec4(Vec4::from_vec3(v))).to_vec3()
            });

            // Back-face test in view space: the camera sits at the origin
            if options.backface_cull
                && !is_facing_camera(Vec3::ZERO, transformed[0], transformed[1], transformed[2])
            {
                continue;
            }

            // Flat lighting from the pre-clip view-space normal
            let intensity =
                light_intensity(light.direction, transformed[0], transformed[1], transformed[2]);
            let color = mesh.color.shade(intensity);

            // Clip in view space, then re-fan into triangles
            let mut polygon = Polygon::from_triangle(
                transformed[0],
                transformed[1],
                transformed[2],
                face.a_uv,
                face.b_uv,
                face.c_uv,
            );
            polygon.clip(&self.frustum);

            for (verts, uvs) in polygon.triangles() {
                let points = verts.map(|v| self.to_screen(v));
                self.push_triangle(Triangle { points, uvs, color });
            }
        }
    }

    /// Perspective-project a view-space point and map NDC to pixels:
    /// scale by the half extents, flip Y (screen Y grows down), then
    /// offset to the viewport center.
    fn to_screen(&self, v: Vec3) -> Vec4 {
        let mut p = self.projection.project_vec4(Vec4::from_vec3(v));
        p.x *= self.width as f32 / 2.0;
        p.y *= self.height as f32 / 2.0;
        p.y *= -1.0;
        p.x += self.width as f32 / 2.0;
        p.y += self.height as f32 / 2.0;
        p
    }

    fn push_triangle(&mut self, triangle: Triangle) {
        if self.triangles.len() < self.max_triangles {
            self.triangles.push(triangle);
        } else {
            self.dropped += 1;
        }
    }

    /// Rasterize the render list into the framebuffer. Fill passes run
    /// first, then wireframe and vertex markers overlay on top.
    pub fn draw(&self, fb: &mut Framebuffer, texture: Option<&Texture>, options: &RenderOptions) {
        if options.draw_textured || options.draw_filled {
            // Textured mode without a texture degrades to a flat fill
            let texture = if options.draw_textured { texture } else { None };
            for triangle in &self.triangles {
                rasterize_triangle(fb, triangle, texture);
            }
        }

        if options.draw_wireframe {
            for triangle in &self.triangles {
                draw_triangle_wireframe(fb, triangle, WIREFRAME_COLOR);
            }
        }

        if options.draw_vertices {
            for triangle in &self.triangles {
                draw_vertex_markers(fb, triangle, MARKER_COLOR);
            }
        }
    }
}
