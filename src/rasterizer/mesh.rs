//! Mesh and face geometry
//!
//! A mesh owns model-space vertices plus faces indexing into them, and the
//! transform state (position, Euler rotation, per-axis scale) animated each
//! frame. Face indices are 1-based, the convention of the OBJ format they
//! are loaded from; they are decremented exactly once when the pipeline
//! gathers vertices.

use std::fs;
use std::path::Path;

use super::math::{Vec2, Vec3, Mat4};
use super::types::Color;

/// A triangle face: three 1-based vertex indices and one UV per corner
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub a_uv: Vec2,
    pub b_uv: Vec2,
    pub c_uv: Vec2,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize, a_uv: Vec2, b_uv: Vec2, c_uv: Vec2) -> Self {
        Self { a, b, c, a_uv, b_uv, c_uv }
    }
}

/// A 3D object: geometry plus per-frame transform state
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub position: Vec3,
    /// Euler XYZ, radians
    pub rotation: Vec3,
    pub scale: Vec3,
    /// Base color for flat-shaded fills
    pub color: Color,
}

/// Unit cube vertex table (1-based indexing: vertex 1 is CUBE_VERTICES[0])
const CUBE_VERTICES: [Vec3; 8] = [
    Vec3 { x: -1.0, y: -1.0, z: -1.0 },
    Vec3 { x: -1.0, y: 1.0, z: -1.0 },
    Vec3 { x: 1.0, y: 1.0, z: -1.0 },
    Vec3 { x: 1.0, y: -1.0, z: -1.0 },
    Vec3 { x: 1.0, y: 1.0, z: 1.0 },
    Vec3 { x: 1.0, y: -1.0, z: 1.0 },
    Vec3 { x: -1.0, y: 1.0, z: 1.0 },
    Vec3 { x: -1.0, y: -1.0, z: 1.0 },
];

/// Cube face index table, wound so cross(b-a, c-a) points outward
const CUBE_FACES: [(usize, usize, usize); 12] = [
    // front
    (1, 2, 3),
    (1, 3, 4),
    // right
    (4, 3, 5),
    (4, 5, 6),
    // back
    (6, 5, 7),
    (6, 7, 8),
    // left
    (8, 7, 2),
    (8, 2, 1),
    // top
    (2, 7, 5),
    (2, 5, 3),
    // bottom
    (6, 8, 1),
    (6, 1, 4),
];

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::new(1.0, 1.0, 1.0),
            color: Color::WHITE,
        }
    }

    /// Procedural cube: 8 vertices scaled by `size`, 12 faces with a full
    /// UV quad per side
    pub fn cube(size: f32) -> Self {
        let vertices = CUBE_VERTICES.iter().map(|v| v.scale(size)).collect();

        let mut faces = Vec::with_capacity(12);
        for pair in CUBE_FACES.chunks(2) {
            let (a, b, c) = pair[0];
            faces.push(Face::new(
                a, b, c,
                Vec2::new(0.0, 1.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
            ));
            let (a, b, c) = pair[1];
            faces.push(Face::new(
                a, b, c,
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
            ));
        }

        Self {
            vertices,
            faces,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::new(1.0, 1.0, 1.0),
            color: Color::WHITE,
        }
    }

    /// Load a mesh from a Wavefront OBJ file (`v`, `vt`, `f v/t` lines)
    pub fn from_obj_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Ok(Self::from_obj_str(&contents))
    }

    /// Parse the simplified OBJ subset: `v x y z`, `vt u v`,
    /// `f v1/t1 v2/t2 v3/t3` with 1-based indices. Malformed lines and
    /// out-of-range texture indices are skipped, not errors.
    pub fn from_obj_str(text: &str) -> Self {
        let mut mesh = Mesh::new();
        let mut texcoords: Vec<Vec2> = Vec::new();

        for line in text.lines() {
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("v") => {
                    let coords: Vec<f32> =
                        parts.filter_map(|p| p.parse().ok()).collect();
                    if coords.len() >= 3 {
                        mesh.vertices.push(Vec3::new(coords[0], coords[1], coords[2]));
                    }
                }
                Some("vt") => {
                    let coords: Vec<f32> =
                        parts.filter_map(|p| p.parse().ok()).collect();
                    if coords.len() >= 2 {
                        // OBJ UV origin is bottom-left; flip V to texture row order
                        texcoords.push(Vec2::new(coords[0], 1.0 - coords[1]));
                    }
                }
                Some("f") => {
                    let mut verts = [0usize; 3];
                    let mut uvs = [Vec2::default(); 3];
                    let mut ok = 0;
                    for (i, part) in parts.take(3).enumerate() {
                        let mut ids = part.split('/');
                        let v: Option<usize> = ids.next().and_then(|s| s.parse().ok());
                        let t: Option<usize> = ids.next().and_then(|s| s.parse().ok());
                        if let Some(v) = v {
                            verts[i] = v;
                            if let Some(uv) =
                                t.and_then(|t| t.checked_sub(1)).and_then(|t| texcoords.get(t))
                            {
                                uvs[i] = *uv;
                            }
                            ok += 1;
                        }
                    }
                    if ok == 3 {
                        mesh.faces.push(Face::new(
                            verts[0], verts[1], verts[2], uvs[0], uvs[1], uvs[2],
                        ));
                    }
                }
                _ => {}
            }
        }

        mesh
    }

    /// World transform for the current frame: Translation * Rotation * Scale
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::world(self.position, self.rotation, self.scale)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
