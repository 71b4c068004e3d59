//! Scene loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files: a
//! background color, the camera and light setup, and a list of meshes
//! (procedural or OBJ-backed) with their transforms and spin rates.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::rasterizer::{Color, Mesh, Vec3};

/// Error type for scene loading
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::SerializeError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

/// Camera placement in a scene file
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: Vec3,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

/// Where a mesh's geometry comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MeshSource {
    Cube { size: f32 },
    Obj { path: String },
}

fn unit_scale() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

fn white() -> Color {
    Color::WHITE
}

/// One mesh entry: source geometry plus transform and animation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshConfig {
    pub source: MeshSource,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    /// Rotation rate, radians per second per axis
    #[serde(default)]
    pub spin: Vec3,
    #[serde(default = "white")]
    pub color: Color,
}

impl MeshConfig {
    /// Build the live mesh. OBJ sources read from disk and can fail.
    pub fn instantiate(&self) -> Result<Mesh, String> {
        let mut mesh = match &self.source {
            MeshSource::Cube { size } => Mesh::cube(*size),
            MeshSource::Obj { path } => Mesh::from_obj_file(path)?,
        };
        mesh.position = self.position;
        mesh.rotation = self.rotation;
        mesh.scale = self.scale;
        mesh.color = self.color;
        Ok(mesh)
    }
}

/// A complete scene description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub background: Color,
    pub camera: CameraConfig,
    /// Directional light: points from the light toward the scene
    pub light_direction: Vec3,
    pub meshes: Vec<MeshConfig>,
}

impl Scene {
    /// Built-in fallback: a spinning textured cube in front of the camera
    pub fn default_scene() -> Self {
        Self {
            background: Color::new(25, 25, 35),
            camera: CameraConfig {
                position: Vec3::ZERO,
                yaw: 0.0,
                pitch: 0.0,
            },
            light_direction: Vec3::new(0.3, -0.4, 1.0),
            meshes: vec![MeshConfig {
                source: MeshSource::Cube { size: 1.0 },
                position: Vec3::new(0.0, 0.0, 5.0),
                rotation: Vec3::ZERO,
                scale: Vec3::new(1.0, 1.0, 1.0),
                spin: Vec3::new(0.4, 0.6, 0.0),
                color: Color::WHITE,
            }],
        }
    }
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
    let contents = fs::read_to_string(path)?;
    let scene: Scene = ron::from_str(&contents)?;
    Ok(scene)
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str) -> Result<Scene, SceneError> {
    Ok(ron::from_str(s)?)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}
