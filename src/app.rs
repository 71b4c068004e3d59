//! Application state
//!
//! The live scene: instantiated meshes with their spin rates, the camera,
//! the light, and the render settings toggled by input. Meshes whose
//! assets fail to load are skipped with a console note; an empty scene is
//! perfectly renderable.

use crate::rasterizer::{Camera, Color, Light, Mesh, RenderOptions, Texture, Vec3};
use crate::scene::Scene;

/// A mesh plus its animation state
pub struct SceneObject {
    pub mesh: Mesh,
    /// Rotation rate, radians per second per axis
    pub spin: Vec3,
}

/// Everything the frame loop reads and mutates
pub struct AppState {
    pub objects: Vec<SceneObject>,
    pub camera: Camera,
    pub light: Light,
    pub options: RenderOptions,
    pub background: Color,
    pub texture: Texture,
    pub paused: bool,
}

impl AppState {
    /// Instantiate a scene description into live state
    pub fn from_scene(scene: &Scene, texture: Texture) -> Self {
        let mut objects = Vec::with_capacity(scene.meshes.len());
        for config in &scene.meshes {
            match config.instantiate() {
                Ok(mesh) => objects.push(SceneObject { mesh, spin: config.spin }),
                Err(e) => eprintln!("Skipping mesh: {}", e),
            }
        }

        let mut camera = Camera::new(scene.camera.position);
        camera.yaw = scene.camera.yaw;
        camera.pitch = scene.camera.pitch;

        Self {
            objects,
            camera,
            light: Light::new(scene.light_direction),
            options: RenderOptions::default(),
            background: scene.background,
            texture,
            paused: false,
        }
    }

    /// Advance mesh animation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        for obj in &mut self.objects {
            obj.mesh.rotation = obj.mesh.rotation + obj.spin * dt;
        }
    }
}
