//! Prism Engine: software 3D renderer
//!
//! The whole pipeline runs on the CPU: transform, back-face cull, frustum
//! clip, project, light, and scanline-rasterize into an owned framebuffer.
//! macroquad only supplies the window, the input events, and the final
//! blit of that framebuffer to the screen.
//!
//! Keys: 1 vertex markers, 2 wireframe, 3 filled, 4 textured, C culling,
//! Space pause, W/S move, A/D turn, Up/Down look, Q/E rise and sink.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod rasterizer;
mod scene;
mod app;

use macroquad::prelude::*;

use app::AppState;
use rasterizer::{
    Framebuffer, Pipeline, Texture as RasterTexture, Color as RasterColor,
    WIDTH, HEIGHT, FOV_Y, Z_NEAR, Z_FAR,
};
use scene::{load_scene, Scene};

const SCENE_PATH: &str = "assets/scenes/default.ron";
const TEXTURE_PATH: &str = "assets/textures/checker.png";

/// Per-keypress camera steps
const MOVE_STEP: f32 = 0.15;
const TURN_STEP: f32 = 0.03;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Prism Engine v{}", VERSION),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let scene = match load_scene(SCENE_PATH) {
        Ok(scene) => {
            println!("Loaded scene {} ({} meshes)", SCENE_PATH, scene.meshes.len());
            scene
        }
        Err(e) => {
            eprintln!("Could not load {}: {}, using built-in scene", SCENE_PATH, e);
            Scene::default_scene()
        }
    };

    let texture = match RasterTexture::from_file(TEXTURE_PATH) {
        Ok(tex) => {
            println!("Loaded texture: {} ({}x{})", tex.name, tex.width, tex.height);
            tex
        }
        Err(e) => {
            eprintln!("{}, using generated checkerboard", e);
            RasterTexture::checkerboard(
                64,
                64,
                RasterColor::new(200, 200, 210),
                RasterColor::new(90, 90, 110),
            )
        }
    };

    let mut app = AppState::from_scene(&scene, texture);
    let mut fb = Framebuffer::new(WIDTH, HEIGHT);
    let mut pipeline = Pipeline::new(WIDTH, HEIGHT, FOV_Y, Z_NEAR, Z_FAR);

    println!("=== Prism Engine ===");

    loop {
        handle_input(&mut app);
        app.update(get_frame_time());

        // Geometry pass: build the per-frame render list
        pipeline.begin_frame();
        for obj in &app.objects {
            pipeline.process_mesh(&obj.mesh, &app.camera, &app.light, &app.options);
        }

        // Raster pass
        fb.clear(app.background);
        pipeline.draw(&mut fb, Some(&app.texture), &app.options);

        if pipeline.dropped() > 0 {
            eprintln!("Render list full: dropped {} triangles", pipeline.dropped());
        }

        // Present: blit the software framebuffer scaled to fit the window
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);

        let scale = (screen_width() / fb.width as f32).min(screen_height() / fb.height as f32);
        let dest_w = fb.width as f32 * scale;
        let dest_h = fb.height as f32 * scale;

        clear_background(BLACK);
        draw_texture_ex(
            &texture,
            (screen_width() - dest_w) / 2.0,
            (screen_height() - dest_h) / 2.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(dest_w, dest_h)),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}

/// Map key events onto render-mode toggles and camera nudges
fn handle_input(app: &mut AppState) {
    // Render-mode toggles, freely combinable
    if is_key_pressed(KeyCode::Key1) {
        app.options.draw_vertices = !app.options.draw_vertices;
    }
    if is_key_pressed(KeyCode::Key2) {
        app.options.draw_wireframe = !app.options.draw_wireframe;
    }
    if is_key_pressed(KeyCode::Key3) {
        app.options.draw_filled = !app.options.draw_filled;
    }
    if is_key_pressed(KeyCode::Key4) {
        app.options.draw_textured = !app.options.draw_textured;
    }
    if is_key_pressed(KeyCode::C) {
        app.options.backface_cull = !app.options.backface_cull;
    }
    if is_key_pressed(KeyCode::Space) {
        app.paused = !app.paused;
    }

    // Discrete camera nudges
    if is_key_down(KeyCode::W) {
        app.camera.move_forward(MOVE_STEP);
    }
    if is_key_down(KeyCode::S) {
        app.camera.move_forward(-MOVE_STEP);
    }
    if is_key_down(KeyCode::A) {
        app.camera.rotate_yaw(-TURN_STEP);
    }
    if is_key_down(KeyCode::D) {
        app.camera.rotate_yaw(TURN_STEP);
    }
    if is_key_down(KeyCode::Up) {
        // Positive pitch looks down, so invert
        app.camera.rotate_pitch(-TURN_STEP);
    }
    if is_key_down(KeyCode::Down) {
        app.camera.rotate_pitch(TURN_STEP);
    }
    if is_key_down(KeyCode::Q) {
        app.camera.move_vertical(MOVE_STEP);
    }
    if is_key_down(KeyCode::E) {
        app.camera.move_vertical(-MOVE_STEP);
    }
}
