//! Framebuffer and triangle rasterization
//!
//! Scanline triangle fill with perspective-correct attribute
//! interpolation and per-pixel depth testing. All draw operations write
//! straight into an explicitly owned framebuffer passed in by the caller;
//! out-of-bounds writes are silently skipped.

use super::math::{barycentric, Vec2, Vec4};
use super::types::{Color, Texture};

/// Owned color + depth target for software rendering
pub struct Framebuffer {
    /// RGBA, 4 bytes per pixel
    pub pixels: Vec<u8>,
    /// One depth value per pixel; 1.0 = far plane
    pub depth: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            depth: vec![1.0; width * height],
            width,
            height,
        }
    }

    /// Reset every pixel to `color` and every depth entry to the far value
    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for i in 0..(self.width * self.height) {
            self.pixels[i * 4] = bytes[0];
            self.pixels[i * 4 + 1] = bytes[1];
            self.pixels[i * 4 + 2] = bytes[2];
            self.pixels[i * 4 + 3] = bytes[3];
            self.depth[i] = 1.0;
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
            self.depth = vec![1.0; width * height];
        }
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    /// Write a pixel ignoring depth; out-of-bounds coordinates are a no-op
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.in_bounds(x, y) {
            let idx = (y as usize * self.width + x as usize) * 4;
            let bytes = color.to_bytes();
            self.pixels[idx] = bytes[0];
            self.pixels[idx + 1] = bytes[1];
            self.pixels[idx + 2] = bytes[2];
            self.pixels[idx + 3] = bytes[3];
        }
    }

    /// Depth-tested write: draws only if `depth` is strictly nearer than
    /// the stored value. Returns whether the pixel was written.
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: Color) -> bool {
        if self.in_bounds(x, y) {
            let idx = y as usize * self.width + x as usize;
            if depth < self.depth[idx] {
                self.depth[idx] = depth;
                let pixel_idx = idx * 4;
                let bytes = color.to_bytes();
                self.pixels[pixel_idx] = bytes[0];
                self.pixels[pixel_idx + 1] = bytes[1];
                self.pixels[pixel_idx + 2] = bytes[2];
                self.pixels[pixel_idx + 3] = bytes[3];
                return true;
            }
        }
        false
    }

    /// Read back a pixel as a Color (black outside the buffer)
    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        if self.in_bounds(x, y) {
            let idx = (y as usize * self.width + x as usize) * 4;
            Color::with_alpha(
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            )
        } else {
            Color::BLACK
        }
    }

    /// Draw a line using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Fill an axis-aligned rectangle, clamped to the buffer
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        for py in y..y + height {
            for px in x..x + width {
                self.set_pixel(px, py, color);
            }
        }
    }
}

/// A render-ready triangle, constructed and consumed within one frame
///
/// Points hold screen-space x,y and the post-divide z; w keeps the
/// pre-divide view depth that drives depth testing and
/// perspective-correct interpolation.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub points: [Vec4; 3],
    pub uvs: [Vec2; 3],
    pub color: Color,
}

/// All per-vertex attributes bundled into one record so the Y-sort can
/// never desynchronize position from UV
#[derive(Debug, Clone, Copy)]
struct RasterVertex {
    x: f32,
    y: f32,
    w: f32,
    u: f32,
    v: f32,
}

impl RasterVertex {
    fn from_triangle(triangle: &Triangle, i: usize) -> Self {
        Self {
            x: triangle.points[i].x,
            y: triangle.points[i].y,
            w: triangle.points[i].w,
            u: triangle.uvs[i].x,
            v: triangle.uvs[i].y,
        }
    }
}

/// Shade one pixel of a triangle: barycentric weights from the
/// screen-space vertices, perspective-correct interpolation via 1/w,
/// depth-tested write. `1 - 1/w` is stored so smaller means nearer.
fn draw_triangle_pixel(
    fb: &mut Framebuffer,
    x: i32,
    y: i32,
    v: &[RasterVertex; 3],
    texture: Option<&Texture>,
    flat_color: Color,
) {
    let p = Vec2::new(x as f32, y as f32);
    let weights = barycentric(
        p,
        Vec2::new(v[0].x, v[0].y),
        Vec2::new(v[1].x, v[1].y),
        Vec2::new(v[2].x, v[2].y),
    );
    let (alpha, beta, gamma) = (weights.x, weights.y, weights.z);

    let inv_w = alpha / v[0].w + beta / v[1].w + gamma / v[2].w;
    let depth = 1.0 - inv_w;

    let color = match texture {
        Some(tex) => {
            let u = (v[0].u / v[0].w * alpha + v[1].u / v[1].w * beta + v[2].u / v[2].w * gamma)
                / inv_w;
            let vv = (v[0].v / v[0].w * alpha + v[1].v / v[1].w * beta + v[2].v / v[2].w * gamma)
                / inv_w;
            tex.sample(u, vv)
        }
        None => flat_color,
    };

    fb.set_pixel_with_depth(x, y, depth, color);
}

/// Scanline-fill a triangle, flat-colored or textured.
///
/// Vertices are sorted by ascending screen Y, then the triangle is walked
/// as a flat-bottom region (y0..y1) and a flat-top region (y1..y2) using
/// inverse-slope stepping for the left/right bounds of each scanline.
/// Zero-area triangles are skipped outright rather than producing NaN
/// weights.
pub fn rasterize_triangle(fb: &mut Framebuffer, triangle: &Triangle, texture: Option<&Texture>) {
    let mut v = [
        RasterVertex::from_triangle(triangle, 0),
        RasterVertex::from_triangle(triangle, 1),
        RasterVertex::from_triangle(triangle, 2),
    ];

    // Three compare-and-swaps sort by Y; attributes travel with positions
    if v[1].y < v[0].y {
        v.swap(0, 1);
    }
    if v[2].y < v[1].y {
        v.swap(1, 2);
    }
    if v[1].y < v[0].y {
        v.swap(0, 1);
    }

    // Degenerate screen area: nothing to fill
    let area = (v[1].y - v[2].y) * (v[0].x - v[2].x) + (v[2].x - v[1].x) * (v[0].y - v[2].y);
    if area == 0.0 {
        return;
    }

    let (y0, y1, y2) = (v[0].y as i32, v[1].y as i32, v[2].y as i32);

    // Upper region: flat-bottom, edges v0->v1 and v0->v2
    if y1 - y0 != 0 {
        let inv_slope_1 = (v[1].x - v[0].x) / (y1 - y0).abs() as f32;
        let inv_slope_2 = (v[2].x - v[0].x) / (y2 - y0).abs() as f32;

        for y in y0..=y1 {
            let x_start = v[1].x + (y - y1) as f32 * inv_slope_1;
            let x_end = v[0].x + (y - y0) as f32 * inv_slope_2;

            let (mut xs, mut xe) = (x_start as i32, x_end as i32);
            if xe < xs {
                std::mem::swap(&mut xs, &mut xe);
            }
            for x in xs..=xe {
                draw_triangle_pixel(fb, x, y, &v, texture, triangle.color);
            }
        }
    }

    // Lower region: flat-top, edges v1->v2 and v0->v2
    if y2 - y1 != 0 {
        let inv_slope_1 = (v[2].x - v[1].x) / (y2 - y1).abs() as f32;
        let inv_slope_2 = (v[2].x - v[0].x) / (y2 - y0).abs() as f32;

        for y in y1..=y2 {
            let x_start = v[1].x + (y - y1) as f32 * inv_slope_1;
            let x_end = v[0].x + (y - y0) as f32 * inv_slope_2;

            let (mut xs, mut xe) = (x_start as i32, x_end as i32);
            if xe < xs {
                std::mem::swap(&mut xs, &mut xe);
            }
            for x in xs..=xe {
                draw_triangle_pixel(fb, x, y, &v, texture, triangle.color);
            }
        }
    }
}

/// Draw the three edges of a triangle
pub fn draw_triangle_wireframe(fb: &mut Framebuffer, triangle: &Triangle, color: Color) {
    let [p0, p1, p2] = triangle.points;
    fb.draw_line(p0.x as i32, p0.y as i32, p1.x as i32, p1.y as i32, color);
    fb.draw_line(p1.x as i32, p1.y as i32, p2.x as i32, p2.y as i32, color);
    fb.draw_line(p2.x as i32, p2.y as i32, p0.x as i32, p0.y as i32, color);
}

/// Draw a small filled square at each projected vertex
pub fn draw_vertex_markers(fb: &mut Framebuffer, triangle: &Triangle, color: Color) {
    for p in &triangle.points {
        fb.fill_rect(p.x as i32 - 2, p.y as i32 - 2, 5, 5, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::Vec2;

    fn screen_triangle(w: f32, color: Color) -> Triangle {
        Triangle {
            points: [
                Vec4::new(10.0, 10.0, 0.0, w),
                Vec4::new(40.0, 10.0, 0.0, w),
                Vec4::new(10.0, 40.0, 0.0, w),
            ],
            uvs: [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
            color,
        }
    }

    #[test]
    fn test_new_framebuffer_cleared_to_far() {
        let fb = Framebuffer::new(4, 4);
        assert_eq!(fb.pixels.len(), 4 * 4 * 4);
        assert!(fb.depth.iter().all(|&d| d == 1.0));
    }

    #[test]
    fn test_resize_reallocates_and_clears() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set_pixel_with_depth(0, 0, 0.2, Color::RED);
        fb.resize(8, 2);
        assert_eq!(fb.width, 8);
        assert_eq!(fb.pixels.len(), 8 * 2 * 4);
        assert!(fb.depth.iter().all(|&d| d == 1.0));
    }

    #[test]
    fn test_clear_resets_color_and_depth() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set_pixel_with_depth(1, 1, 0.5, Color::RED);
        fb.clear(Color::BLUE);
        assert_eq!(fb.get_pixel(1, 1), Color::BLUE);
        assert!(fb.depth.iter().all(|&d| d == 1.0));
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_noop() {
        let mut fb = Framebuffer::new(8, 8);
        // Exact boundary coordinates are out of bounds
        fb.set_pixel(8, 0, Color::RED);
        fb.set_pixel(0, 8, Color::RED);
        fb.set_pixel(-1, 0, Color::RED);
        assert!(fb.pixels.iter().all(|&b| b == 0));
        // Last valid pixel is width-1, height-1
        fb.set_pixel(7, 7, Color::RED);
        assert_eq!(fb.get_pixel(7, 7), Color::RED);
    }

    #[test]
    fn test_depth_test_strictly_less() {
        let mut fb = Framebuffer::new(8, 8);
        assert!(fb.set_pixel_with_depth(2, 2, 0.5, Color::RED));
        // Equal depth loses
        assert!(!fb.set_pixel_with_depth(2, 2, 0.5, Color::GREEN));
        // Nearer wins
        assert!(fb.set_pixel_with_depth(2, 2, 0.4, Color::BLUE));
        assert_eq!(fb.get_pixel(2, 2), Color::BLUE);
    }

    #[test]
    fn test_fill_covers_interior_not_exterior() {
        let mut fb = Framebuffer::new(64, 64);
        fb.clear(Color::BLACK);
        rasterize_triangle(&mut fb, &screen_triangle(5.0, Color::RED), None);
        assert_eq!(fb.get_pixel(15, 15), Color::RED);
        assert_eq!(fb.get_pixel(50, 50), Color::BLACK);
    }

    #[test]
    fn test_depth_test_is_order_independent() {
        let near = screen_triangle(5.0, Color::GREEN);
        let far = screen_triangle(10.0, Color::RED);

        let mut fb_a = Framebuffer::new(64, 64);
        rasterize_triangle(&mut fb_a, &near, None);
        rasterize_triangle(&mut fb_a, &far, None);

        let mut fb_b = Framebuffer::new(64, 64);
        rasterize_triangle(&mut fb_b, &far, None);
        rasterize_triangle(&mut fb_b, &near, None);

        // The overlap keeps the nearer color whichever order drew
        assert_eq!(fb_a.get_pixel(15, 15), Color::GREEN);
        assert_eq!(fb_b.get_pixel(15, 15), Color::GREEN);
    }

    #[test]
    fn test_zero_area_triangle_is_skipped() {
        let mut fb = Framebuffer::new(64, 64);
        let degenerate = Triangle {
            points: [
                Vec4::new(10.0, 10.0, 0.0, 1.0),
                Vec4::new(20.0, 20.0, 0.0, 1.0),
                Vec4::new(30.0, 30.0, 0.0, 1.0),
            ],
            uvs: [Vec2::default(); 3],
            color: Color::RED,
        };
        rasterize_triangle(&mut fb, &degenerate, None);
        assert!(fb.pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_textured_fill_samples_texture() {
        let mut fb = Framebuffer::new(64, 64);
        let tex = Texture::checkerboard(4, 4, Color::GREEN, Color::GREEN);
        rasterize_triangle(&mut fb, &screen_triangle(5.0, Color::RED), Some(&tex));
        assert_eq!(fb.get_pixel(15, 15), Color::GREEN);
    }

    #[test]
    fn test_offscreen_span_is_clamped() {
        // Triangle hangs past the right edge; writes must not wrap or panic
        let mut fb = Framebuffer::new(16, 16);
        let tri = Triangle {
            points: [
                Vec4::new(10.0, 2.0, 0.0, 1.0),
                Vec4::new(30.0, 2.0, 0.0, 1.0),
                Vec4::new(10.0, 14.0, 0.0, 1.0),
            ],
            uvs: [Vec2::default(); 3],
            color: Color::RED,
        };
        rasterize_triangle(&mut fb, &tri, None);
        assert_eq!(fb.get_pixel(11, 3), Color::RED);
    }

    #[test]
    fn test_wireframe_plots_both_endpoints() {
        let mut fb = Framebuffer::new(32, 32);
        fb.clear(Color::BLACK);
        fb.draw_line(0, 0, 10, 0, Color::WHITE);
        assert_eq!(fb.get_pixel(0, 0), Color::WHITE);
        assert_eq!(fb.get_pixel(10, 0), Color::WHITE);
        assert_eq!(fb.get_pixel(11, 0), Color::BLACK);
    }

    #[test]
    fn test_vertex_markers_drawn_at_points() {
        let mut fb = Framebuffer::new(64, 64);
        draw_vertex_markers(&mut fb, &screen_triangle(5.0, Color::RED), Color::WHITE);
        assert_eq!(fb.get_pixel(10, 10), Color::WHITE);
        assert_eq!(fb.get_pixel(40, 10), Color::WHITE);
        assert_eq!(fb.get_pixel(10, 40), Color::WHITE);
    }
}
