//! Host rasterizer
//! Fills screen-space triangles into an offscreen framebuffer, PS1 style:
//! affine texture mapping, no depth buffer (triangles arrive sorted).

use super::math::{barycentric, Vec2};
use super::types::{Color, RasterSettings, ScreenVertex, Texture};

/// Consumer of the pipeline's display vertices
pub trait HostRasterizer {
    type Surface;

    /// Select the offscreen surface as the draw target and clear it
    fn bind_offscreen(&mut self, width: usize, height: usize, clear: Color);

    /// Draw `vertices` (three per triangle) textured from `atlas`
    fn draw_geometry(&mut self, vertices: &[ScreenVertex], atlas: &Texture);

    /// Stop drawing into the offscreen surface
    fn restore_default_target(&mut self);

    /// The drawn surface, open for overlays before it is presented
    fn surface_mut(&mut self) -> &mut Self::Surface;
}

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let p = &self.pixels[idx..idx + 4];
            Color::with_alpha(p[0], p[1], p[2], p[3])
        } else {
            Color::BLACK
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Draw a filled circle at (cx, cy) with given radius and color
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let r_sq = radius * radius;
        for y in (cy - radius).max(0)..=(cy + radius).min(self.height as i32 - 1) {
            for x in (cx - radius).max(0)..=(cx + radius).min(self.width as i32 - 1) {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.set_pixel(x as usize, y as usize, color);
                }
            }
        }
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
                self.set_pixel(x as usize, y as usize, color);
            }

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
}

/// Rasterize a single screen-space triangle
fn rasterize_triangle(fb: &mut Framebuffer, tri: &[ScreenVertex], texture: &Texture, settings: &RasterSettings) {
    let snap = |v: Vec2| if settings.vertex_snap { Vec2::new(v.x.floor(), v.y.floor()) } else { v };
    let (p1, p2, p3) = (snap(tri[0].position), snap(tri[1].position), snap(tri[2].position));

    // A vertex behind the camera can divide to infinity; nothing sensible to fill
    if ![p1, p2, p3].iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
        return;
    }

    // Bounding box
    let min_x = p1.x.min(p2.x).min(p3.x).max(0.0) as usize;
    let max_x = (p1.x.max(p2.x).max(p3.x) + 1.0).clamp(0.0, fb.width as f32) as usize;
    let min_y = p1.y.min(p2.y).min(p3.y).max(0.0) as usize;
    let max_y = (p1.y.max(p2.y).max(p3.y) + 1.0).clamp(0.0, fb.height as f32) as usize;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = Vec2::new(x as f32, y as f32);
            let bc = barycentric(p, p1, p2, p3);

            // Check if inside triangle
            const ERR: f32 = -0.0001;
            if bc.x >= ERR && bc.y >= ERR && bc.z >= ERR {
                // Affine (PS1 style) - linear interpolation in screen space
                let u = bc.x * tri[0].uv.x + bc.y * tri[1].uv.x + bc.z * tri[2].uv.x;
                let v = bc.x * tri[0].uv.y + bc.y * tri[1].uv.y + bc.z * tri[2].uv.y;

                let color = texture.sample(u, v).modulate(tri[0].color);
                if color.a == 0 {
                    continue;
                }
                fb.set_pixel(x, y, color);
            }
        }
    }
}

/// CPU implementation of the host rasterizer
pub struct SoftwareRasterizer {
    target: Framebuffer,
    bound: bool,
    pub settings: RasterSettings,
}

impl SoftwareRasterizer {
    pub fn new(width: usize, height: usize, settings: RasterSettings) -> Self {
        Self {
            target: Framebuffer::new(width, height),
            bound: false,
            settings,
        }
    }
}

impl HostRasterizer for SoftwareRasterizer {
    type Surface = Framebuffer;

    fn bind_offscreen(&mut self, width: usize, height: usize, clear: Color) {
        self.target.resize(width, height);
        self.target.clear(clear);
        self.bound = true;
    }

    fn draw_geometry(&mut self, vertices: &[ScreenVertex], atlas: &Texture) {
        if !self.bound {
            log::warn!("draw_geometry with no bound target, {} vertices dropped", vertices.len());
            return;
        }
        for tri in vertices.chunks_exact(3) {
            rasterize_triangle(&mut self.target, tri, atlas, &self.settings);
        }
    }

    fn restore_default_target(&mut self) {
        self.bound = false;
    }

    fn surface_mut(&mut self) -> &mut Framebuffer {
        &mut self.target
    }
}
