//! Core types for the rasterizer

use super::math::{Vec2, Vec4};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Multiply by a vertex tint (white leaves the color unchanged)
    pub fn modulate(self, tint: Color) -> Self {
        let m = |c: u8, t: u8| ((c as u16 * t as u16) / 255) as u8;
        Self {
            r: m(self.r, tint.r),
            g: m(self.g, tint.g),
            b: m(self.b, tint.b),
            a: m(self.a, tint.a),
        }
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A model or pipeline vertex: homogeneous position plus texture coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec4,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(pos: Vec4, uv: Vec2) -> Self {
        Self { pos, uv }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self {
            pos: Vec4::point(x, y, z),
            uv: Vec2::default(),
        }
    }

    pub fn textured(x: f32, y: f32, z: f32, u: f32, v: f32) -> Self {
        Self {
            pos: Vec4::point(x, y, z),
            uv: Vec2::new(u, v),
        }
    }
}

/// Display-ready vertex handed to the host rasterizer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenVertex {
    /// Pixel position in the logical render target
    pub position: Vec2,
    pub uv: Vec2,
    pub color: Color,
}

/// Texture atlas (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

impl Texture {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::WHITE; width * height],
        }
    }

    /// Load texture from a PNG file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        use image::GenericImageView;

        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
        })
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels }
    }

    /// Sample texture at UV coordinates (nearest, wrapping)
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::WHITE;
        }
        let tx = ((u * self.width as f32).floor() as i64).rem_euclid(self.width as i64) as usize;
        let ty = ((v * self.height as f32).floor() as i64).rem_euclid(self.height as i64) as usize;
        self.pixels[ty * self.width + tx]
    }
}

/// Rasterizer settings
#[derive(Debug, Clone, Default)]
pub struct RasterSettings {
    /// Snap vertices to integer coordinates (PS1 jitter)
    pub vertex_snap: bool,
}
