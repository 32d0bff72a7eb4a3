//! HUD: run timer, debug readouts, compass and menu prompt
//!
//! The compass is drawn into the offscreen framebuffer so it scales with the
//! 3D image. Text goes straight to the window with macroquad.

use std::f32::consts::PI;
use macroquad::prelude::{draw_rectangle, draw_text, measure_text, Color as ScreenColor};
use crate::rasterizer::{Color, Framebuffer, Vec3};

const TEXT_SIZE: f32 = 8.0;
const PROMPT_SIZE: f32 = 16.0;
const COMPASS_RADIUS: i32 = 12;
const COMPASS_NEEDLE: f32 = 10.0;
const COMPASS_BG: Color = Color::new(220, 220, 220);
const TEXT_COLOR: ScreenColor = ScreenColor::new(0.0, 0.0, 0.0, 1.0);

/// `=MM:SS:mmm`
pub fn format_time(seconds: f32) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    let millis = ((seconds * 1000.0) % 1000.0) as u32;
    format!("={:02}:{:02}:{:03}", minutes, secs, millis)
}

/// Compass in the top-right corner: red needle is yaw, blue bar is pitch
pub fn draw_compass(fb: &mut Framebuffer, yaw: f32, pitch: f32) {
    let cx = fb.width as i32 - COMPASS_RADIUS - 1;
    let cy = COMPASS_RADIUS + 1;
    fb.draw_circle(cx, cy, COMPASS_RADIUS, COMPASS_BG);

    let heading = yaw - 3.0 * PI / 4.0;
    let hx = cx + (heading.cos() * COMPASS_NEEDLE).round() as i32;
    let hy = cy + (heading.sin() * COMPASS_NEEDLE).round() as i32;
    fb.draw_line(cx, cy, hx, hy, Color::RED);

    let tilt = (pitch / PI * 20.0).round() as i32;
    fb.draw_line(cx, cy, cx, cy - tilt, Color::BLUE);
    fb.set_pixel(cx as usize, cy as usize, Color::BLACK);
}

/// Where the logical framebuffer sits in the window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Viewport {
    /// Uniform scale that fits the window, centered
    pub fn fit(logical_w: f32, logical_h: f32, screen_w: f32, screen_h: f32) -> Self {
        let scale = (screen_w / logical_w).min(screen_h / logical_h);
        Self {
            x: (screen_w - logical_w * scale) / 2.0,
            y: (screen_h - logical_h * scale) / 2.0,
            scale,
        }
    }

    pub fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, self.y + y * self.scale)
    }
}

/// Numbers shown while playing
pub struct HudInfo {
    pub elapsed: f32,
    pub player: Vec3,
    pub checkpoint: usize,
    pub checkpoint_total: usize,
}

fn text(view: &Viewport, s: &str, x: f32, y: f32, size: f32) {
    let (sx, sy) = view.to_screen(x, y + size);
    draw_text(s, sx, sy, size * view.scale, TEXT_COLOR);
}

/// Width of `s` in logical pixels
fn text_width(view: &Viewport, s: &str, size: f32) -> f32 {
    measure_text(s, None, (size * view.scale) as u16, 1.0).width / view.scale
}

pub fn draw_debug(view: &Viewport, fps: i32, triangles: usize) {
    text(view, &format!("FPS: {}", fps), 1.0, 0.0, TEXT_SIZE);
    text(view, &format!("Triangles: {}", triangles), 1.0, TEXT_SIZE, TEXT_SIZE);
}

pub fn draw_level_hud(view: &Viewport, logical_w: f32, logical_h: f32, info: &HudInfo) {
    let timer = format_time(info.elapsed);
    let width = text_width(view, &timer, TEXT_SIZE);
    text(view, &timer, logical_w - width - 1.0, logical_h - TEXT_SIZE - 1.0, TEXT_SIZE);

    let p = info.player;
    text(view, &format!("Player: {:.0},{:.0},{:.0}", p.x, p.y, p.z), 1.0, TEXT_SIZE * 2.0, TEXT_SIZE);
    if info.checkpoint_total > 0 {
        text(
            view,
            &format!("Flags: {}/{}", info.checkpoint, info.checkpoint_total),
            1.0,
            TEXT_SIZE * 3.0,
            TEXT_SIZE,
        );
    }
}

pub fn draw_menu_hud(view: &Viewport, logical_w: f32, logical_h: f32, best_time: Option<f32>, fade: f32) {
    let prompt = "Z to play";
    let width = text_width(view, prompt, PROMPT_SIZE);
    text(view, prompt, (logical_w - width) / 2.0, logical_h / 2.0 - PROMPT_SIZE, PROMPT_SIZE);

    if let Some(best) = best_time {
        let line = format!("Best {}", format_time(best));
        let width = text_width(view, &line, TEXT_SIZE);
        text(view, &line, (logical_w - width) / 2.0, logical_h / 2.0 + 4.0, TEXT_SIZE);
    }

    if fade > 0.0 {
        let (x, y) = view.to_screen(0.0, 0.0);
        draw_rectangle(
            x,
            y,
            logical_w * view.scale,
            logical_h * view.scale,
            ScreenColor::new(0.0, 0.0, 0.0, fade),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "=00:00:000");
        assert_eq!(format_time(83.25), "=01:23:250");
        assert_eq!(format_time(-3.0), "=00:00:000");
    }

    #[test]
    fn test_compass_drawn_top_right() {
        let mut fb = Framebuffer::new(256, 224);
        fb.clear(Color::WHITE);
        draw_compass(&mut fb, 0.0, -0.5);
        let (cx, cy) = (256 - COMPASS_RADIUS as usize - 1, COMPASS_RADIUS as usize + 1);
        assert_eq!(fb.get_pixel(cx, cy), Color::BLACK);
        // Looking down draws the pitch bar below the center
        assert_eq!(fb.get_pixel(cx, cy + 2), Color::BLUE);
        assert_eq!(fb.get_pixel(0, 0), Color::WHITE);
    }

    #[test]
    fn test_viewport_fit_pillarboxes_wide_window() {
        let view = Viewport::fit(256.0, 224.0, 1200.0, 1000.0);
        assert!((view.scale - 1000.0 / 224.0).abs() < 0.001);
        assert!(view.y.abs() < 0.001);
        assert!(view.x > 0.0);
        let (x, y) = view.to_screen(256.0, 224.0);
        assert!((x - (1200.0 - view.x)).abs() < 0.01);
        assert!((y - 1000.0).abs() < 0.01);
    }

    #[test]
    fn test_viewport_fit_letterboxes_tall_window() {
        let view = Viewport::fit(256.0, 224.0, 1024.0, 1000.0);
        assert!((view.scale - 4.0).abs() < 0.001);
        assert!(view.x.abs() < 0.001);
        assert!((view.y - (1000.0 - 896.0) / 2.0).abs() < 0.001);
        let (x, y) = view.to_screen(256.0, 224.0);
        assert!((x - 1024.0).abs() < 0.01);
        assert!((y - (1000.0 - view.y)).abs() < 0.01);
    }
}
