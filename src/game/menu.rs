//! Title menu: spinning island and a fade into the level

use std::f32::consts::FRAC_PI_4;
use crate::rasterizer::{Camera, Mat4, Vec3};
use super::camera::{ease_camera, orbit_point};

/// Seconds from pressing play to the level starting
pub const MENU_FADE_TIME: f32 = 1.0;
const ORBIT_DISTANCE: f32 = 8.0;
const ORBIT_HEIGHT: f32 = 6.0;
const ISLAND_POSITION: Vec3 = Vec3::new(0.0, 0.0, -1.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    None,
    StartGame,
}

#[derive(Debug, Clone, Default)]
pub struct Menu {
    /// Seconds since the fade started, if it has
    fade: Option<f32>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, camera: &mut Camera, start_pressed: bool, dt: f32) -> MenuEvent {
        ease_camera(
            camera,
            orbit_point(Vec3::ZERO, FRAC_PI_4, ORBIT_DISTANCE, ORBIT_HEIGHT),
            Vec3::ZERO,
            dt,
        );

        match self.fade.as_mut() {
            None if start_pressed => {
                self.fade = Some(0.0);
                MenuEvent::None
            }
            None => MenuEvent::None,
            Some(elapsed) => {
                *elapsed += dt;
                if *elapsed >= MENU_FADE_TIME {
                    self.fade = None;
                    MenuEvent::StartGame
                } else {
                    MenuEvent::None
                }
            }
        }
    }

    /// 0 = clear, 1 = fully black
    pub fn fade_amount(&self) -> f32 {
        self.fade.map_or(0.0, |t| (t / MENU_FADE_TIME).clamp(0.0, 1.0))
    }

    /// Island transform; it spins with elapsed time
    pub fn island_matrix(time: f32) -> Mat4 {
        Mat4::model(ISLAND_POSITION, Vec3::ONE, Vec3::new(0.0, 0.0, time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_then_start() {
        let mut menu = Menu::new();
        let mut camera = Camera::default();
        assert_eq!(menu.update(&mut camera, false, 0.1), MenuEvent::None);
        assert_eq!(menu.fade_amount(), 0.0);

        assert_eq!(menu.update(&mut camera, true, 0.1), MenuEvent::None);
        for _ in 0..5 {
            assert_eq!(menu.update(&mut camera, false, 0.1), MenuEvent::None);
        }
        assert!((menu.fade_amount() - 0.5).abs() < 0.01);

        let remaining = (1..=7).find(|_| menu.update(&mut camera, false, 0.1) == MenuEvent::StartGame);
        assert!(matches!(remaining, Some(5) | Some(6)));
        assert_eq!(menu.fade_amount(), 0.0);
    }

    #[test]
    fn test_camera_orbits_origin() {
        let mut menu = Menu::new();
        let mut camera = Camera::default();
        for _ in 0..200 {
            menu.update(&mut camera, false, 0.05);
        }
        assert!((camera.eyes.z - ORBIT_HEIGHT).abs() < 0.01);
        assert!((camera.yaw - FRAC_PI_4).abs() < 0.01);
    }
}
