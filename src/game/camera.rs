//! Camera follow and orbit

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use crate::rasterizer::{Camera, Vec3};

pub const FOLLOW_DISTANCE: f32 = 12.0;
pub const FOLLOW_HEIGHT: f32 = 8.0;
pub const EASE_RATE: f32 = 4.0;
/// Offset a fresh session starts the camera at, so it swoops down
pub const SWOOP_OFFSET: Vec3 = Vec3::new(-8.0, -8.0, 1000.0);

/// Point `distance` behind `target` along `angle`, raised by `height`
pub fn orbit_point(target: Vec3, angle: f32, distance: f32, height: f32) -> Vec3 {
    Vec3::new(
        target.x - distance * angle.cos(),
        target.y - distance * angle.sin(),
        target.z + height,
    )
}

/// Move the eye part of the way toward `goal` and aim at `look_at`
pub fn ease_camera(camera: &mut Camera, goal: Vec3, look_at: Vec3, dt: f32) {
    let t = (EASE_RATE * dt).min(1.0);
    camera.eyes = camera.eyes + (goal - camera.eyes) * t;
    camera.aim_at(look_at);
}

/// Third-person rig that turns in quarter steps around the player
#[derive(Debug, Clone)]
pub struct FollowCamera {
    pub look_angle: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self { look_angle: FRAC_PI_4 }
    }
}

impl FollowCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the camera high above `target` for the opening swoop
    pub fn start(&mut self, camera: &mut Camera, target: Vec3) {
        self.look_angle = FRAC_PI_4;
        camera.eyes = target + SWOOP_OFFSET;
        camera.aim_at(target);
    }

    pub fn turn_left(&mut self) {
        self.look_angle += FRAC_PI_2;
    }

    pub fn turn_right(&mut self) {
        self.look_angle -= FRAC_PI_2;
    }

    pub fn follow(&self, camera: &mut Camera, target: Vec3, dt: f32) {
        let goal = orbit_point(target, self.look_angle, FOLLOW_DISTANCE, FOLLOW_HEIGHT);
        ease_camera(camera, goal, target, dt);
    }
}
