//! Walls and moving platforms

use std::rc::Rc;
use crate::rasterizer::Vec3;
use super::geometry::{Hitbox, Model};

/// Back-and-forth motion between two waypoints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    pub start: Vec3,
    pub end: Vec3,
    /// Seconds to travel from start to end
    pub move_time: f32,
    /// Rest at each end, as a multiple of `move_time`
    pub stay_time: f32,
    /// Normalized progress; 0..1 is travel, 1..1+stay is resting
    pub time: f32,
}

impl Oscillation {
    pub fn new(end: Vec3, move_time: f32, stay_time: f32) -> Self {
        Self {
            start: Vec3::ZERO,
            end,
            move_time,
            stay_time,
            time: 0.0,
        }
    }
}

/// Solid geometry the player collides with
#[derive(Debug, Clone)]
pub struct Wall {
    pub position: Vec3,
    pub velocity: Vec3,
    pub hitbox: Hitbox,
    pub model: Rc<Model>,
    pub motion: Option<Oscillation>,
}

impl Wall {
    /// Static wall. The hitbox comes from the model, or is empty for a model without vertices.
    pub fn new(model: Rc<Model>, position: Vec3) -> Self {
        let hitbox = model.hitbox().unwrap_or_default();
        Self {
            position,
            velocity: Vec3::ZERO,
            hitbox,
            model,
            motion: None,
        }
    }

    pub fn with_hitbox(mut self, hitbox: Hitbox) -> Self {
        self.hitbox = hitbox;
        self
    }

    pub fn with_motion(mut self, motion: Oscillation) -> Self {
        self.motion = Some(motion);
        self
    }

    /// World-space height of the top surface
    pub fn top(&self) -> f32 {
        self.position.z + self.hitbox.max.z
    }

    /// Advance the oscillation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        if motion.move_time <= 0.0 {
            return;
        }

        motion.time += dt / motion.move_time;
        self.velocity = if motion.time < 1.0 {
            (motion.end - motion.start) * (1.0 / motion.move_time)
        } else {
            Vec3::ZERO
        };
        self.position = self.position + self.velocity * dt;

        if motion.time > 1.0 + motion.stay_time {
            std::mem::swap(&mut motion.start, &mut motion.end);
            motion.time = 0.0;
        }
    }
}
