//! Player physics
//!
//! One `tick` per frame. The step order matters: ground check, steering,
//! platform riding, horizontal moves per axis, landing squash, jump, gravity,
//! vertical move with landing snap, animation timers, and finally being
//! pushed by a wall that moved into the player.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use crate::rasterizer::{Mat4, Vec3};
use crate::world::{Hitbox, World};

/// Speed gained per second of held input, per tick
pub const ACCELERATION: f32 = 0.3;
pub const TOP_SPEED: f32 = 8.0;
pub const FRICTION: f32 = 0.8;
pub const GRAVITY: f32 = 9.8 * 9.8;
pub const TERMINAL_VELOCITY: f32 = -30.0;
pub const JUMP_SPEED: f32 = 35.0;
pub const JUMP_DURATION: f32 = 0.3;
pub const SQUISH_DURATION: f32 = 0.3;
/// Landing faster than this (downwards) squashes the model
pub const SQUISH_TRIGGER: f32 = -8.0;
pub const GROUND_PROBE: f32 = 0.1;
pub const RIDE_CLEARANCE: f32 = 0.05;
pub const LANDING_CLEARANCE: f32 = 0.1;
pub const CEILING: f32 = 999.0;
pub const TURN_RATE: f32 = 10.0;

/// What the player was told to do this tick
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// (right - left, forward - back)
    pub movement: (f32, f32),
    /// Jump edge press
    pub jump: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    pub velocity_z: f32,
    /// Horizontal distance covered per tick
    pub speed: f32,
    /// Movement heading in radians
    pub direction: f32,
    /// Heading the model is drawn with, eased toward `direction`
    pub draw_direction: f32,
    pub jump_timer: f32,
    pub squish_timer: f32,
    /// Vertical stretch of the model; 1 at rest
    pub z_scale: f32,
    pub on_ground_last_frame: bool,
    pub hitbox: Hitbox,
}

fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(TAU)
}

impl Player {
    pub fn new(position: Vec3, hitbox: Hitbox) -> Self {
        Self {
            position,
            velocity_z: 0.0,
            speed: 0.0,
            direction: 0.0,
            draw_direction: 0.0,
            jump_timer: 0.0,
            squish_timer: 0.0,
            z_scale: 1.0,
            on_ground_last_frame: true,
            hitbox,
        }
    }

    fn touching(&self, world: &mut World, position: Vec3) -> bool {
        world.touching_wall(&self.hitbox, position).is_some()
    }

    /// Advance one tick. `camera_yaw` orients the directional input.
    pub fn tick(&mut self, world: &mut World, input: PlayerInput, camera_yaw: f32, dt: f32) {
        // Ground: the floor, or a wall just under the feet
        let wall_below = if self.position.z <= 0.0 {
            None
        } else {
            let probe = self.position - Vec3::new(0.0, 0.0, GROUND_PROBE);
            world.touching_wall(&self.hitbox, probe)
        };
        let on_ground = self.position.z <= 0.0 || wall_below.is_some();

        // Steering relative to the camera
        let (ix, iy) = input.movement;
        if ix != 0.0 || iy != 0.0 {
            self.direction = camera_yaw - ix.atan2(iy);
            self.speed = (self.speed + ACCELERATION * dt).clamp(0.0, TOP_SPEED * dt);
        } else {
            self.speed = (self.speed - FRICTION * dt).max(0.0);
        }
        let mut step_x = self.direction.cos() * self.speed;
        let mut step_y = self.direction.sin() * self.speed;

        // Ride the platform underfoot
        if on_ground {
            if let Some(wall) = wall_below.and_then(|h| world.wall(h)) {
                step_x += wall.velocity.x * dt;
                step_y += wall.velocity.y * dt;
                self.position.z = wall.top() + RIDE_CLEARANCE;
            }
        }

        // Each axis separately so walls can be slid along
        let moved_x = self.position + Vec3::new(step_x, 0.0, 0.0);
        if !self.touching(world, moved_x) {
            self.position = moved_x;
        }
        let moved_y = self.position + Vec3::new(0.0, step_y, 0.0);
        if !self.touching(world, moved_y) {
            self.position = moved_y;
        }

        if on_ground && !self.on_ground_last_frame && self.velocity_z < SQUISH_TRIGGER {
            self.squish_timer = SQUISH_DURATION;
        }
        if on_ground {
            self.velocity_z = 0.0;
        }

        if input.jump && on_ground {
            self.jump_timer = JUMP_DURATION;
            self.velocity_z = JUMP_SPEED;
        }
        if self.jump_timer > 0.0 {
            self.jump_timer -= dt;
            let x = self.jump_timer / JUMP_DURATION;
            self.z_scale = 1.0 + (1.0 - (2.0 * x - 1.0).powi(2)) * 0.3;
        } else {
            self.z_scale = 1.0;
        }

        if !on_ground {
            self.velocity_z = (self.velocity_z - GRAVITY * dt).max(TERMINAL_VELOCITY);
        }

        // Vertical move, landing neatly on whatever blocks it
        let target = self.position + Vec3::new(0.0, 0.0, self.velocity_z * dt);
        match world.touching_wall(&self.hitbox, target) {
            None => self.position.z = target.z.clamp(0.0, CEILING),
            Some(handle) => {
                if let Some(top) = world.wall(handle).map(|w| w.top()) {
                    if top < self.position.z {
                        self.position.z = top + LANDING_CLEARANCE;
                    }
                }
            }
        }

        if self.squish_timer > 0.0 {
            let percent = self.squish_timer / SQUISH_DURATION;
            self.squish_timer -= dt;
            self.z_scale = 1.0 - (1.0 - (2.0 * percent - 1.0).powi(2)) * 0.6;
        }

        self.on_ground_last_frame = on_ground;

        // Shoved by a wall that moved into us
        if let Some(handle) = world.touching_wall(&self.hitbox, self.position) {
            if let Some(wall) = world.wall(handle) {
                self.position = self.position + wall.velocity * dt;
            }
        }
    }

    /// Ease the drawn heading toward the movement heading along the short way round
    pub fn smooth_facing(&mut self, dt: f32) {
        self.draw_direction = wrap_angle(self.draw_direction);
        self.direction = wrap_angle(self.direction);
        let mut difference = self.direction - self.draw_direction;
        if difference > PI {
            difference -= TAU;
        } else if difference < -PI {
            difference += TAU;
        }
        self.draw_direction = wrap_angle(self.draw_direction + difference * TURN_RATE * dt);
    }

    /// Squash and stretch keep the volume roughly constant
    pub fn model_matrix(&self) -> Mat4 {
        let s = self.z_scale;
        Mat4::model(
            self.position,
            Vec3::new(1.0 / s, 1.0 / s, s),
            Vec3::new(0.0, 0.0, self.draw_direction + FRAC_PI_2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use crate::rasterizer::Vertex;
    use crate::world::{Model, Oscillation, Wall};

    fn player_box() -> Hitbox {
        Hitbox::new(Vec3::new(-0.5, -0.5, 0.0), Vec3::new(0.5, 0.5, 1.0))
    }

    /// 2x2 slab, half a unit tall
    fn platform() -> Rc<Model> {
        Rc::new(Model::new(&[
            Vertex::from_pos(-1.0, -1.0, 0.0),
            Vertex::from_pos(1.0, 1.0, 0.5),
            Vertex::from_pos(1.0, -1.0, 0.0),
        ]).unwrap())
    }

    fn idle() -> PlayerInput {
        PlayerInput::default()
    }

    #[test]
    fn test_falling_player_lands_on_top_surface() {
        let mut world = World::new();
        world.add_wall(Wall::new(platform(), Vec3::new(0.0, 0.0, 2.0)));
        let mut player = Player::new(Vec3::new(0.0, 0.0, 3.0), player_box());
        player.velocity_z = TERMINAL_VELOCITY;
        player.on_ground_last_frame = false;

        player.tick(&mut world, idle(), 0.0, 0.05);
        assert!((player.position.z - (2.0 + 0.5 + LANDING_CLEARANCE)).abs() < 0.001);

        // Next tick it is grounded and the landing squash starts
        player.tick(&mut world, idle(), 0.0, 0.05);
        assert_eq!(player.velocity_z, 0.0);
        assert!(player.squish_timer > 0.0);
        player.tick(&mut world, idle(), 0.0, 0.05);
        assert!(player.z_scale < 1.0);
        assert!((player.position.z - (2.5 + RIDE_CLEARANCE)).abs() < 0.001);
    }

    #[test]
    fn test_floor_stops_fall() {
        let mut world = World::new();
        let mut player = Player::new(Vec3::new(0.0, 0.0, 0.2), player_box());
        player.velocity_z = -20.0;
        player.tick(&mut world, idle(), 0.0, 0.05);
        assert_eq!(player.position.z, 0.0);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut world = World::new();
        let mut player = Player::new(Vec3::ZERO, player_box());
        let jump = PlayerInput { movement: (0.0, 0.0), jump: true };

        player.tick(&mut world, jump, 0.0, 0.05);
        assert_eq!(player.velocity_z, JUMP_SPEED);
        assert!((player.position.z - JUMP_SPEED * 0.05).abs() < 0.001);
        assert!(player.z_scale > 1.0);

        // Airborne: pressing again does nothing, gravity applies
        player.tick(&mut world, jump, 0.0, 0.05);
        assert!(player.velocity_z < JUMP_SPEED);
    }

    #[test]
    fn test_input_relative_to_camera() {
        let mut world = World::new();
        let mut player = Player::new(Vec3::ZERO, player_box());
        let right = PlayerInput { movement: (1.0, 0.0), jump: false };
        for _ in 0..10 {
            player.tick(&mut world, right, 0.0, 0.05);
        }
        // Camera looking down +X: screen right is -Y
        assert!(player.position.y < -0.1);
        assert!(player.position.x.abs() < 0.001);
        assert!(player.speed <= TOP_SPEED * 0.05 + 0.0001);
    }

    #[test]
    fn test_friction_stops_player() {
        let mut world = World::new();
        let mut player = Player::new(Vec3::ZERO, player_box());
        player.speed = 0.1;
        for _ in 0..5 {
            player.tick(&mut world, idle(), 0.0, 0.05);
        }
        assert_eq!(player.speed, 0.0);
    }

    #[test]
    fn test_slides_along_wall() {
        let mut world = World::new();
        // Tall block directly ahead on +X
        world.add_wall(Wall::new(platform(), Vec3::new(1.55, 0.0, 0.0)).with_hitbox(Hitbox::new(
            Vec3::new(-1.0, -5.0, 0.0),
            Vec3::new(1.0, 5.0, 5.0),
        )));
        let mut player = Player::new(Vec3::ZERO, player_box());
        player.direction = std::f32::consts::FRAC_PI_4;
        player.speed = 0.1;
        // Forward on a camera yawed 45 degrees: diagonal into the wall
        let forward = PlayerInput { movement: (0.0, 1.0), jump: false };
        player.tick(&mut world, forward, std::f32::consts::FRAC_PI_4, 0.05);
        player.tick(&mut world, forward, std::f32::consts::FRAC_PI_4, 0.05);
        assert!(player.position.x < 0.06);
        assert!(player.position.y > 0.1);
    }

    #[test]
    fn test_rides_moving_platform() {
        let mut world = World::new();
        let handle = world.add_wall(
            Wall::new(platform(), Vec3::ZERO).with_motion(Oscillation::new(Vec3::new(4.0, 0.0, 0.0), 2.0, 0.0)),
        );
        world.update(0.05);
        let wall_x = world.wall(handle).unwrap().position.x;

        let mut player = Player::new(Vec3::new(0.0, 0.0, 0.55), player_box());
        player.tick(&mut world, idle(), 0.0, 0.05);
        assert!((player.position.x - wall_x).abs() < 0.001);
        assert!((player.position.z - (0.5 + RIDE_CLEARANCE)).abs() < 0.001);
    }

    #[test]
    fn test_pushed_by_wall_moving_into_player() {
        let mut world = World::new();
        let handle = world.add_wall(
            Wall::new(platform(), Vec3::new(-1.5, 0.0, 0.0))
                .with_motion(Oscillation::new(Vec3::new(3.0, 0.0, 0.0), 1.0, 0.0)),
        );
        world.update(0.1);
        assert!(world.wall(handle).unwrap().position.x > -1.5);

        let mut player = Player::new(Vec3::new(0.0, 0.0, 0.0), player_box());
        player.tick(&mut world, idle(), 0.0, 0.1);
        assert!(player.position.x > 0.0);
    }

    #[test]
    fn test_facing_turns_short_way_round() {
        let mut player = Player::new(Vec3::ZERO, player_box());
        player.draw_direction = 0.05;
        player.direction = TAU - 0.3;
        player.smooth_facing(0.05);
        // Moved backwards through zero, not forwards through PI
        assert!(player.draw_direction > PI);
        assert!((player.draw_direction - (TAU - 0.125)).abs() < 0.001);
    }
}
