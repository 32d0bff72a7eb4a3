//! Level loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable level files. A level
//! document lists wall placements and checkpoints by model name; `build`
//! resolves the names against a `ModelStore` and fills a `World`.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::rasterizer::Vec3;
use super::chunks::{in_world, World, WORLD_LIMIT};
use super::geometry::ModelStore;
use super::wall::{Oscillation, Wall};

/// Error type for level loading
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    UnknownModel(String),
    InvalidWall { index: usize, reason: String },
    OutOfBounds { what: String, position: Vec3 },
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl From<ron::Error> for LevelError {
    fn from(e: ron::Error) -> Self {
        LevelError::SerializeError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            LevelError::UnknownModel(name) => write!(f, "Unknown model: {}", name),
            LevelError::InvalidWall { index, reason } => write!(f, "Wall {}: {}", index, reason),
            LevelError::OutOfBounds { what, position } => write!(
                f,
                "{} at ({}, {}, {}) is outside the world (limit {})",
                what, position.x, position.y, position.z, WORLD_LIMIT
            ),
        }
    }
}

impl std::error::Error for LevelError {}

fn default_checkpoint_model() -> String {
    "flag".to_string()
}

/// Waypoint motion of a platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionDef {
    pub end: Vec3,
    pub move_time: f32,
    /// Rest at each end, in multiples of `move_time`
    #[serde(default)]
    pub stay_time: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallDef {
    pub model: String,
    pub position: Vec3,
    #[serde(default)]
    pub motion: Option<MotionDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointDef {
    pub position: Vec3,
    #[serde(default = "default_checkpoint_model")]
    pub model: String,
}

/// On-disk level document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    #[serde(default)]
    pub player_start: Vec3,
    #[serde(default)]
    pub walls: Vec<WallDef>,
    /// Touched in list order; the last one finishes the level
    #[serde(default)]
    pub checkpoints: Vec<CheckpointDef>,
}

impl LevelData {
    /// Resolve models and populate a fresh world
    pub fn build(&self, models: &ModelStore) -> Result<World, LevelError> {
        let mut world = World::new();
        check_position("Player start".to_string(), self.player_start)?;

        for (index, def) in self.walls.iter().enumerate() {
            let model = models
                .get(&def.model)
                .ok_or_else(|| LevelError::UnknownModel(def.model.clone()))?;
            check_position(format!("Wall {}", index), def.position)?;
            let mut wall = Wall::new(model, def.position);

            if let Some(motion) = &def.motion {
                if motion.move_time.is_nan() || motion.move_time <= 0.0 {
                    return Err(LevelError::InvalidWall {
                        index,
                        reason: format!("move_time must be positive, got {}", motion.move_time),
                    });
                }
                if !motion.stay_time.is_finite() || motion.stay_time < 0.0 {
                    return Err(LevelError::InvalidWall {
                        index,
                        reason: format!("stay_time must be zero or more, got {}", motion.stay_time),
                    });
                }
                check_position(format!("Wall {} end point", index), motion.end)?;
                wall = wall.with_motion(Oscillation::new(motion.end, motion.move_time, motion.stay_time));
            }
            world.add_wall(wall);
        }

        for (index, def) in self.checkpoints.iter().enumerate() {
            let model = models
                .get(&def.model)
                .ok_or_else(|| LevelError::UnknownModel(def.model.clone()))?;
            check_position(format!("Checkpoint {}", index), def.position)?;
            world.add_checkpoint(def.position, model);
        }

        log::debug!(
            "Level {}: {} walls, {} checkpoints across {} chunks",
            self.name,
            world.wall_count(),
            world.checkpoint_count(),
            world.chunk_count()
        );
        Ok(world)
    }
}

fn check_position(what: String, position: Vec3) -> Result<(), LevelError> {
    if in_world(position) {
        Ok(())
    } else {
        Err(LevelError::OutOfBounds { what, position })
    }
}

/// Load a level from a RON file
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<LevelData, LevelError> {
    let contents = fs::read_to_string(path)?;
    load_level_from_str(&contents)
}

/// Save a level to a RON file
pub fn save_level<P: AsRef<Path>>(level: &LevelData, path: P) -> Result<(), LevelError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(level, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load a level from a RON string (for embedded levels or testing)
pub fn load_level_from_str(s: &str) -> Result<LevelData, LevelError> {
    Ok(ron::from_str(s)?)
}
