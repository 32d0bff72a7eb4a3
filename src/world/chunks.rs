//! Spatial chunks
//!
//! World (x, y) is projected onto the diagonal axis and bucketed by distance
//! along it. A wall or checkpoint is placed in one chunk when it is added and
//! stays there even if it later moves. Proximity queries only look at the
//! querying position's chunk and its two neighbours.

use std::f32::consts::SQRT_2;
use std::rc::Rc;
use crate::rasterizer::Vec3;
use super::arena::SlotArena;
use super::geometry::{collision, Hitbox, Model};
use super::wall::Wall;

/// Distance along the diagonal covered by one chunk
pub const CHUNK_WIDTH: f32 = 16.0;

/// Largest coordinate magnitude a level may place anything at
pub const WORLD_LIMIT: f32 = 16384.0;

/// Chunk indices are clamped below this, whatever the position
pub const MAX_CHUNKS: usize = 2048;

/// Chunk holding a world position. Anything behind the origin lands in chunk 0,
/// anything past the last chunk lands in the last one.
pub fn chunk_index(x: f32, y: f32) -> usize {
    let along = ((x + y) / SQRT_2).max(0.0);
    ((along / CHUNK_WIDTH).floor() as usize).min(MAX_CHUNKS - 1)
}

/// Finite and within `WORLD_LIMIT` on every axis
pub fn in_world(position: Vec3) -> bool {
    [position.x, position.y, position.z]
        .iter()
        .all(|c| c.abs() <= WORLD_LIMIT)
}

/// Stable reference to a wall: its chunk and slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WallHandle {
    pub chunk: usize,
    pub slot: usize,
}

/// Flag the player has to touch, in order
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub position: Vec3,
    pub order: usize,
    pub hitbox: Hitbox,
    pub model: Rc<Model>,
}

#[derive(Debug, Clone, Default)]
pub struct Chunk {
    pub walls: SlotArena<Wall>,
    pub checkpoints: SlotArena<Checkpoint>,
}

/// All collidable level content
#[derive(Debug, Clone, Default)]
pub struct World {
    chunks: Vec<Chunk>,
    most_recent_wall: Option<WallHandle>,
    checkpoint_count: usize,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunk by index, created on demand. Chunks are never dropped.
    fn chunk_mut(&mut self, index: usize) -> &mut Chunk {
        if index >= self.chunks.len() {
            self.chunks.resize_with(index + 1, Chunk::default);
        }
        &mut self.chunks[index]
    }

    /// Chunk indices searched around a position
    fn window(&self, position: Vec3) -> std::ops::Range<usize> {
        let center = chunk_index(position.x, position.y);
        let end = (center + 2).min(self.chunks.len());
        center.saturating_sub(1).min(end)..end
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Insert a wall into the chunk of its current position.
    /// Oscillating walls start their first leg from here.
    pub fn add_wall(&mut self, mut wall: Wall) -> WallHandle {
        if let Some(motion) = wall.motion.as_mut() {
            motion.start = wall.position;
            motion.time = 0.0;
        }
        let chunk = chunk_index(wall.position.x, wall.position.y);
        let slot = self.chunk_mut(chunk).walls.insert(wall);
        WallHandle { chunk, slot }
    }

    /// Mark a wall's slot inactive
    pub fn remove_wall(&mut self, handle: WallHandle) -> Option<Wall> {
        if self.most_recent_wall == Some(handle) {
            self.most_recent_wall = None;
        }
        self.chunks.get_mut(handle.chunk)?.walls.remove(handle.slot)
    }

    pub fn wall(&self, handle: WallHandle) -> Option<&Wall> {
        self.chunks.get(handle.chunk)?.walls.get(handle.slot)
    }

    pub fn walls(&self) -> impl Iterator<Item = (WallHandle, &Wall)> {
        self.chunks.iter().enumerate().flat_map(|(chunk, c)| {
            c.walls.iter().map(move |(slot, wall)| (WallHandle { chunk, slot }, wall))
        })
    }

    pub fn wall_count(&self) -> usize {
        self.chunks.iter().map(|c| c.walls.len()).sum()
    }

    /// First active wall near `position` whose box overlaps `hitbox` placed there.
    /// A hit is also remembered as the most recent wall.
    pub fn touching_wall(&mut self, hitbox: &Hitbox, position: Vec3) -> Option<WallHandle> {
        let hit = self.window(position).find_map(|chunk| {
            self.chunks[chunk]
                .walls
                .iter()
                .find(|(_, wall)| collision(hitbox, position, &wall.hitbox, wall.position))
                .map(|(slot, _)| WallHandle { chunk, slot })
        })?;
        self.most_recent_wall = Some(hit);
        Some(hit)
    }

    /// Wall recorded by the last successful `touching_wall`
    pub fn most_recent_wall(&self) -> Option<WallHandle> {
        self.most_recent_wall
    }

    /// Advance every moving wall
    pub fn update(&mut self, dt: f32) {
        for chunk in &mut self.chunks {
            for wall in chunk.walls.iter_mut() {
                wall.update(dt);
            }
        }
    }

    /// Add the next checkpoint in order; returns its order index
    pub fn add_checkpoint(&mut self, position: Vec3, model: Rc<Model>) -> usize {
        let order = self.checkpoint_count;
        let checkpoint = Checkpoint {
            position,
            order,
            hitbox: model.hitbox().unwrap_or_default(),
            model,
        };
        self.chunk_mut(chunk_index(position.x, position.y)).checkpoints.insert(checkpoint);
        self.checkpoint_count += 1;
        order
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoint_count
    }

    pub fn checkpoints(&self) -> impl Iterator<Item = &Checkpoint> {
        self.chunks.iter().flat_map(|c| c.checkpoints.iter().map(|(_, cp)| cp))
    }

    /// Order index of a checkpoint near `position` overlapping `hitbox`
    pub fn touching_checkpoint(&self, hitbox: &Hitbox, position: Vec3) -> Option<usize> {
        self.window(position).find_map(|chunk| {
            self.chunks[chunk]
                .checkpoints
                .iter()
                .find(|(_, cp)| collision(hitbox, position, &cp.hitbox, cp.position))
                .map(|(_, cp)| cp.order)
        })
    }
}
