//! World module - platforms, checkpoints and collision
//!
//! - Immutable models with cached hitboxes, loaded from OBJ files
//! - Walls and oscillating platforms stored in free-list slots
//! - Diagonal spatial chunks for proximity queries
//! - RON level documents

mod geometry;
mod obj;
mod arena;
mod wall;
mod chunks;
mod level;

pub use geometry::*;
pub use obj::*;
pub use arena::*;
pub use wall::*;
pub use chunks::*;
pub use level::*;
