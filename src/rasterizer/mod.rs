//! Software 3D renderer
//!
//! Features:
//! - Growable triangle lists refilled every frame
//! - Whole-triangle frustum culling (no clipping)
//! - Painter's algorithm instead of a depth buffer
//! - Affine texture mapping from a single atlas (PS1 warping)
//! - Optional vertex snapping (PS1 jitter)

mod math;
mod types;
mod triangle_list;
mod cull;
mod sort;
mod render;
mod pipeline;

pub use math::*;
pub use types::*;
pub use triangle_list::*;
pub use cull::*;
pub use sort::*;
pub use render::*;
pub use pipeline::*;

/// Logical render target size
pub const WIDTH: usize = 256;
pub const HEIGHT: usize = 224;
