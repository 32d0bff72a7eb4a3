//! Runtime configuration
//!
//! Read from `config.ron` in the working directory. Every field has a
//! default, so the file may list only what it overrides or be absent.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use crate::error::AssetError;
use crate::rasterizer::{Projection, RasterSettings, HEIGHT, WIDTH};

pub const CONFIG_FILE: &str = "config.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical render target size
    pub width: usize,
    pub height: usize,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// PS1 vertex jitter
    pub vertex_snap: bool,
    pub asset_dir: PathBuf,
    /// Level document, relative to `asset_dir`
    pub level: PathBuf,
    pub save_file: PathBuf,
    /// Texture atlas, relative to `asset_dir`. None renders a checkerboard.
    pub atlas: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            vertex_snap: false,
            asset_dir: PathBuf::from("assets"),
            level: PathBuf::from("levels/tutorial.ron"),
            save_file: PathBuf::from("game.sav"),
            atlas: None,
        }
    }
}

impl GameConfig {
    /// Missing file means defaults; an unreadable or malformed one is an error
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No {} found, using default configuration", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&contents)
    }

    pub fn from_ron(s: &str) -> Result<Self, AssetError> {
        Ok(ron::from_str(s)?)
    }

    pub fn projection(&self) -> Projection {
        Projection {
            fov_y_degrees: self.fov,
            near: self.near,
            far: self.far,
        }
    }

    pub fn raster_settings(&self) -> RasterSettings {
        RasterSettings { vertex_snap: self.vertex_snap }
    }

    pub fn asset(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.asset_dir.join(relative)
    }
}
