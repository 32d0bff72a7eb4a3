//! Best times, persisted as RON
//!
//! A save that cannot be read is never fatal: the game warns and starts
//! from an empty record.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::error::AssetError;

pub const SAVE_VERSION: u32 = 1;

/// Bests for one level, in seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelScores {
    /// Best split for each checkpoint, in checkpoint order
    pub checkpoint_best: Vec<f32>,
    pub best_time: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub levels: BTreeMap<String, LevelScores>,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            levels: BTreeMap::new(),
        }
    }
}

impl SaveData {
    /// Read a save file. Missing, unreadable or outdated saves give an empty record.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Could not read save {}: {}", path.display(), e);
                return Self::default();
            }
        };
        Self::from_ron(&contents).unwrap_or_else(|e| {
            log::warn!("Ignoring save {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn from_ron(s: &str) -> Result<Self, String> {
        let save: SaveData = ron::from_str(s).map_err(|e| e.to_string())?;
        if save.version != SAVE_VERSION {
            return Err(format!("version {} (expected {})", save.version, SAVE_VERSION));
        }
        Ok(save)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), AssetError> {
        let path = path.as_ref();
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?;
        fs::write(path, contents).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Saved best times to {}", path.display());
        Ok(())
    }

    pub fn scores(&self, level: &str) -> Option<&LevelScores> {
        self.levels.get(level)
    }

    /// Merge a finished run, keeping the minimum of each split and of the total.
    /// Returns true when `total` is a new best.
    pub fn set_scores(&mut self, level: &str, splits: &[f32], total: f32) -> bool {
        let scores = self.levels.entry(level.to_string()).or_default();
        for (i, &split) in splits.iter().enumerate() {
            match scores.checkpoint_best.get_mut(i) {
                Some(best) => *best = best.min(split),
                None => scores.checkpoint_best.push(split),
            }
        }
        let new_best = scores.best_time.map_or(true, |best| total < best);
        if new_best {
            scores.best_time = Some(total);
        }
        new_best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_is_best() {
        let mut save = SaveData::default();
        assert!(save.set_scores("tutorial", &[3.0, 7.5], 12.0));
        let scores = save.scores("tutorial").unwrap();
        assert_eq!(scores.checkpoint_best, vec![3.0, 7.5]);
        assert_eq!(scores.best_time, Some(12.0));
    }

    #[test]
    fn test_slower_run_keeps_bests() {
        let mut save = SaveData::default();
        save.set_scores("tutorial", &[3.0, 7.5], 12.0);
        assert!(!save.set_scores("tutorial", &[2.5, 8.0], 13.0));
        let scores = save.scores("tutorial").unwrap();
        assert_eq!(scores.checkpoint_best, vec![2.5, 7.5]);
        assert_eq!(scores.best_time, Some(12.0));
        assert!(save.set_scores("tutorial", &[], 11.0));
    }

    #[test]
    fn test_text_round_trip() {
        let mut save = SaveData::default();
        save.set_scores("tutorial", &[1.0], 2.0);
        let text = ron::ser::to_string(&save).unwrap();
        assert_eq!(SaveData::from_ron(&text).unwrap(), save);
    }

    #[test]
    fn test_wrong_version_rejected() {
        assert!(SaveData::from_ron("(version: 7, levels: {})").is_err());
        assert!(SaveData::from_ron("garbage").is_err());
    }

    #[test]
    fn test_missing_save_is_empty() {
        let save = SaveData::load("no/such/game.sav");
        assert_eq!(save, SaveData::default());
    }
}
