/// Game settings
///
/// Read once at startup from an optional JSON file; every field may be
/// omitted and falls back to the defaults below.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TARGET_FPS;
use crate::error::GameError;

/// Default settings file, looked up in the working directory
pub const SETTINGS_FILE: &str = "hell_space.json";

const MAX_FPS: u32 = 240;

/// Round tuning: how tough the block is and how much slack the player gets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Smallest starting hit-count (inclusive)
    pub hit_count_min: u32,
    /// Largest starting hit-count (inclusive)
    pub hit_count_max: u32,
    /// Shots handed out on top of the block's hit-count
    pub spare_ammo: u32,
    /// Block descent per frame, in world units
    pub block_descent: f32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            hit_count_min: 5,
            hit_count_max: 31,
            spare_ammo: 5,
            // 45 units per 360 frames
            block_descent: 0.125,
        }
    }
}

impl GameRules {
    /// Pull out-of-range values back into something playable.
    pub fn clamped(&self) -> Self {
        let hit_count_min = self.hit_count_min.max(1);
        let hit_count_max = self.hit_count_max.max(hit_count_min);
        let block_descent = if self.block_descent.is_finite() {
            self.block_descent.max(0.0)
        } else {
            Self::default().block_descent
        };
        Self {
            hit_count_min,
            hit_count_max,
            spare_ammo: self.spare_ammo,
            block_descent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frames per second for both update and render
    pub fps: u32,
    /// Directory holding the text sprites
    pub assets_dir: PathBuf,
    /// Log destination (the terminal itself is busy drawing the game)
    pub log_file: PathBuf,
    pub rules: GameRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: TARGET_FPS,
            assets_dir: PathBuf::from("assets"),
            log_file: PathBuf::from("hell_space.log"),
            rules: GameRules::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`.  A missing file yields the defaults; a file
    /// that exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(GameError::Settings {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };
        Self::from_json(&json).map_err(|reason| GameError::Settings {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str::<Settings>(json)
            .map(|s| s.clamped())
            .map_err(|e| e.to_string())
    }

    pub fn clamped(&self) -> Self {
        Self {
            fps: self.fps.clamp(1, MAX_FPS),
            assets_dir: self.assets_dir.clone(),
            log_file: self.log_file.clone(),
            rules: self.rules.clamped(),
        }
    }
}
