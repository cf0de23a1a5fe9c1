/// Sprite assets
///
/// Sprites are plain-text glyph grids, one file per asset.  Spaces are
/// transparent.  Every asset is loaded once before the terminal is taken
/// over; a missing or empty file stops the game.

use std::path::{Path, PathBuf};

use crate::error::GameError;
use crate::surface::Rgb;

/// Asset id → file name, in one place
macro_rules! define_assets {
    ($($id:ident => $file:literal, $tint:expr);* $(;)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum AssetId {
            $($id,)*
        }

        impl AssetId {
            pub fn file_name(&self) -> &'static str {
                match self {
                    $(AssetId::$id => $file,)*
                }
            }

            pub fn tint(&self) -> Rgb {
                match self {
                    $(AssetId::$id => $tint,)*
                }
            }
        }
    };
}

define_assets! {
    Background => "bg.txt", Rgb(90, 90, 130);
    Ship => "spaceship.txt", Rgb::WHITE;
    Projectile => "bullet.txt", Rgb(255, 210, 60);
    Icon => "icon.txt", Rgb::WHITE;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    rows: Vec<Vec<char>>,
    /// Glyph colour
    pub tint: Rgb,
}

impl Sprite {
    /// Parse a glyph grid.  Trailing blank lines are dropped; `None` if
    /// nothing visible is left.
    pub fn parse(text: &str) -> Option<Self> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|l| l.trim_end_matches('\r').chars().collect())
            .collect();
        while rows.last().is_some_and(|r| r.iter().all(|c| c.is_whitespace())) {
            rows.pop();
        }
        if rows.is_empty() {
            None
        } else {
            Some(Self {
                rows,
                tint: Rgb::WHITE,
            })
        }
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    /// Width in glyphs of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// First row as a string, trimmed; used for the window title.
    pub fn first_line(&self) -> String {
        self.rows
            .first()
            .map(|r| r.iter().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }
}

/// Everything the renderer blits.
#[derive(Debug, Clone)]
pub struct Assets {
    pub background: Sprite,
    pub ship: Sprite,
    pub projectile: Sprite,
    pub icon: Sprite,
}

pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn path_of(&self, id: AssetId) -> PathBuf {
        self.base_path.join(id.file_name())
    }

    pub fn load(&self, id: AssetId) -> Result<Sprite, GameError> {
        let path = self.path_of(id);
        let text = std::fs::read_to_string(&path).map_err(|e| GameError::Asset {
            id,
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let mut sprite = Sprite::parse(&text).ok_or_else(|| GameError::Asset {
            id,
            path: path.clone(),
            reason: "sprite has no visible glyphs".to_string(),
        })?;
        sprite.tint = id.tint();
        log::debug!(
            "loaded {:?} ({}x{}) from {}",
            id,
            sprite.width(),
            sprite.height(),
            path.display()
        );
        Ok(sprite)
    }

    pub fn load_all(&self) -> Result<Assets, GameError> {
        Ok(Assets {
            background: self.load(AssetId::Background)?,
            ship: self.load(AssetId::Ship)?,
            projectile: self.load(AssetId::Projectile)?,
            icon: self.load(AssetId::Icon)?,
        })
    }
}
