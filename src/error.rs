/// Startup and surface errors.
///
/// Nothing inside a running session can fail; everything here is fatal.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::assets::AssetId;

#[derive(Debug)]
pub enum GameError {
    /// Terminal or filesystem I/O
    Io(io::Error),
    /// Settings file present but unreadable or malformed
    Settings { path: PathBuf, reason: String },
    /// Missing or corrupt sprite
    Asset {
        id: AssetId,
        path: PathBuf,
        reason: String,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Io(e) => write!(f, "I/O error: {}", e),
            GameError::Settings { path, reason } => {
                write!(f, "bad settings file {}: {}", path.display(), reason)
            }
            GameError::Asset { id, path, reason } => {
                write!(f, "cannot load {:?} asset from {}: {}", id, path.display(), reason)
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GameError {
    fn from(e: io::Error) -> Self {
        GameError::Io(e)
    }
}
