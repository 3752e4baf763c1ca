//! Path management for arena files.
//!
//! Directories are resolved with the `dirs` crate so they follow the
//! platform conventions (XDG on Linux, `Application Support` on macOS, ...).

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    ConfigDirNotFound,
    /// The platform data directory could not be determined.
    DataDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
            PathError::DataDirNotFound => write!(f, "Cannot find data directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for arena.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/arena/             # Config directory
/// └── config.toml              # ArenaSettings
///
/// ~/.local/share/arena/        # Data directory
/// └── games.json               # Persisted games document
/// ```
pub struct ArenaPaths;

impl ArenaPaths {
    const APP_DIR: &'static str = "arena";

    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::DataDirNotFound)
    }

    /// Returns the path to the settings file (`config.toml`).
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default path of the games document (`games.json`).
    pub fn games_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("games.json"))
    }
}
