//! Error types for the arena workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire arena workspace.
///
/// Load and save failures are deliberately coarse: the registry reports a
/// single descriptive message and leaves it to the host to decide whether
/// the process can continue.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArenaError {
    /// The persisted games document could not be loaded.
    #[error("Failed to load games: {message}")]
    Load { message: String },

    /// The persisted games document could not be written.
    #[error("Failed to save games: {message}")]
    Save { message: String },

    /// Two game types were registered under the same name.
    #[error("Game type already registered: {0}")]
    DuplicateGameType(String),

    /// No game type is registered under the requested name.
    #[error("Could not find game type: {0}")]
    UnknownGameType(String),

    /// The platform does not know the requested environment.
    #[error("Environment does not exist: {0}")]
    UnknownEnvironment(String),

    /// A custom type adapter rejected a value.
    #[error("Codec error for {type_name}: {message}")]
    Codec {
        type_name: &'static str,
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON"
        message: String,
    },

    /// Invalid settings
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ArenaError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Load error
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    /// Creates a Save error
    pub fn save(message: impl Into<String>) -> Self {
        Self::Save {
            message: message.into(),
        }
    }

    /// Creates a Codec error
    pub fn codec(type_name: &'static str, message: impl Into<String>) -> Self {
        Self::Codec {
            type_name,
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a load failure
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }

    /// Check if this is a save failure
    pub fn is_save(&self) -> bool {
        matches!(self, Self::Save { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Wraps any error into a load failure, keeping its message.
    ///
    /// Errors that already are load failures pass through unchanged.
    pub fn into_load(self, context: &str) -> Self {
        match self {
            Self::Load { .. } => self,
            other => Self::load(format!("{}: {}", context, other)),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ArenaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ArenaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ArenaError>`.
pub type Result<T> = std::result::Result<T, ArenaError>;
