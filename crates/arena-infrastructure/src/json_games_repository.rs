//! JSON file-based implementation of GamesRepository.

use arena_core::document::GamesDocument;
use arena_core::repository::GamesRepository;
use arena_core::{ArenaError, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

use crate::storage::{AtomicJsonError, AtomicJsonFile};

/// Stores the games document in a single JSON file (`games.json`).
///
/// A missing file is created containing `{}` on first load.
pub struct JsonGamesRepository {
    file: AtomicJsonFile<Value>,
}

impl JsonGamesRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicJsonFile::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn file_name(&self) -> String {
        self.path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path().display().to_string())
    }
}

impl GamesRepository for JsonGamesRepository {
    fn load(&self) -> Result<GamesDocument> {
        let existed = self.path().exists();

        let root = self.file.load_or_init(json!({})).map_err(|e| match e {
            AtomicJsonError::JsonError(e) => {
                ArenaError::load(format!("Failed to parse games config file: {}", e))
            }
            other if !existed => {
                ArenaError::load(format!("Failed to create games config file: {}", other))
            }
            other => ArenaError::load(format!("Failed to read games config file: {}", other)),
        })?;

        GamesDocument::from_value(root)
    }

    fn save(&self, document: &GamesDocument) -> Result<()> {
        self.file
            .save(&document.to_value())
            .map_err(|e| ArenaError::save(format!("Failed to write to {}: {}", self.file_name(), e)))?;
        tracing::debug!("Wrote {} game entries to {}", document.len(), self.path().display());
        Ok(())
    }
}
