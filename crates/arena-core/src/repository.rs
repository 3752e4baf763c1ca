//! Games repository trait.
//!
//! Defines the interface for persisting the games document.

use crate::document::GamesDocument;
use crate::error::Result;

/// An abstract store for the games document.
///
/// Decouples the registry from the storage mechanism (a JSON file, an
/// in-memory map in tests, ...).
///
/// # Implementation Notes
///
/// - `load` on a store that does not exist yet should create it empty and
///   return an empty document.
/// - Failures are reported as `ArenaError::Load` / `ArenaError::Save`.
pub trait GamesRepository: Send + Sync {
    /// Reads the whole document.
    fn load(&self) -> Result<GamesDocument>;

    /// Replaces the whole document.
    fn save(&self, document: &GamesDocument) -> Result<()>;
}
