//! Core domain of the arena workspace.
//!
//! - [`environment`]: what the lifecycle consumes from the hosting platform
//! - [`scheduler`]: delayed, cancelable timers
//! - [`game`]: the game lifecycle state machine and the hooks of game types
//! - [`game_type`]: game type descriptors and config serialization
//! - [`document`] / [`repository`]: the persisted games document

pub mod document;
pub mod environment;
pub mod error;
pub mod game;
pub mod game_type;
pub mod repository;
pub mod scheduler;

// Re-export common error type
pub use error::{ArenaError, Result};
