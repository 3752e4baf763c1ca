//! Application layer of the arena workspace.
//!
//! - [`registry`]: the `GameRegistry` owning every live game
//! - [`runtime`]: the event pump serializing all registry work
//! - [`telemetry`]: tracing setup

pub mod registry;
pub mod runtime;
pub mod telemetry;

pub use registry::GameRegistry;
pub use runtime::{ArenaEvent, ArenaHandle, ArenaRuntime, RegistryTask};
pub use telemetry::init_tracing;
