use serde_json::Value;
use std::any::Any;
use std::collections::BTreeSet;

use super::end_reason::EndReason;
use crate::environment::{EnvironmentId, Location, MembershipEvent, PlayerId};
use crate::error::Result;
use crate::scheduler::FiredTimer;

/// Type-erased view of a game, as held by the registry.
///
/// Every game type produces a `Game<B>` for its own behavior `B`; the
/// registry only ever sees `Box<dyn AnyGame>`.
pub trait AnyGame: Send {
    /// Name of the game type that created this game.
    fn game_type(&self) -> &str;

    fn environment(&self) -> &EnvironmentId;

    fn is_loaded(&self) -> bool;

    fn is_running(&self) -> bool;

    fn has_pending_countdown(&self) -> bool;

    fn is_config_complete(&self) -> bool;

    /// Not running, config complete, and the game type is ready.
    fn can_start(&self) -> bool;

    /// Attaches event handling, then attempts a first countdown.
    fn load_game(&mut self);

    /// Force-ends the game and detaches event handling. Terminal.
    fn unload_game(&mut self);

    fn start_game(&mut self) -> bool;

    fn end_game(&mut self, reason: EndReason) -> bool;

    /// Active participants still present in the environment.
    fn players(&mut self) -> BTreeSet<PlayerId>;

    /// Replaces the spawn point and, when idle, re-attempts a countdown.
    fn set_spawn_point(&mut self, spawn_point: Option<Location>);

    fn handle_membership(&mut self, event: &MembershipEvent);

    fn handle_timer(&mut self, fired: &FiredTimer);

    /// Serializes the config with the game type's codec.
    fn encode_config(&self) -> Result<Value>;

    fn as_any(&self) -> &dyn Any;
}
