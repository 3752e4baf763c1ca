//! The hosting platform as seen by games.

use super::model::{EnvironmentId, GameMode, Location, Notice, PlayerId, Title};

/// Everything a game needs from the world it runs in.
///
/// This trait decouples the lifecycle logic from the concrete server
/// (or simulation) that owns players and environments. All methods take
/// `&self`; implementations are expected to use interior mutability.
///
/// # Implementation Notes
///
/// - `locate` returns `None` for players that are offline or unknown.
/// - Player-directed operations on unknown players are silently ignored.
pub trait Platform: Send + Sync {
    /// Returns whether the environment is currently live.
    fn environment_exists(&self, environment: &EnvironmentId) -> bool;

    /// Players currently located in the environment.
    fn occupants(&self, environment: &EnvironmentId) -> Vec<PlayerId>;

    /// The environment the player is currently in, if the player is online.
    fn locate(&self, player: PlayerId) -> Option<EnvironmentId>;

    /// The environment's own default spawn location.
    fn spawn_location(&self, environment: &EnvironmentId) -> Location;

    fn teleport(&self, player: PlayerId, environment: &EnvironmentId, location: Location);

    fn set_game_mode(&self, player: PlayerId, mode: GameMode);

    fn show_title(&self, player: PlayerId, title: &Title);

    fn send_message(&self, player: PlayerId, notice: &Notice);
}
