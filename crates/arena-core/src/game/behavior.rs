use super::config::GameConfig;
use super::end_reason::EndReason;
use super::state::GameState;
use crate::environment::PlayerId;

/// The rules of one game type, plugged into the shared lifecycle.
///
/// The lifecycle owns the running flag, the participants and the countdown;
/// a behavior only reacts to transitions and answers readiness questions.
/// To end a running game from inside a hook, call [`GameState::finish`].
pub trait GameBehavior: Send + 'static {
    type Config: GameConfig;

    /// Called once after the game is loaded, before the first countdown attempt.
    fn handle_game_loaded(&mut self, _game: &mut GameState<Self::Config>) {}

    /// Called once after the game has been force-ended for unloading.
    fn handle_game_unloaded(&mut self, _game: &mut GameState<Self::Config>) {}

    fn handle_game_started(&mut self, game: &mut GameState<Self::Config>);

    /// Called with the game already marked not running; participants are
    /// still available and cleared right after.
    fn handle_game_ended(&mut self, game: &mut GameState<Self::Config>, reason: EndReason);

    /// Extra readiness condition on top of "not running and config complete".
    fn can_start(&self, _game: &GameState<Self::Config>) -> bool {
        true
    }

    fn can_continue_after_player_left(&self, game: &GameState<Self::Config>) -> bool;

    /// Called after an active participant left a running game.
    fn handle_player_left(&mut self, _game: &mut GameState<Self::Config>, _player: PlayerId) {}

    fn is_config_complete(&self, config: &Self::Config) -> bool {
        config.spawn_point().is_some()
    }

    /// Called when a timer scheduled through [`GameState::schedule`] fires.
    fn handle_timer(&mut self, _game: &mut GameState<Self::Config>, _tag: u64) {}
}
