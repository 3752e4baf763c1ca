//! In-memory platform implementation.
//!
//! Keeps environments and player positions in memory and records every
//! player-directed side effect, so a host without a real world (or a test)
//! can drive games and inspect what players would have seen.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::event::MembershipEvent;
use super::model::{EnvironmentId, GameMode, Location, Notice, PlayerId, Title};
use super::platform::Platform;

#[derive(Default)]
struct SimulatedState {
    environments: BTreeMap<EnvironmentId, Location>,
    positions: BTreeMap<PlayerId, (EnvironmentId, Location)>,
    modes: BTreeMap<PlayerId, GameMode>,
    titles: Vec<(PlayerId, Title)>,
    messages: Vec<(PlayerId, Notice)>,
    teleports: Vec<(PlayerId, EnvironmentId, Location)>,
}

/// A `Platform` backed by plain in-memory maps.
#[derive(Default)]
pub struct SimulatedPlatform {
    state: Mutex<SimulatedState>,
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SimulatedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes an environment live, with the given default spawn location.
    pub fn add_environment(&self, environment: impl Into<EnvironmentId>, spawn: Location) {
        self.state().environments.insert(environment.into(), spawn);
    }

    /// Removes an environment. Players inside it are disconnected.
    pub fn remove_environment(&self, environment: &EnvironmentId) {
        let mut state = self.state();
        state.environments.remove(environment);
        state.positions.retain(|_, (env, _)| env != environment);
    }

    /// Connects a player into an environment and returns the matching event.
    pub fn connect(&self, player: PlayerId, environment: &EnvironmentId) -> MembershipEvent {
        let mut state = self.state();
        let spawn = state.environments.get(environment).copied().unwrap_or_default();
        state.positions.insert(player, (environment.clone(), spawn));
        state.modes.entry(player).or_insert(GameMode::Survival);
        MembershipEvent::Joined {
            player,
            environment: environment.clone(),
        }
    }

    /// Disconnects a player and returns the matching event.
    pub fn disconnect(&self, player: PlayerId) -> MembershipEvent {
        self.state().positions.remove(&player);
        MembershipEvent::Quit { player }
    }

    /// Moves an online player into another environment.
    ///
    /// Returns `None` when the player is offline.
    pub fn move_player(&self, player: PlayerId, to: &EnvironmentId) -> Option<MembershipEvent> {
        let mut state = self.state();
        if !state.positions.contains_key(&player) {
            return None;
        }
        let spawn = state.environments.get(to).copied().unwrap_or_default();
        let (from, _) = state.positions.insert(player, (to.clone(), spawn))?;
        Some(MembershipEvent::ChangedEnvironment {
            player,
            from,
            to: to.clone(),
        })
    }

    pub fn position(&self, player: PlayerId) -> Option<Location> {
        self.state().positions.get(&player).map(|(_, location)| *location)
    }

    pub fn game_mode(&self, player: PlayerId) -> Option<GameMode> {
        self.state().modes.get(&player).copied()
    }

    /// Titles shown to the player, oldest first.
    pub fn titles(&self, player: PlayerId) -> Vec<Title> {
        self.state()
            .titles
            .iter()
            .filter(|(p, _)| *p == player)
            .map(|(_, title)| title.clone())
            .collect()
    }

    /// Chat lines sent to the player, oldest first.
    pub fn messages(&self, player: PlayerId) -> Vec<Notice> {
        self.state()
            .messages
            .iter()
            .filter(|(p, _)| *p == player)
            .map(|(_, notice)| notice.clone())
            .collect()
    }

    pub fn teleport_count(&self, player: PlayerId) -> usize {
        self.state().teleports.iter().filter(|(p, _, _)| *p == player).count()
    }
}

impl Platform for SimulatedPlatform {
    fn environment_exists(&self, environment: &EnvironmentId) -> bool {
        self.state().environments.contains_key(environment)
    }

    fn occupants(&self, environment: &EnvironmentId) -> Vec<PlayerId> {
        self.state()
            .positions
            .iter()
            .filter(|(_, (env, _))| env == environment)
            .map(|(player, _)| *player)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn locate(&self, player: PlayerId) -> Option<EnvironmentId> {
        self.state().positions.get(&player).map(|(env, _)| env.clone())
    }

    fn spawn_location(&self, environment: &EnvironmentId) -> Location {
        self.state()
            .environments
            .get(environment)
            .copied()
            .unwrap_or_default()
    }

    fn teleport(&self, player: PlayerId, environment: &EnvironmentId, location: Location) {
        let mut state = self.state();
        if !state.positions.contains_key(&player) {
            return;
        }
        state
            .positions
            .insert(player, (environment.clone(), location));
        state.teleports.push((player, environment.clone(), location));
    }

    fn set_game_mode(&self, player: PlayerId, mode: GameMode) {
        self.state().modes.insert(player, mode);
    }

    fn show_title(&self, player: PlayerId, title: &Title) {
        self.state().titles.push((player, title.clone()));
    }

    fn send_message(&self, player: PlayerId, notice: &Notice) {
        self.state().messages.push((player, notice.clone()));
    }
}
