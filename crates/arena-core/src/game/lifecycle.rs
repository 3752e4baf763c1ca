//! The game lifecycle state machine.

use serde_json::Value;
use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use super::any_game::AnyGame;
use super::behavior::GameBehavior;
use super::config::GameConfig;
use super::countdown::{COUNTDOWN_LENGTH, Countdown};
use super::end_reason::EndReason;
use super::state::{GameServices, GameState};
use crate::environment::{
    EnvironmentId, GameMode, Location, MembershipEvent, Notice, PlayerId, TextColor, Title,
    TitleTimes,
};
use crate::error::Result;
use crate::game_type::ConfigCodec;
use crate::scheduler::{FiredTimer, TimerPurpose};

const COUNTDOWN_TITLE_TIMES: TitleTimes =
    TitleTimes::new(Duration::ZERO, Duration::from_secs(1), Duration::ZERO);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Loaded,
    Unloaded,
}

/// A game of type `B` bound to one environment.
pub struct Game<B: GameBehavior> {
    state: GameState<B::Config>,
    behavior: B,
    countdown: Countdown,
    codec: Arc<ConfigCodec>,
    phase: Phase,
}

impl<B: GameBehavior> Game<B> {
    pub fn new(
        game_type: Arc<str>,
        environment: EnvironmentId,
        config: B::Config,
        behavior: B,
        services: GameServices,
        codec: Arc<ConfigCodec>,
    ) -> Self {
        Self {
            state: GameState::new(game_type, environment, config, services),
            behavior,
            countdown: Countdown::new(),
            codec,
            phase: Phase::Created,
        }
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }

    pub fn state(&self) -> &GameState<B::Config> {
        &self.state
    }

    pub fn config(&self) -> &B::Config {
        self.state.config()
    }

    /// Switches a participant to or from spectating.
    pub fn set_spectator(&mut self, player: PlayerId, spectator: bool) {
        self.state.set_spectator(player, spectator);
    }

    /// Starts a countdown unless one is running or the game cannot start.
    fn try_start_countdown(&mut self) -> bool {
        if !self.can_start() || self.countdown.is_active() {
            return false;
        }
        tracing::debug!("Starting countdown for {}", self.state.environment());
        self.countdown_step(COUNTDOWN_LENGTH);
        true
    }

    fn countdown_step(&mut self, remaining: u32) {
        if remaining == 0 {
            if !self.start_game() {
                self.state
                    .broadcast(&Notice::new("Start failed").colored(TextColor::Red));
            }
            return;
        }

        tracing::debug!(
            "Countdown for {}: {} remaining",
            self.state.environment(),
            remaining
        );
        let title = Title::new(remaining.to_string(), COUNTDOWN_TITLE_TIMES)
            .colored(TextColor::Green);
        self.state.show_title_to_all(&title);

        let environment = self.state.environment().clone();
        self.countdown
            .arm(self.state.scheduler(), &environment, remaining - 1);
    }

    /// Applies an end requested by a hook through `GameState::finish`.
    ///
    /// Returns whether the game was ended.
    fn settle(&mut self) -> bool {
        match self.state.take_requested_end() {
            Some(reason) => self.end_game(reason),
            None => false,
        }
    }

    fn player_joined(&mut self, player: PlayerId) {
        if self.state.is_running() {
            self.state.set_spectator(player, true);
            self.state.platform().send_message(
                player,
                &Notice::new(
                    "You are now in spectator mode as the game you joined is already running",
                ),
            );
        } else {
            self.try_start_countdown();
        }

        let environment = self.state.environment().clone();
        let platform = self.state.platform();
        let location = self
            .state
            .config()
            .spawn_point()
            .copied()
            .unwrap_or_else(|| platform.spawn_location(&environment));
        platform.teleport(player, &environment, location);
    }

    fn player_left(&mut self, player: PlayerId) {
        if !self.state.is_running() || !self.state.is_participant(player) {
            return;
        }

        self.state.participants_mut().remove(player);
        self.behavior.handle_player_left(&mut self.state, player);
        if self.settle() {
            return;
        }

        if self.state.is_running() && !self.behavior.can_continue_after_player_left(&self.state) {
            tracing::debug!(
                "Game in {} cannot continue after {} left",
                self.state.environment(),
                player
            );
            self.end_game(EndReason::MissingRequirementsToContinue);
        }
    }
}

impl<B: GameBehavior> AnyGame for Game<B> {
    fn game_type(&self) -> &str {
        self.state.game_type()
    }

    fn environment(&self) -> &EnvironmentId {
        self.state.environment()
    }

    fn is_loaded(&self) -> bool {
        self.phase == Phase::Loaded
    }

    fn is_running(&self) -> bool {
        self.state.is_running()
    }

    fn has_pending_countdown(&self) -> bool {
        self.countdown.is_active()
    }

    fn is_config_complete(&self) -> bool {
        self.behavior.is_config_complete(self.state.config())
    }

    fn can_start(&self) -> bool {
        self.phase != Phase::Unloaded
            && !self.state.is_running()
            && self.is_config_complete()
            && self.behavior.can_start(&self.state)
    }

    fn load_game(&mut self) {
        if self.phase != Phase::Created {
            return;
        }
        self.phase = Phase::Loaded;

        if !self.is_config_complete() {
            tracing::warn!(
                "The configuration for the following game is not complete: {}",
                self.state.environment()
            );
        }

        self.behavior.handle_game_loaded(&mut self.state);
        self.try_start_countdown();
    }

    fn unload_game(&mut self) {
        if self.phase == Phase::Unloaded {
            return;
        }

        self.end_game(EndReason::Unload);
        self.phase = Phase::Unloaded;
        self.behavior.handle_game_unloaded(&mut self.state);
    }

    fn start_game(&mut self) -> bool {
        if !self.can_start() {
            return false;
        }

        let environment = self.state.environment().clone();
        let spawn_point = self.state.config().spawn_point().copied();
        let occupants = self.state.occupants();
        {
            let platform = self.state.platform();
            for &player in &occupants {
                if let Some(location) = spawn_point {
                    platform.teleport(player, &environment, location);
                }
                platform.set_game_mode(player, GameMode::Survival);
            }
        }
        self.state.participants_mut().replace(occupants);

        self.countdown.cancel(self.state.scheduler());
        self.state.set_running(true);
        tracing::debug!(
            "Started {} in {} with {} players",
            self.state.game_type(),
            environment,
            self.state.participant_count()
        );

        self.behavior.handle_game_started(&mut self.state);
        self.settle();
        true
    }

    fn end_game(&mut self, reason: EndReason) -> bool {
        if !self.state.is_running() {
            let canceled = self.countdown.cancel(self.state.scheduler());
            if canceled {
                tracing::debug!("Canceled countdown in {}", self.state.environment());
            }
            return canceled;
        }

        self.state.set_running(false);
        self.behavior.handle_game_ended(&mut self.state, reason);
        self.state.participants_mut().clear();
        self.state.cancel_all_timers();
        self.state.take_requested_end();
        tracing::debug!(
            "Ended {} in {} ({})",
            self.state.game_type(),
            self.state.environment(),
            reason
        );

        if reason.should_restart() {
            self.try_start_countdown();
        }
        true
    }

    fn players(&mut self) -> BTreeSet<PlayerId> {
        self.state.players()
    }

    fn set_spawn_point(&mut self, spawn_point: Option<Location>) {
        self.state.config_mut().set_spawn_point(spawn_point);
        if self.phase == Phase::Loaded {
            self.try_start_countdown();
        }
    }

    fn handle_membership(&mut self, event: &MembershipEvent) {
        if self.phase != Phase::Loaded {
            return;
        }

        match event {
            MembershipEvent::Joined {
                player,
                environment,
            } => {
                if environment == self.state.environment() {
                    self.player_joined(*player);
                }
            }
            MembershipEvent::Quit { player } => {
                if self.state.is_participant(*player) {
                    self.player_left(*player);
                }
            }
            MembershipEvent::ChangedEnvironment { player, from, to } => {
                if from == self.state.environment() {
                    self.player_left(*player);
                } else if to == self.state.environment() {
                    self.player_joined(*player);
                }
            }
        }
    }

    fn handle_timer(&mut self, fired: &FiredTimer) {
        if self.phase != Phase::Loaded || &fired.task.environment != self.state.environment() {
            return;
        }

        match fired.task.purpose {
            TimerPurpose::Countdown { .. } => {
                if let Some(remaining) = self.countdown.accept(fired) {
                    self.countdown_step(remaining);
                }
            }
            TimerPurpose::Game { tag } => {
                if self.state.accept_timer(fired.handle) {
                    self.behavior.handle_timer(&mut self.state, tag);
                    self.settle();
                }
            }
        }
    }

    fn encode_config(&self) -> Result<Value> {
        self.codec.encode(self.state.config())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
