use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use super::config::GameConfig;
use super::end_reason::EndReason;
use super::participants::ParticipantSet;
use crate::environment::{
    EnvironmentId, GameMode, Notice, Platform, PlayerId, Title, TitleTimes,
};
use crate::scheduler::{Scheduler, TimerHandle, TimerPurpose, TimerTask};

/// Collaborators every game is constructed with.
#[derive(Clone)]
pub struct GameServices {
    pub platform: Arc<dyn Platform>,
    pub scheduler: Arc<dyn Scheduler>,
}

impl GameServices {
    pub fn new(platform: Arc<dyn Platform>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            platform,
            scheduler,
        }
    }
}

const SPECTATOR_TITLE_TIMES: TitleTimes = TitleTimes::new(
    Duration::from_secs(2),
    Duration::from_secs(3),
    Duration::from_secs(1),
);

/// The part of a game visible to its game type's hooks.
///
/// Hooks may inspect players, notify them, toggle spectators, schedule their
/// own timers and request the end of the game with [`GameState::finish`].
/// They cannot drive the lifecycle directly.
pub struct GameState<C: GameConfig> {
    game_type: Arc<str>,
    environment: EnvironmentId,
    config: C,
    running: bool,
    participants: ParticipantSet,
    services: GameServices,
    rng: StdRng,
    timers: BTreeSet<TimerHandle>,
    requested_end: Option<EndReason>,
}

impl<C: GameConfig> GameState<C> {
    pub(crate) fn new(
        game_type: Arc<str>,
        environment: EnvironmentId,
        config: C,
        services: GameServices,
    ) -> Self {
        Self {
            game_type,
            environment,
            config,
            running: false,
            participants: ParticipantSet::new(),
            services,
            rng: StdRng::from_entropy(),
            timers: BTreeSet::new(),
            requested_end: None,
        }
    }

    pub fn game_type(&self) -> &str {
        &self.game_type
    }

    pub fn environment(&self) -> &EnvironmentId {
        &self.environment
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn platform(&self) -> &dyn Platform {
        self.services.platform.as_ref()
    }

    pub(crate) fn scheduler(&self) -> &dyn Scheduler {
        self.services.scheduler.as_ref()
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Active participants still present in the environment.
    pub fn players(&mut self) -> BTreeSet<PlayerId> {
        self.participants
            .reconcile(self.services.platform.as_ref(), &self.environment)
    }

    /// Number of stored participants, without reconciliation.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_participant(&self, player: PlayerId) -> bool {
        self.participants.contains(player)
    }

    /// An occupant of the environment that is not an active participant.
    pub fn is_spectator(&self, player: PlayerId) -> bool {
        !self.participants.contains(player)
            && self.platform().locate(player).as_ref() == Some(&self.environment)
    }

    pub fn occupants(&self) -> Vec<PlayerId> {
        self.platform().occupants(&self.environment)
    }

    pub fn broadcast(&self, notice: &Notice) {
        let platform = self.platform();
        for player in platform.occupants(&self.environment) {
            platform.send_message(player, notice);
        }
    }

    pub fn show_title_to_all(&self, title: &Title) {
        let platform = self.platform();
        for player in platform.occupants(&self.environment) {
            platform.show_title(player, title);
        }
    }

    /// Moves a player between the active set and the spectators.
    ///
    /// Outside a running game only the game mode changes.
    pub fn set_spectator(&mut self, player: PlayerId, spectator: bool) {
        let platform = self.services.platform.as_ref();
        if spectator {
            self.participants.remove(player);
            platform.set_game_mode(player, GameMode::Spectator);
            platform.show_title(
                player,
                &Title::new("You are now spectating", SPECTATOR_TITLE_TIMES),
            );
        } else {
            // Participants only exist while running.
            if self.running {
                self.participants.insert(player);
            }
            platform.set_game_mode(player, GameMode::Survival);
        }
        tracing::debug!(
            "Player {} in {} is now {}",
            player,
            self.environment,
            if spectator { "spectating" } else { "playing" }
        );
    }

    /// Requests the end of the running game once the current hook returns.
    ///
    /// Ignored when the game is not running.
    pub fn finish(&mut self, reason: EndReason) {
        if self.running {
            self.requested_end = Some(reason);
        }
    }

    /// Schedules a game-type timer; `tag` is handed back to
    /// `GameBehavior::handle_timer` when it fires.
    pub fn schedule(&mut self, tag: u64, delay: Duration) -> TimerHandle {
        let task = TimerTask {
            environment: self.environment.clone(),
            purpose: TimerPurpose::Game { tag },
        };
        let handle = self.services.scheduler.schedule(task, delay);
        self.timers.insert(handle);
        handle
    }

    pub fn cancel_timer(&mut self, handle: TimerHandle) {
        if self.timers.remove(&handle) {
            self.services.scheduler.cancel(handle);
        }
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub(crate) fn participants_mut(&mut self) -> &mut ParticipantSet {
        &mut self.participants
    }

    pub(crate) fn config_mut(&mut self) -> &mut C {
        &mut self.config
    }

    pub(crate) fn take_requested_end(&mut self) -> Option<EndReason> {
        self.requested_end.take()
    }

    /// Accepts a fired game-type timer if it is still owned by this game.
    pub(crate) fn accept_timer(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle)
    }

    pub(crate) fn cancel_all_timers(&mut self) {
        for handle in std::mem::take(&mut self.timers) {
            self.services.scheduler.cancel(handle);
        }
    }
}
