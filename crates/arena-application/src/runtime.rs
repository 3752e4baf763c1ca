//! The event pump driving a [`GameRegistry`].
//!
//! All registry work happens on the task running [`ArenaRuntime::run`]:
//! membership events, teardown requests, operator tasks and timer delivery
//! are serialized through one channel and one interval.

use anyhow::{Context, Result};
use arena_core::environment::{EnvironmentId, MembershipEvent, Platform, TeardownVerdict};
use arena_core::game::GameServices;
use arena_core::game_type::GameTypes;
use arena_core::scheduler::TickScheduler;
use arena_infrastructure::{ArenaSettings, JsonGamesRepository};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::registry::GameRegistry;

const EVENT_QUEUE_LEN: usize = 256;

/// Work submitted to run against the registry on the runtime task.
pub type RegistryTask = Box<dyn FnOnce(&mut GameRegistry) + Send>;

/// Input of the runtime.
pub enum ArenaEvent {
    Membership(MembershipEvent),
    /// The platform asks whether an environment may be torn down.
    EnvironmentUnloading {
        environment: EnvironmentId,
        reply: oneshot::Sender<TeardownVerdict>,
    },
    Task(RegistryTask),
    /// Saves the games and stops the runtime.
    Shutdown,
}

/// Cloneable sender side of a running [`ArenaRuntime`].
#[derive(Clone)]
pub struct ArenaHandle {
    sender: mpsc::Sender<ArenaEvent>,
}

impl ArenaHandle {
    async fn send(&self, event: ArenaEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| anyhow::anyhow!("Arena runtime has stopped"))
    }

    pub async fn membership(&self, event: MembershipEvent) -> Result<()> {
        self.send(ArenaEvent::Membership(event)).await
    }

    pub async fn request_environment_unload(
        &self,
        environment: EnvironmentId,
    ) -> Result<TeardownVerdict> {
        let (reply, verdict) = oneshot::channel();
        self.send(ArenaEvent::EnvironmentUnloading { environment, reply })
            .await?;
        verdict.await.context("Arena runtime dropped the teardown request")
    }

    /// Runs `f` on the runtime task and returns its result.
    pub async fn with_registry<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut GameRegistry) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, result) = oneshot::channel();
        self.send(ArenaEvent::Task(Box::new(move |registry| {
            let _ = reply.send(f(registry));
        })))
        .await?;
        result.await.context("Arena runtime dropped the task")
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(ArenaEvent::Shutdown).await
    }
}

pub struct ArenaRuntime {
    registry: GameRegistry,
    scheduler: Arc<TickScheduler>,
    tick_interval: Duration,
    events: mpsc::Receiver<ArenaEvent>,
}

impl ArenaRuntime {
    /// `scheduler` must be the scheduler the registry's games were given.
    pub fn new(
        registry: GameRegistry,
        scheduler: Arc<TickScheduler>,
        tick_interval: Duration,
    ) -> (Self, ArenaHandle) {
        let (sender, events) = mpsc::channel(EVENT_QUEUE_LEN);
        let runtime = Self {
            registry,
            scheduler,
            tick_interval,
            events,
        };
        (runtime, ArenaHandle { sender })
    }

    /// Builds a runtime from host settings and restores the persisted games.
    pub fn bootstrap(
        settings: &ArenaSettings,
        game_types: GameTypes,
        platform: Arc<dyn Platform>,
    ) -> Result<(Self, ArenaHandle)> {
        let games_file = settings.games_file()?;
        tracing::info!("Using games file {}", games_file.display());

        let scheduler = Arc::new(TickScheduler::new());
        let services = GameServices::new(platform, scheduler.clone());
        let repository = Arc::new(JsonGamesRepository::new(games_file));
        let mut registry = GameRegistry::new(game_types, services, repository);
        registry.load_games().context("Failed to load games")?;

        Ok(Self::new(registry, scheduler, settings.tick_interval()))
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Processes events until `Shutdown` arrives or every handle is dropped,
    /// then saves the games.
    pub async fn run(mut self) {
        let mut interval = time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                maybe_event = self.events.recv() => {
                    let Some(event) = maybe_event else {
                        tracing::debug!("All arena handles dropped");
                        break;
                    };
                    if !self.handle_event(event) {
                        break;
                    }
                }
                now = interval.tick() => {
                    self.scheduler.advance(now.duration_since(last_tick));
                    last_tick = now;
                    self.registry.run_due_timers();
                }
            }
        }

        if let Err(e) = self.registry.save_games() {
            tracing::error!("Failed to save games on shutdown: {}", e);
        }
    }

    /// Returns `false` when the runtime should stop.
    fn handle_event(&mut self, event: ArenaEvent) -> bool {
        match event {
            ArenaEvent::Membership(event) => self.registry.handle_membership(&event),
            ArenaEvent::EnvironmentUnloading { environment, reply } => {
                let verdict = self.registry.handle_environment_unload(&environment);
                let _ = reply.send(verdict);
            }
            ArenaEvent::Task(task) => task(&mut self.registry),
            ArenaEvent::Shutdown => {
                tracing::info!("Shutting down arena runtime");
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::environment::{Location, PlayerId, SimulatedPlatform};
    use arena_core::game::{BasicConfig, COUNTDOWN_LENGTH, COUNTDOWN_TICK, EndReason, GameBehavior, GameState};
    use arena_core::game_type::GameType;
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::TempDir;

    struct Solo;

    impl GameBehavior for Solo {
        type Config = BasicConfig;

        fn handle_game_started(&mut self, _game: &mut GameState<BasicConfig>) {}

        fn handle_game_ended(&mut self, _game: &mut GameState<BasicConfig>, _reason: EndReason) {}

        fn can_continue_after_player_left(&self, game: &GameState<BasicConfig>) -> bool {
            game.participant_count() >= 1
        }
    }

    fn game_types() -> GameTypes {
        let mut types = GameTypes::new();
        types
            .register(GameType::builder("solo", |_| Solo, BasicConfig::default).build())
            .unwrap();
        types
    }

    fn settings(temp_dir: &TempDir) -> ArenaSettings {
        ArenaSettings {
            games_file: Some(temp_dir.path().join("games.json")),
            tick_interval_ms: 5,
            ..ArenaSettings::default()
        }
    }

    fn platform() -> Arc<SimulatedPlatform> {
        let platform = Arc::new(SimulatedPlatform::new());
        platform.add_environment("arena_1", Location::default());
        platform
    }

    #[tokio::test]
    async fn test_bootstrap_creates_games_file_and_shutdown_saves() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        let (runtime, handle) =
            ArenaRuntime::bootstrap(&settings, game_types(), platform()).unwrap();
        assert!(temp_dir.path().join("games.json").exists());
        let pump = tokio::spawn(runtime.run());

        let created = handle
            .with_registry(|registry| registry.create_game(EnvironmentId::from("arena_1"), "solo"))
            .await
            .unwrap()
            .unwrap();
        assert!(created);
        handle.shutdown().await.unwrap();
        pump.await.unwrap();

        let saved: Value =
            serde_json::from_str(&fs::read_to_string(temp_dir.path().join("games.json")).unwrap())
                .unwrap();
        assert_eq!(saved["arena_1"], json!({ "type": "solo", "config": { "spawnPoint": null } }));
        assert!(handle.shutdown().await.is_err());
    }

    #[tokio::test]
    async fn test_teardown_request_is_answered() {
        let temp_dir = TempDir::new().unwrap();
        let (runtime, handle) =
            ArenaRuntime::bootstrap(&settings(&temp_dir), game_types(), platform()).unwrap();
        let pump = tokio::spawn(runtime.run());

        handle
            .with_registry(|registry| registry.create_game(EnvironmentId::from("arena_1"), "solo"))
            .await
            .unwrap()
            .unwrap();

        let verdict = handle
            .request_environment_unload(EnvironmentId::from("arena_1"))
            .await
            .unwrap();
        assert_eq!(verdict, TeardownVerdict::Refuse);

        let verdict = handle
            .request_environment_unload(EnvironmentId::from("arena_2"))
            .await
            .unwrap();
        assert_eq!(verdict, TeardownVerdict::Allow);

        drop(handle);
        pump.await.unwrap();
    }

    #[tokio::test]
    async fn test_interval_delivers_countdown_timers() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("games.json"),
            r#"{"dataVersion":1,"arena_1":{"type":"solo","config":{"spawnPoint":{"x":0.0,"y":64.0,"z":0.0}}}}"#,
        )
        .unwrap();
        let platform = platform();
        let scheduler = Arc::new(TickScheduler::new());
        let services = GameServices::new(platform.clone(), scheduler.clone());
        let repository = Arc::new(JsonGamesRepository::new(temp_dir.path().join("games.json")));
        let mut registry = GameRegistry::new(game_types(), services, repository);
        assert_eq!(registry.load_games().unwrap(), 1);
        let (runtime, handle) = ArenaRuntime::new(registry, scheduler.clone(), Duration::from_millis(5));
        let pump = tokio::spawn(runtime.run());

        let player = PlayerId::new_v4();
        handle
            .membership(platform.connect(player, &EnvironmentId::from("arena_1")))
            .await
            .unwrap();

        // Jump the virtual clock instead of waiting ten real seconds.
        for _ in 0..COUNTDOWN_LENGTH {
            scheduler.advance(COUNTDOWN_TICK);
            handle.with_registry(|registry| registry.run_due_timers()).await.unwrap();
        }

        let running = handle
            .with_registry(|registry| {
                registry
                    .game(&EnvironmentId::from("arena_1"))
                    .map(|game| game.is_running())
            })
            .await
            .unwrap();
        assert_eq!(running, Some(true));
        assert_eq!(platform.position(player), Some(Location::new(0.0, 64.0, 0.0)));

        handle.shutdown().await.unwrap();
        pump.await.unwrap();
    }
}
