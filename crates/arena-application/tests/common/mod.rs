#![allow(dead_code)]

use arena_application::GameRegistry;
use arena_core::environment::{EnvironmentId, Location, PlayerId, SimulatedPlatform};
use arena_core::game::{
    BasicConfig, COUNTDOWN_LENGTH, COUNTDOWN_TICK, EndReason, GameBehavior, GameConfig,
    GameServices, GameState,
};
use arena_core::game_type::{CompactLocationAdapter, GameType, GameTypes};
use arena_core::scheduler::TickScheduler;
use arena_infrastructure::JsonGamesRepository;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const WORLDS: [&str; 3] = ["spleef_1", "spleef_2", "race_track"];

/// Last player standing; needs two players to keep going.
#[derive(Default)]
pub struct Spleef {
    pub rounds: u32,
}

impl GameBehavior for Spleef {
    type Config = BasicConfig;

    fn handle_game_started(&mut self, _game: &mut GameState<BasicConfig>) {
        self.rounds += 1;
    }

    fn handle_game_ended(&mut self, _game: &mut GameState<BasicConfig>, _reason: EndReason) {}

    fn can_continue_after_player_left(&self, game: &GameState<BasicConfig>) -> bool {
        game.participant_count() >= 2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfig {
    pub spawn_point: Option<Location>,
    pub finish_line: Location,
    pub laps: u32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            spawn_point: None,
            finish_line: Location::new(0.0, 64.0, 100.0),
            laps: 3,
        }
    }
}

impl GameConfig for RaceConfig {
    fn spawn_point(&self) -> Option<&Location> {
        self.spawn_point.as_ref()
    }

    fn set_spawn_point(&mut self, spawn_point: Option<Location>) {
        self.spawn_point = spawn_point;
    }
}

pub struct Race;

impl GameBehavior for Race {
    type Config = RaceConfig;

    fn handle_game_started(&mut self, _game: &mut GameState<RaceConfig>) {}

    fn handle_game_ended(&mut self, _game: &mut GameState<RaceConfig>, _reason: EndReason) {}

    fn can_continue_after_player_left(&self, game: &GameState<RaceConfig>) -> bool {
        game.participant_count() >= 1
    }
}

pub fn game_types() -> GameTypes {
    let mut types = GameTypes::new();
    types
        .register(GameType::builder("spleef", |_| Spleef::default(), BasicConfig::default).build())
        .unwrap();
    types
        .register(
            GameType::builder("race", |_| Race, RaceConfig::default)
                .adapter("finishLine", CompactLocationAdapter)
                .build(),
        )
        .unwrap();
    types
}

pub fn env(name: &str) -> EnvironmentId {
    EnvironmentId::from(name)
}

/// A registry over a games file in a temporary directory.
pub struct Host {
    pub temp_dir: TempDir,
    pub platform: Arc<SimulatedPlatform>,
    pub scheduler: Arc<TickScheduler>,
    pub registry: GameRegistry,
}

impl Host {
    pub fn new() -> Self {
        Self::in_dir(TempDir::new().unwrap())
    }

    /// Starts a fresh process over the games file of `temp_dir`.
    pub fn in_dir(temp_dir: TempDir) -> Self {
        let platform = Arc::new(SimulatedPlatform::new());
        for world in WORLDS {
            platform.add_environment(world, Location::new(0.0, 80.0, 0.0));
        }
        let scheduler = Arc::new(TickScheduler::new());
        let services = GameServices::new(platform.clone(), scheduler.clone());
        let repository = Arc::new(JsonGamesRepository::new(temp_dir.path().join("games.json")));
        let registry = GameRegistry::new(game_types(), services, repository);
        Self {
            temp_dir,
            platform,
            scheduler,
            registry,
        }
    }

    /// Drops the process state, keeping the games file.
    pub fn restart(self) -> Self {
        Self::in_dir(self.temp_dir)
    }

    pub fn games_file(&self) -> PathBuf {
        self.temp_dir.path().join("games.json")
    }

    pub fn read_games_file(&self) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(self.games_file()).unwrap()).unwrap()
    }

    pub fn write_games_file(&self, value: serde_json::Value) {
        std::fs::write(self.games_file(), value.to_string()).unwrap();
    }

    pub fn join(&mut self, world: &str) -> PlayerId {
        let player = PlayerId::new_v4();
        let event = self.platform.connect(player, &env(world));
        self.registry.handle_membership(&event);
        player
    }

    pub fn quit(&mut self, player: PlayerId) {
        let event = self.platform.disconnect(player);
        self.registry.handle_membership(&event);
    }

    pub fn tick(&mut self) {
        self.scheduler.advance(COUNTDOWN_TICK);
        self.registry.run_due_timers();
    }

    pub fn run_countdown(&mut self) {
        for _ in 0..COUNTDOWN_LENGTH {
            self.tick();
        }
    }
}
