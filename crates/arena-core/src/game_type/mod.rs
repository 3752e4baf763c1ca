//! Game type descriptors.
//!
//! A [`GameType`] is the immutable description of one category of game: its
//! name, how to build its behavior for an environment, its default config,
//! and how its config is persisted. Descriptors are erased over the behavior
//! type so the registry can hold many kinds in one [`GameTypes`] collection.

mod codec;

pub use codec::{CompactLocationAdapter, ConfigCodec, TypeAdapter};

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::environment::EnvironmentId;
use crate::error::{ArenaError, Result};
use crate::game::{AnyGame, Game, GameBehavior, GameServices};

type CreateDefaultFn = dyn Fn(EnvironmentId, GameServices) -> Box<dyn AnyGame> + Send + Sync;
type CreateDecodedFn =
    dyn Fn(EnvironmentId, GameServices, Value) -> Result<Box<dyn AnyGame>> + Send + Sync;
type EncodeDefaultFn = dyn Fn() -> Result<Value> + Send + Sync;

/// Named descriptor and factory for one category of game.
pub struct GameType {
    name: Arc<str>,
    codec: Arc<ConfigCodec>,
    create_default: Box<CreateDefaultFn>,
    create_decoded: Box<CreateDecodedFn>,
    encode_default: Box<EncodeDefaultFn>,
}

impl fmt::Debug for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameType")
            .field("name", &self.name)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl GameType {
    /// Starts describing a game type whose games run behavior `B`.
    ///
    /// `factory` builds a fresh behavior for each game; `default_config`
    /// produces the config of games created without a persisted one.
    pub fn builder<B, F, D>(name: impl Into<String>, factory: F, default_config: D) -> GameTypeBuilder<B>
    where
        B: GameBehavior,
        F: Fn(&EnvironmentId) -> B + Send + Sync + 'static,
        D: Fn() -> B::Config + Send + Sync + 'static,
    {
        GameTypeBuilder {
            name: name.into(),
            factory: Arc::new(factory),
            default_config: Arc::new(default_config),
            codec: ConfigCodec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &ConfigCodec {
        &self.codec
    }

    /// Builds a game for `environment` with the default config.
    pub fn create(&self, environment: EnvironmentId, services: &GameServices) -> Box<dyn AnyGame> {
        (self.create_default)(environment, services.clone())
    }

    /// Builds a game for `environment` from a persisted config.
    pub fn create_from_config(
        &self,
        environment: EnvironmentId,
        services: &GameServices,
        config: Value,
    ) -> Result<Box<dyn AnyGame>> {
        (self.create_decoded)(environment, services.clone(), config)
    }

    /// The default config as it would be persisted.
    pub fn default_config(&self) -> Result<Value> {
        (self.encode_default)()
    }
}

/// Builder returned by [`GameType::builder`].
pub struct GameTypeBuilder<B: GameBehavior> {
    name: String,
    factory: Arc<dyn Fn(&EnvironmentId) -> B + Send + Sync>,
    default_config: Arc<dyn Fn() -> B::Config + Send + Sync>,
    codec: ConfigCodec,
}

impl<B: GameBehavior> GameTypeBuilder<B> {
    /// Persists every value under the config field path `path` (dot-separated
    /// serialized names) through `adapter`.
    pub fn adapter(mut self, path: impl Into<String>, adapter: impl TypeAdapter + 'static) -> Self {
        self.codec.bind(path, Arc::new(adapter));
        self
    }

    pub fn build(self) -> GameType {
        let name: Arc<str> = Arc::from(self.name);
        let codec = Arc::new(self.codec);
        let factory = self.factory;
        let default_config = self.default_config;

        let construct = {
            let name = name.clone();
            let codec = codec.clone();
            Arc::new(
                move |environment: EnvironmentId, services: GameServices, config: B::Config| {
                    let behavior = factory(&environment);
                    Box::new(Game::new(
                        name.clone(),
                        environment,
                        config,
                        behavior,
                        services,
                        codec.clone(),
                    )) as Box<dyn AnyGame>
                },
            )
        };

        let create_default: Box<CreateDefaultFn> = {
            let construct = construct.clone();
            let default_config = default_config.clone();
            Box::new(move |environment, services| {
                construct(environment, services, default_config())
            })
        };

        let create_decoded: Box<CreateDecodedFn> = {
            let codec = codec.clone();
            Box::new(move |environment, services, value| {
                let config: B::Config = codec.decode(value)?;
                Ok(construct(environment, services, config))
            })
        };

        let encode_default: Box<EncodeDefaultFn> = {
            let codec = codec.clone();
            Box::new(move || codec.encode(&default_config()))
        };

        GameType {
            name,
            codec,
            create_default,
            create_decoded,
            encode_default,
        }
    }
}

/// The set of game types known to a registry, keyed by name.
#[derive(Debug, Default, Clone)]
pub struct GameTypes {
    types: BTreeMap<String, Arc<GameType>>,
}

impl GameTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a game type. Names are case-sensitive and must be unique.
    pub fn register(&mut self, game_type: GameType) -> Result<Arc<GameType>> {
        if self.types.contains_key(game_type.name()) {
            return Err(ArenaError::DuplicateGameType(game_type.name().to_string()));
        }
        let game_type = Arc::new(game_type);
        self.types
            .insert(game_type.name().to_string(), game_type.clone());
        Ok(game_type)
    }

    pub fn get(&self, name: &str) -> Option<Arc<GameType>> {
        self.types.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<GameType>> {
        self.types.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Location, SimulatedPlatform};
    use crate::game::{BasicConfig, EndReason, GameConfig, GameState};
    use crate::scheduler::TickScheduler;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RaceConfig {
        spawn_point: Option<Location>,
        finish_line: Location,
        laps: u32,
    }

    impl GameConfig for RaceConfig {
        fn spawn_point(&self) -> Option<&Location> {
            self.spawn_point.as_ref()
        }

        fn set_spawn_point(&mut self, spawn_point: Option<Location>) {
            self.spawn_point = spawn_point;
        }
    }

    struct Race;

    impl GameBehavior for Race {
        type Config = RaceConfig;

        fn handle_game_started(&mut self, _game: &mut GameState<RaceConfig>) {}

        fn handle_game_ended(&mut self, _game: &mut GameState<RaceConfig>, _reason: EndReason) {}

        fn can_continue_after_player_left(&self, game: &GameState<RaceConfig>) -> bool {
            game.participant_count() >= 1
        }
    }

    struct Lobby;

    impl GameBehavior for Lobby {
        type Config = BasicConfig;

        fn handle_game_started(&mut self, _game: &mut GameState<BasicConfig>) {}

        fn handle_game_ended(&mut self, _game: &mut GameState<BasicConfig>, _reason: EndReason) {}

        fn can_continue_after_player_left(&self, _game: &GameState<BasicConfig>) -> bool {
            true
        }
    }

    fn race_type() -> GameType {
        GameType::builder(
            "race",
            |_| Race,
            || RaceConfig {
                spawn_point: None,
                finish_line: Location::new(50.0, 64.0, 0.0),
                laps: 3,
            },
        )
        .adapter("finishLine", CompactLocationAdapter)
        .build()
    }

    fn services() -> GameServices {
        GameServices::new(
            Arc::new(SimulatedPlatform::new()),
            Arc::new(TickScheduler::new()),
        )
    }

    #[test]
    fn test_default_config_is_encoded_with_adapters() {
        let value = race_type().default_config().unwrap();

        assert_eq!(
            value,
            json!({ "spawnPoint": null, "finishLine": "50,64,0,0,0", "laps": 3 })
        );
    }

    #[test]
    fn test_default_config_survives_encode_decode() {
        let race = race_type();
        let game = race
            .create_from_config(
                EnvironmentId::from("track"),
                &services(),
                race.default_config().unwrap(),
            )
            .unwrap();

        let game = game.as_any().downcast_ref::<Game<Race>>().unwrap();
        assert_eq!(game.config().finish_line, Location::new(50.0, 64.0, 0.0));
        assert_eq!(game.config().laps, 3);
        assert_eq!(game.encode_config().unwrap(), race.default_config().unwrap());
    }

    #[test]
    fn test_create_builds_unloaded_game_for_environment() {
        let game = race_type().create(EnvironmentId::from("track"), &services());

        assert_eq!(game.game_type(), "race");
        assert_eq!(game.environment().as_str(), "track");
        assert!(!game.is_loaded());
        assert!(!game.is_running());
        assert!(!game.is_config_complete());
    }

    #[test]
    fn test_create_from_invalid_config_fails() {
        let err = race_type()
            .create_from_config(
                EnvironmentId::from("track"),
                &services(),
                json!({ "finishLine": "not a location", "laps": 1 }),
            )
            .err()
            .unwrap();

        assert!(matches!(err, ArenaError::Codec { .. }));
    }

    #[test]
    fn test_register_rejects_duplicate_names() {
        let mut types = GameTypes::new();
        types.register(race_type()).unwrap();
        types
            .register(GameType::builder("lobby", |_| Lobby, BasicConfig::default).build())
            .unwrap();

        let err = types.register(race_type()).unwrap_err();

        assert_eq!(err, ArenaError::DuplicateGameType("race".to_string()));
        assert_eq!(types.names(), vec!["lobby", "race"]);
        assert!(types.get("Race").is_none());
        assert_eq!(types.get("race").unwrap().name(), "race");
    }
}
