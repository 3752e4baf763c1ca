//! The game registry.

use arena_core::document::{GameEntry, GamesDocument};
use arena_core::environment::{EnvironmentId, MembershipEvent, TeardownVerdict};
use arena_core::game::{AnyGame, GameServices};
use arena_core::game_type::GameTypes;
use arena_core::repository::GamesRepository;
use arena_core::{ArenaError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Owns every live game, at most one per environment.
///
/// `GameRegistry` is responsible for:
/// - Restoring games from the repository at startup (`load_games`)
/// - Unloading and persisting them at shutdown (`save_games`)
/// - Creating and deleting games on request
/// - Routing membership events and fired timers to the games
/// - Refusing the teardown of environments that still have a game
///
/// Entries of environments that did not exist at load time are kept
/// verbatim and written back on save.
pub struct GameRegistry {
    games: BTreeMap<EnvironmentId, Box<dyn AnyGame>>,
    deferred: BTreeMap<EnvironmentId, Value>,
    game_types: GameTypes,
    services: GameServices,
    repository: Arc<dyn GamesRepository>,
}

impl GameRegistry {
    pub fn new(
        game_types: GameTypes,
        services: GameServices,
        repository: Arc<dyn GamesRepository>,
    ) -> Self {
        Self {
            games: BTreeMap::new(),
            deferred: BTreeMap::new(),
            game_types,
            services,
            repository,
        }
    }

    pub fn game_types(&self) -> &GameTypes {
        &self.game_types
    }

    pub fn services(&self) -> &GameServices {
        &self.services
    }

    /// Restores the persisted games.
    ///
    /// Either every entry of an existing environment becomes a loaded game,
    /// or none does and the registry is left unchanged.
    ///
    /// # Returns
    ///
    /// The number of games loaded.
    ///
    /// # Errors
    ///
    /// `ArenaError::Load` if the document cannot be read, an entry is
    /// malformed, names an unknown game type, or has an undecodable config.
    pub fn load_games(&mut self) -> Result<usize> {
        let document = self.repository.load()?;

        let mut created = Vec::new();
        let mut deferred = Vec::new();
        for (environment, raw) in document.entries() {
            if !self.services.platform.environment_exists(environment) {
                deferred.push((environment.clone(), raw.clone()));
                continue;
            }
            if self.games.contains_key(environment) {
                tracing::warn!("Skipping persisted game for {}: a game is already loaded there", environment);
                continue;
            }

            let entry = GameEntry::parse(environment, raw)?;
            let game_type = self
                .game_types
                .get(&entry.game_type)
                .ok_or_else(|| ArenaError::load(format!("Could not find game type: {}", entry.game_type)))?;
            let game = game_type
                .create_from_config(environment.clone(), &self.services, entry.config)
                .map_err(|e| e.into_load(&format!("Invalid config for {}", environment)))?;
            created.push(game);
        }

        let count = created.len();
        for (environment, raw) in deferred {
            tracing::debug!("Deferring game entry of unknown environment {}", environment);
            self.deferred.insert(environment, raw);
        }
        for mut game in created {
            let environment = game.environment().clone();
            self.deferred.remove(&environment);
            game.load_game();
            self.games.insert(environment, game);
        }

        tracing::info!("Loaded {} games ({} deferred)", count, self.deferred.len());
        Ok(count)
    }

    /// Unloads every game and persists the configs.
    ///
    /// The table is cleared even when writing fails.
    ///
    /// # Errors
    ///
    /// `ArenaError::Save` if a config cannot be encoded or the document
    /// cannot be written.
    pub fn save_games(&mut self) -> Result<()> {
        let mut document = GamesDocument::new();
        for (environment, raw) in &self.deferred {
            document.insert_raw(environment.clone(), raw.clone());
        }

        let games = std::mem::take(&mut self.games);
        let count = games.len();
        let mut first_error = None;
        for (environment, mut game) in games {
            game.unload_game();
            match game.encode_config() {
                Ok(config) => document.insert(environment, GameEntry::new(game.game_type(), config)),
                Err(e) => {
                    tracing::error!("Failed to encode config of {}: {}", environment, e);
                    first_error.get_or_insert_with(|| {
                        ArenaError::save(format!("Failed to encode config of {}: {}", environment, e))
                    });
                }
            }
        }
        if let Some(err) = first_error {
            return Err(err);
        }

        self.repository.save(&document)?;
        tracing::info!("Saved {} games ({} deferred)", count, self.deferred.len());
        Ok(())
    }

    /// Creates a game of the named type with its default config and loads it.
    ///
    /// # Returns
    ///
    /// `false` without side effects if the environment already has a game.
    pub fn create_game(&mut self, environment: EnvironmentId, game_type: &str) -> Result<bool> {
        if self.games.contains_key(&environment) {
            return Ok(false);
        }

        let game_type = self
            .game_types
            .get(game_type)
            .ok_or_else(|| ArenaError::UnknownGameType(game_type.to_string()))?;
        if !self.services.platform.environment_exists(&environment) {
            return Err(ArenaError::UnknownEnvironment(environment.to_string()));
        }

        let mut game = game_type.create(environment.clone(), &self.services);
        if self.deferred.remove(&environment).is_some() {
            tracing::info!("Replacing deferred game entry of {}", environment);
        }
        game.load_game();
        self.games.insert(environment.clone(), game);

        tracing::info!("Created {} game in {}", game_type.name(), environment);
        Ok(true)
    }

    /// Unloads and removes the game of `environment`.
    ///
    /// # Returns
    ///
    /// Whether a game existed.
    pub fn delete_game(&mut self, environment: &EnvironmentId) -> bool {
        match self.games.remove(environment) {
            Some(mut game) => {
                game.unload_game();
                tracing::info!("Deleted {} game in {}", game.game_type(), environment);
                true
            }
            None => false,
        }
    }

    pub fn game(&self, environment: &EnvironmentId) -> Option<&dyn AnyGame> {
        self.games.get(environment).map(|game| game.as_ref())
    }

    pub fn game_mut(&mut self, environment: &EnvironmentId) -> Option<&mut (dyn AnyGame + 'static)> {
        self.games.get_mut(environment).map(|game| game.as_mut())
    }

    pub fn games(&self) -> impl Iterator<Item = &dyn AnyGame> {
        self.games.values().map(|game| game.as_ref())
    }

    /// Raw entries kept for environments that did not exist at load time.
    pub fn deferred_entries(&self) -> impl Iterator<Item = (&EnvironmentId, &Value)> {
        self.deferred.iter()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Answers a request to tear an environment down.
    ///
    /// Refused while a game is bound to it; the game has to be deleted first.
    pub fn handle_environment_unload(&self, environment: &EnvironmentId) -> TeardownVerdict {
        if self.games.contains_key(environment) {
            tracing::warn!("Refusing to unload {}: a game is bound to it", environment);
            TeardownVerdict::Refuse
        } else {
            TeardownVerdict::Allow
        }
    }

    /// Delivers a membership event to every loaded game.
    pub fn handle_membership(&mut self, event: &MembershipEvent) {
        for game in self.games.values_mut() {
            if game.is_loaded() {
                game.handle_membership(event);
            }
        }
    }

    /// Delivers every due timer to the game of its environment.
    ///
    /// Timers are popped one at a time, so a timer canceled while an earlier
    /// one is handled is never delivered. Timers scheduled during this call
    /// wait for the next one, even when already due.
    ///
    /// # Returns
    ///
    /// The number of timers popped.
    pub fn run_due_timers(&mut self) -> usize {
        let scheduler = self.services.scheduler.clone();
        let bound = scheduler.watermark();
        let mut fired_count = 0;
        while let Some(fired) = scheduler.pop_due_before(bound) {
            fired_count += 1;
            match self.games.get_mut(&fired.task.environment) {
                Some(game) => game.handle_timer(&fired),
                None => tracing::debug!("Dropping timer of {}: no game", fired.task.environment),
            }
        }
        fired_count
    }
}
