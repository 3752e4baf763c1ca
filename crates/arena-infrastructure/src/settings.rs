//! Host settings read from `config.toml`.

use arena_core::{ArenaError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths::ArenaPaths;

const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
const DEFAULT_LOG_FILTER: &str = "info";

/// Settings of one arena host.
///
/// ```toml
/// games_file = "/srv/arena/games.json"
/// tick_interval_ms = 50
/// log_filter = "info"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// Location of the games document. Defaults to `<data dir>/arena/games.json`.
    pub games_file: Option<PathBuf>,
    /// Period of the runtime pump that advances timers.
    pub tick_interval_ms: u64,
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence.
    pub log_filter: String,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            games_file: None,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ArenaSettings {
    /// Reads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Reads settings from the platform config directory.
    pub fn load_default() -> Result<Self> {
        let path = ArenaPaths::config_file().map_err(|e| ArenaError::config(e.to_string()))?;
        Self::load(&path)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| ArenaError::config(format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(ArenaError::config("tick_interval_ms must be greater than 0"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// The configured games file, or the platform default.
    pub fn games_file(&self) -> Result<PathBuf> {
        match &self.games_file {
            Some(path) => Ok(path.clone()),
            None => ArenaPaths::games_file().map_err(|e| ArenaError::config(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let settings = ArenaSettings::load(&temp_dir.path().join("config.toml")).unwrap();

        assert_eq!(settings, ArenaSettings::default());
        assert_eq!(settings.tick_interval(), Duration::from_millis(50));
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "games_file = \"/srv/arena/games.json\"\n").unwrap();

        let settings = ArenaSettings::load(&path).unwrap();

        assert_eq!(settings.games_file().unwrap(), PathBuf::from("/srv/arena/games.json"));
        assert_eq!(settings.tick_interval_ms, 50);
    }

    #[test]
    fn test_full_file() {
        let settings = ArenaSettings::parse(
            r#"
            games_file = "games.json"
            tick_interval_ms = 20
            log_filter = "arena_application=debug,info"
            "#,
        )
        .unwrap();

        assert_eq!(settings.tick_interval(), Duration::from_millis(20));
        assert_eq!(settings.log_filter, "arena_application=debug,info");
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let err = ArenaSettings::parse("tick_interval_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, ArenaError::Config(_)));

        let err = ArenaSettings::parse("tick_interval_ms = 0").unwrap_err();
        assert!(matches!(err, ArenaError::Config(_)));
    }
}
