use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::environment::Location;

/// Persisted, kind-specific configuration of a game.
///
/// Every configuration carries at least an optional spawn point; a game
/// whose spawn point is missing can be loaded but never started.
pub trait GameConfig: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + 'static {
    fn spawn_point(&self) -> Option<&Location>;

    fn set_spawn_point(&mut self, spawn_point: Option<Location>);
}

/// Configuration for game types that need nothing beyond a spawn point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicConfig {
    pub spawn_point: Option<Location>,
}

impl GameConfig for BasicConfig {
    fn spawn_point(&self) -> Option<&Location> {
        self.spawn_point.as_ref()
    }

    fn set_spawn_point(&mut self, spawn_point: Option<Location>) {
        self.spawn_point = spawn_point;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_basic_config_uses_camel_case() {
        let config = BasicConfig {
            spawn_point: Some(Location::new(1.0, 2.0, 3.0)),
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({ "spawnPoint": { "x": 1.0, "y": 2.0, "z": 3.0, "yaw": 0.0, "pitch": 0.0 } })
        );
    }

    #[test]
    fn test_missing_spawn_point_deserializes_to_none() {
        let config: BasicConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, BasicConfig::default());
    }
}
