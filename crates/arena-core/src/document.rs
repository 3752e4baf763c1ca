//! The persisted games document.
//!
//! ```json
//! {
//!   "dataVersion": 1,
//!   "<environment>": { "type": "<game type>", "config": { ... } }
//! }
//! ```
//!
//! Entries are kept as raw JSON until the registry decides which of them
//! to resolve, so entries of unknown environments survive a load/save cycle
//! untouched.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::environment::EnvironmentId;
use crate::error::{ArenaError, Result};

/// Current version of the document layout.
pub const DATA_VERSION: u64 = 1;

/// Root key holding the document version.
pub const DATA_VERSION_KEY: &str = "dataVersion";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamesDocument {
    entries: BTreeMap<EnvironmentId, Value>,
}

impl GamesDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document root. A missing version is treated as version 1.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(ArenaError::load("The games config file has an invalid format"));
        };

        let mut entries = BTreeMap::new();
        for (key, entry) in root {
            if key == DATA_VERSION_KEY {
                check_version(&entry)?;
                continue;
            }
            entries.insert(EnvironmentId::new(key), entry);
        }
        Ok(Self { entries })
    }

    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        root.insert(DATA_VERSION_KEY.to_string(), Value::from(DATA_VERSION));
        for (environment, entry) in &self.entries {
            root.insert(environment.to_string(), entry.clone());
        }
        Value::Object(root)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&EnvironmentId, &Value)> {
        self.entries.iter()
    }

    pub fn raw_entry(&self, environment: &EnvironmentId) -> Option<&Value> {
        self.entries.get(environment)
    }

    /// Inserts an entry verbatim, replacing any previous one.
    pub fn insert_raw(&mut self, environment: EnvironmentId, entry: Value) {
        self.entries.insert(environment, entry);
    }

    pub fn insert(&mut self, environment: EnvironmentId, entry: GameEntry) {
        self.insert_raw(environment, entry.to_value());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_version(value: &Value) -> Result<()> {
    match value.as_u64() {
        Some(version) if version <= DATA_VERSION => Ok(()),
        Some(version) => Err(ArenaError::load(format!(
            "Unsupported games config version {} (supported: {})",
            version, DATA_VERSION
        ))),
        None => Err(ArenaError::load(format!(
            "Invalid {}: {}",
            DATA_VERSION_KEY, value
        ))),
    }
}

/// One validated `{type, config}` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct GameEntry {
    pub game_type: String,
    pub config: Value,
}

impl GameEntry {
    pub fn new(game_type: impl Into<String>, config: Value) -> Self {
        Self {
            game_type: game_type.into(),
            config,
        }
    }

    pub fn parse(environment: &EnvironmentId, value: &Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(ArenaError::load(format!(
                "The games config file has an invalid format (entry {})",
                environment
            )));
        };

        let Some(game_type) = object.get("type").and_then(Value::as_str) else {
            return Err(ArenaError::load(format!(
                "The games config file contains a game without a type attribute: {}",
                environment
            )));
        };

        let config = match object.get("config") {
            Some(config @ Value::Object(_)) => config.clone(),
            _ => {
                return Err(ArenaError::load(format!(
                    "The games config file contains a game without a config attribute: {}",
                    environment
                )));
            }
        };

        Ok(Self::new(game_type, config))
    }

    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("type".to_string(), Value::String(self.game_type.clone()));
        object.insert("config".to_string(), self.config.clone());
        Value::Object(object)
    }
}
