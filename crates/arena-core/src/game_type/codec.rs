//! Config serialization with per-type overrides.
//!
//! Configs are mapped to JSON structurally through serde. A game type can
//! override how values of one type are persisted by binding the field paths
//! that hold them to a [`TypeAdapter`]. The adapter rewrites every value
//! found under a bound path after the generic mapping on write, and before
//! it on read.
//!
//! A path is a dot-separated list of serialized field names, such as
//! `finishLine` or `course.checkpoints`. Arrays met along the way are
//! descended element by element and `null` is left alone, so a path covers
//! `Location`, `Option<Location>`, `Vec<Location>` and
//! `Option<Vec<Location>>` fields alike.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::environment::Location;
use crate::error::{ArenaError, Result};

/// Custom persisted form for one kind of value.
pub trait TypeAdapter: Send + Sync {
    /// Name of the adapted type, used in error messages.
    fn type_name(&self) -> &'static str;

    /// Structural JSON -> persisted JSON.
    fn write(&self, value: Value) -> Result<Value>;

    /// Persisted JSON -> structural JSON.
    fn read(&self, value: Value) -> Result<Value>;
}

/// Path-to-adapter bindings of one game type.
#[derive(Clone, Default)]
pub struct ConfigCodec {
    adapters: Vec<(String, Arc<dyn TypeAdapter>)>,
}

impl fmt::Debug for ConfigCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.adapters
                    .iter()
                    .map(|(field, adapter)| (field, adapter.type_name())),
            )
            .finish()
    }
}

impl ConfigCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a field path to an adapter.
    ///
    /// A later binding for the same path replaces the earlier one.
    pub fn bind(&mut self, field: impl Into<String>, adapter: Arc<dyn TypeAdapter>) {
        let field = field.into();
        self.adapters.retain(|(existing, _)| *existing != field);
        self.adapters.push((field, adapter));
    }

    pub fn adapter_for(&self, field: &str) -> Option<&dyn TypeAdapter> {
        self.adapters
            .iter()
            .find(|(existing, _)| existing == field)
            .map(|(_, adapter)| adapter.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn encode<C: Serialize>(&self, config: &C) -> Result<Value> {
        let mut value = expect_object(serde_json::to_value(config)?)?;
        self.rewrite(&mut value, &|adapter, value| adapter.write(value))?;
        Ok(value)
    }

    pub fn decode<C: DeserializeOwned>(&self, value: Value) -> Result<C> {
        let mut value = expect_object(value)?;
        self.rewrite(&mut value, &|adapter, value| adapter.read(value))?;
        Ok(serde_json::from_value(value)?)
    }

    fn rewrite<F>(&self, root: &mut Value, apply: &F) -> Result<()>
    where
        F: Fn(&dyn TypeAdapter, Value) -> Result<Value>,
    {
        for (path, adapter) in &self.adapters {
            let segments: Vec<&str> = path.split('.').collect();
            rewrite_at(root, &segments, adapter.as_ref(), apply)?;
        }
        Ok(())
    }
}

fn rewrite_at<F>(
    value: &mut Value,
    path: &[&str],
    adapter: &dyn TypeAdapter,
    apply: &F,
) -> Result<()>
where
    F: Fn(&dyn TypeAdapter, Value) -> Result<Value>,
{
    match (value, path) {
        (Value::Null, _) => Ok(()),
        (Value::Array(items), _) => items
            .iter_mut()
            .try_for_each(|item| rewrite_at(item, path, adapter, apply)),
        (slot, []) => {
            let taken = slot.take();
            *slot = apply(adapter, taken)?;
            Ok(())
        }
        (Value::Object(map), [field, rest @ ..]) => match map.get_mut(*field) {
            Some(child) => rewrite_at(child, rest, adapter, apply),
            None => Ok(()),
        },
        // A scalar where the path expects an object; serde reports it later.
        _ => Ok(()),
    }
}

fn expect_object(value: Value) -> Result<Value> {
    match value {
        Value::Object(_) => Ok(value),
        other => Err(ArenaError::Serialization {
            format: "JSON".to_string(),
            message: format!("config must be a JSON object, got {}", other),
        }),
    }
}

/// Persists a [`Location`] as a compact `"x,y,z,yaw,pitch"` string.
///
/// Reading also accepts the structural object form, so hand-written files
/// may use either.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactLocationAdapter;

impl TypeAdapter for CompactLocationAdapter {
    fn type_name(&self) -> &'static str {
        "Location"
    }

    fn write(&self, value: Value) -> Result<Value> {
        let location: Location = serde_json::from_value(value)
            .map_err(|e| ArenaError::codec(self.type_name(), e.to_string()))?;
        Ok(Value::String(format!(
            "{},{},{},{},{}",
            location.x, location.y, location.z, location.yaw, location.pitch
        )))
    }

    fn read(&self, value: Value) -> Result<Value> {
        let text = match value {
            Value::String(text) => text,
            object @ Value::Object(_) => return Ok(object),
            other => {
                return Err(ArenaError::codec(
                    self.type_name(),
                    format!("expected a string, got {}", other),
                ));
            }
        };

        let parts: Vec<&str> = text.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 5 {
            return Err(ArenaError::codec(
                self.type_name(),
                format!("expected 3 or 5 comma-separated numbers, got '{}'", text),
            ));
        }

        let number = |part: &str| -> Result<f64> {
            part.parse::<f64>().map_err(|e| {
                ArenaError::codec(self.type_name(), format!("invalid number '{}': {}", part, e))
            })
        };
        let mut location = Location::new(number(parts[0])?, number(parts[1])?, number(parts[2])?);
        if parts.len() == 5 {
            location = location.with_rotation(number(parts[3])? as f32, number(parts[4])? as f32);
        }
        Ok(serde_json::to_value(location)?)
    }
}
