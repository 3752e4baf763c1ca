//! Identity and value types shared with the hosting platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Identity of an environment (a world), e.g. its name.
///
/// Environment ids are the keys of the persisted games document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentId(String);

impl EnvironmentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EnvironmentId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EnvironmentId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Stable identity of a player across connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A position inside an environment.
///
/// The environment itself is not part of the location; it is always implied
/// by the game the location belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn with_rotation(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }
}

/// How a player interacts with the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Regular participation.
    Survival,
    /// Free-flying observer that cannot interact.
    Spectator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextColor {
    Default,
    Green,
    Red,
}

/// Fade-in, stay and fade-out durations of an on-screen title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleTimes {
    pub fade_in: Duration,
    pub stay: Duration,
    pub fade_out: Duration,
}

impl TitleTimes {
    pub const fn new(fade_in: Duration, stay: Duration, fade_out: Duration) -> Self {
        Self {
            fade_in,
            stay,
            fade_out,
        }
    }
}

/// A transient on-screen notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    pub color: TextColor,
    pub subtitle: String,
    pub times: TitleTimes,
}

impl Title {
    pub fn new(text: impl Into<String>, times: TitleTimes) -> Self {
        Self {
            text: text.into(),
            color: TextColor::Default,
            subtitle: String::new(),
            times,
        }
    }

    pub fn colored(mut self, color: TextColor) -> Self {
        self.color = color;
        self
    }
}

/// A chat line sent to one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    pub color: TextColor,
}

impl Notice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: TextColor::Default,
        }
    }

    pub fn colored(mut self, color: TextColor) -> Self {
        self.color = color;
        self
    }
}
