use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndReason {
    /// The game is being unloaded (deleted or saved at shutdown).
    Unload,
    /// Stopped manually by an operator.
    Command,
    /// Not enough participants (or similar) to keep going.
    MissingRequirementsToContinue,
    /// The game reached its natural end.
    Ended,
}

impl EndReason {
    /// Whether the next countdown is armed right after ending for this reason.
    pub fn should_restart(self) -> bool {
        match self {
            Self::Unload | Self::Command | Self::MissingRequirementsToContinue => false,
            Self::Ended => true,
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unload => "unload",
            Self::Command => "command",
            Self::MissingRequirementsToContinue => "missing requirements to continue",
            Self::Ended => "ended",
        };
        f.write_str(name)
    }
}
