use serde::{Deserialize, Serialize};

use super::model::{EnvironmentId, PlayerId};

/// Membership changes pushed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MembershipEvent {
    /// A player connected and spawned into `environment`.
    Joined {
        player: PlayerId,
        environment: EnvironmentId,
    },
    /// A player disconnected.
    Quit { player: PlayerId },
    /// A player moved from one environment to another.
    ChangedEnvironment {
        player: PlayerId,
        from: EnvironmentId,
        to: EnvironmentId,
    },
}

impl MembershipEvent {
    pub fn player(&self) -> PlayerId {
        match self {
            Self::Joined { player, .. }
            | Self::Quit { player }
            | Self::ChangedEnvironment { player, .. } => *player,
        }
    }
}

/// Answer to an environment-teardown request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeardownVerdict {
    Allow,
    /// A game is still bound to the environment.
    Refuse,
}

impl TeardownVerdict {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}
