//! Environment domain module.
//!
//! Everything the lifecycle logic consumes from the hosting platform:
//! identities, locations, notices, membership events and the `Platform`
//! trait itself.

mod event;
mod model;
mod platform;
mod simulated;

pub use event::{MembershipEvent, TeardownVerdict};
pub use model::{
    EnvironmentId, GameMode, Location, Notice, PlayerId, TextColor, Title, TitleTimes,
};
pub use platform::Platform;
pub use simulated::SimulatedPlatform;
