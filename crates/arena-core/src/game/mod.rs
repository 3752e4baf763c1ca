//! Game domain module.
//!
//! # Module Structure
//!
//! - `lifecycle`: the state machine (`Game<B>`)
//! - `any_game`: the type-erased view held by the registry (`AnyGame`)
//! - `behavior`: hooks implemented per game type (`GameBehavior`)
//! - `state`: what hooks can see and do (`GameState`, `GameServices`)
//! - `countdown`: the single delayed-start timer (`Countdown`)
//! - `participants`: lazily reconciled player set (`ParticipantSet`)
//! - `config`: persisted configuration (`GameConfig`, `BasicConfig`)
//! - `end_reason`: why a game ended (`EndReason`)

mod any_game;
mod behavior;
mod config;
mod countdown;
mod end_reason;
mod lifecycle;
mod participants;
mod state;

pub use any_game::AnyGame;
pub use behavior::GameBehavior;
pub use config::{BasicConfig, GameConfig};
pub use countdown::{COUNTDOWN_LENGTH, COUNTDOWN_TICK, Countdown};
pub use end_reason::EndReason;
pub use lifecycle::Game;
pub use participants::ParticipantSet;
pub use state::{GameServices, GameState};
