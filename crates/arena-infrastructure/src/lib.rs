pub mod json_games_repository;
pub mod paths;
pub mod settings;
pub mod storage;

pub use crate::json_games_repository::JsonGamesRepository;
pub use crate::paths::ArenaPaths;
pub use crate::settings::ArenaSettings;
