pub use super::completed_games::Entity as CompletedGames;
pub use super::game_sessions::Entity as GameSessions;
pub use super::players::Entity as Players;
pub use super::words::Entity as Words;
