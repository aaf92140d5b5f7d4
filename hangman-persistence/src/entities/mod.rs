pub mod prelude;

pub mod completed_games;
pub mod game_sessions;
pub mod players;
pub mod words;
