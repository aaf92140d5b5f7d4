pub mod catalog;
pub mod errors;
pub mod game;

use uuid::Uuid;

pub type PlayerId = Uuid;
pub type WordId = Uuid;
pub type SessionId = Uuid;
pub type GameId = Uuid;

// Re-export all types
pub use catalog::*;
pub use errors::*;
pub use game::*;
