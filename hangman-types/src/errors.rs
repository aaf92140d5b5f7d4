use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    PlayerNotFound { player_id: PlayerId },
    NoWordsAvailable,
    NoActiveSession { player_id: PlayerId },
    SessionConflict { player_id: PlayerId },
    InvalidLetter { letter: String },
    InvalidWord { word: String },
    InvalidPlayerName,
}

impl GameError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GameError::PlayerNotFound { .. }
                | GameError::NoWordsAvailable
                | GameError::NoActiveSession { .. }
        )
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::PlayerNotFound { player_id } => {
                write!(f, "Player not found: {}", player_id)
            }
            GameError::NoWordsAvailable => write!(f, "No words available"),
            GameError::NoActiveSession { player_id } => {
                write!(f, "No game in progress for player {}", player_id)
            }
            GameError::SessionConflict { player_id } => {
                write!(f, "Game for player {} was modified concurrently", player_id)
            }
            GameError::InvalidLetter { letter } => write!(f, "Invalid letter: '{}'", letter),
            GameError::InvalidWord { word } => write!(f, "Invalid word: '{}'", word),
            GameError::InvalidPlayerName => write!(f, "Player name must not be empty"),
        }
    }
}

impl std::error::Error for GameError {}
