use crate::{GameId, PlayerId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// What a client sees of a session after every start or guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameSnapshot {
    pub hidden_word: String,
    pub guessed_letters: Vec<char>,
    pub remaining_attempts: i32,
    pub is_complete: bool,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum GameResult {
    Won,
    Lost,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::Won => "WON",
            GameResult::Lost => "LOST",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WON" => Ok(GameResult::Won),
            "LOST" => Ok(GameResult::Lost),
            other => Err(format!("unknown game result: {}", other)),
        }
    }
}

/// A finished game as recorded in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CompletedGameView {
    pub id: GameId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub result: GameResult,
    pub score: i32,
    pub played_at: String, // ISO 8601 string
    pub word: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScoreboardEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub total_score: i32,
    pub games_played: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GuessRequest {
    pub player_id: PlayerId,
    pub letter: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_uses_camel_case_fields() {
        let snapshot = GameSnapshot {
            hidden_word: "G___".to_string(),
            guessed_letters: vec!['G'],
            remaining_attempts: 7,
            is_complete: false,
            score: 0,
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["hiddenWord"], "G___");
        assert_eq!(json["guessedLetters"][0], "G");
        assert_eq!(json["remainingAttempts"], 7);
        assert_eq!(json["isComplete"], false);
        assert_eq!(json["score"], 0);
    }

    #[test]
    fn test_game_result_wire_format() {
        assert_eq!(serde_json::to_string(&GameResult::Won).unwrap(), "\"WON\"");
        assert_eq!(serde_json::to_string(&GameResult::Lost).unwrap(), "\"LOST\"");
        assert_eq!("WON".parse::<GameResult>(), Ok(GameResult::Won));
        assert_eq!("LOST".parse::<GameResult>(), Ok(GameResult::Lost));
        assert!("won".parse::<GameResult>().is_err());
    }

    #[test]
    fn test_guess_request_parsing() {
        let id = uuid::Uuid::new_v4();
        let body = format!(r#"{{"playerId":"{}","letter":"p"}}"#, id);
        let request: GuessRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(request.player_id, id);
        assert_eq!(request.letter, "p");
    }
}
