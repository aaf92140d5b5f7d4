use chrono::{DateTime, Utc};
use hangman_types::{GameResult, GameSnapshot, PlayerId, SessionId, Word};
use uuid::Uuid;

use crate::hidden_word;
use crate::letter_set::{self, LetterSet};
use crate::scoring::ScoringEngine;

pub const MAX_ATTEMPTS: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Active)
    }

    pub fn result(&self) -> Option<GameResult> {
        match self {
            SessionState::Active => None,
            SessionState::Won => Some(GameResult::Won),
            SessionState::Lost => Some(GameResult::Lost),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuessOutcome {
    pub state: SessionState,
    pub snapshot: GameSnapshot,
    /// The letter had already been tried; nothing changed
    pub repeated: bool,
}

/// One player's in-progress attempt at one word.
///
/// `version` counts successful saves. A session that has never been stored
/// has version 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub player_id: PlayerId,
    pub word: Word,
    pub guessed_letters: LetterSet,
    pub remaining_attempts: i32,
    pub started_at: DateTime<Utc>,
    pub version: i32,
}

impl Session {
    pub fn new(player_id: PlayerId, word: Word) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            word,
            guessed_letters: LetterSet::new(),
            remaining_attempts: MAX_ATTEMPTS,
            started_at: Utc::now(),
            version: 0,
        }
    }

    /// The word being guessed, uppercased
    pub fn secret(&self) -> String {
        self.word.text.to_uppercase()
    }

    pub fn hidden_word(&self) -> String {
        hidden_word::render(&self.secret(), &self.guessed_letters)
    }

    pub fn is_complete(&self) -> bool {
        self.hidden_word() == self.secret()
    }

    pub fn state(&self) -> SessionState {
        // Completion wins over running out of attempts on the same guess
        if self.is_complete() {
            SessionState::Won
        } else if self.remaining_attempts <= 0 {
            SessionState::Lost
        } else {
            SessionState::Active
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    pub fn score(&self) -> i32 {
        ScoringEngine::score(
            &self.secret(),
            &self.guessed_letters,
            self.is_complete(),
            self.remaining_attempts,
        )
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let secret = self.secret();
        let hidden_word = hidden_word::render(&secret, &self.guessed_letters);
        let is_complete = hidden_word == secret;

        GameSnapshot {
            hidden_word,
            guessed_letters: self.guessed_letters.iter().copied().collect(),
            remaining_attempts: self.remaining_attempts,
            is_complete,
            score: ScoringEngine::score(
                &secret,
                &self.guessed_letters,
                is_complete,
                self.remaining_attempts,
            ),
        }
    }

    /// Apply one guessed letter.
    ///
    /// Repeated letters and guesses against a finished session leave the
    /// session untouched and report its current snapshot.
    pub fn apply_guess(&mut self, letter: char) -> GuessOutcome {
        let letter = letter_set::normalize_letter(letter);

        if self.is_terminal() || self.guessed_letters.contains(&letter) {
            return GuessOutcome {
                state: self.state(),
                snapshot: self.snapshot(),
                repeated: true,
            };
        }

        self.guessed_letters.insert(letter);

        if !self.secret().contains(letter) && self.remaining_attempts > 0 {
            self.remaining_attempts -= 1;
        }

        GuessOutcome {
            state: self.state(),
            snapshot: self.snapshot(),
            repeated: false,
        }
    }
}
