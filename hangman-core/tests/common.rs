#![allow(dead_code)]

use hangman_core::{GuessOutcome, Session};
use hangman_types::Word;
use uuid::Uuid;

/// Creates a word that is already assigned to a session
pub fn create_test_word(text: &str) -> Word {
    Word {
        id: Uuid::new_v4(),
        text: text.to_uppercase(),
        used: true,
    }
}

/// Creates a fresh session for a random player
pub fn create_session_with_word(text: &str) -> Session {
    Session::new(Uuid::new_v4(), create_test_word(text))
}

/// Applies every letter in order and returns each outcome
pub fn play(session: &mut Session, letters: &str) -> Vec<GuessOutcome> {
    letters.chars().map(|letter| session.apply_guess(letter)).collect()
}

/// Hidden words reported after each guess
pub fn hidden_words(outcomes: &[GuessOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .map(|o| o.snapshot.hidden_word.clone())
        .collect()
}
