use crate::letter_set::LetterSet;

/// Awarded for revealing the whole word, regardless of attempts used
pub const WIN_SCORE: i32 = 20;
/// Awarded per distinct correct letter when the game is lost
pub const POINTS_PER_LETTER: i32 = 1;

pub struct ScoringEngine;

impl ScoringEngine {
    /// Score a session. Used both for the provisional score reported after
    /// every guess and for the final score written to the ledger.
    ///
    /// A loss never reaches `WIN_SCORE`. The word list already rejects words
    /// with that many distinct letters; words stored some other way are
    /// capped here.
    pub fn score(word: &str, guessed: &LetterSet, is_complete: bool, remaining_attempts: i32) -> i32 {
        if is_complete {
            WIN_SCORE
        } else if remaining_attempts <= 0 {
            (Self::correct_letters(word, guessed) * POINTS_PER_LETTER).min(WIN_SCORE - 1)
        } else {
            0
        }
    }

    /// Distinct guessed letters that occur in the word
    pub fn correct_letters(word: &str, guessed: &LetterSet) -> i32 {
        guessed.iter().filter(|letter| word.contains(**letter)).count() as i32
    }
}
