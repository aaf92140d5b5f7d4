use crate::letter_set::LetterSet;

pub const PLACEHOLDER: char = '_';

/// Render the secret word with every unguessed letter replaced by
/// [`PLACEHOLDER`]. Spaces are always shown.
pub fn render(word: &str, guessed: &LetterSet) -> String {
    word.chars()
        .map(|c| {
            if c == ' ' || guessed.contains(&c) {
                c
            } else {
                PLACEHOLDER
            }
        })
        .collect()
}
