//! Text encoding of the set of letters a player has already tried.
//!
//! The encoding is a comma-separated list of single characters, e.g. `"A,E,T"`.
//! Decoding is lenient: blank segments are skipped and only the first
//! character of every trimmed segment is kept.

use std::collections::BTreeSet;

pub type LetterSet = BTreeSet<char>;

/// Uppercase a guessed letter. Letters whose uppercase form expands to
/// several characters keep only the first one.
pub fn normalize_letter(letter: char) -> char {
    letter.to_uppercase().next().unwrap_or(letter)
}

pub fn encode(letters: &LetterSet) -> String {
    letters
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn decode(encoded: Option<&str>) -> LetterSet {
    let Some(encoded) = encoded else {
        return LetterSet::new();
    };

    encoded
        .split(',')
        .map(str::trim)
        .filter_map(|segment| segment.chars().next())
        .collect()
}
