use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

use crate::scoring::WIN_SCORE;

const BUILTIN_WORDS: &str = include_str!("../words/default.txt");

/// Normalized list of words and phrases available to the catalog.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Parse a newline-separated word list. Blank lines and `#` comments are
    /// skipped, entries are uppercased and invalid entries dropped.
    pub fn from_word_list(word_list: &str) -> Self {
        let mut seen = HashSet::new();
        let mut words = Vec::new();

        for line in word_list.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match Self::normalize(line) {
                Some(word) => {
                    if seen.insert(word.clone()) {
                        words.push(word);
                    }
                }
                None => warn!("Skipping invalid word list entry '{}'", line),
            }
        }

        Self { words }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {}", path.display()))?;
        Ok(Self::from_word_list(&contents))
    }

    pub fn builtin() -> Self {
        Self::from_word_list(BUILTIN_WORDS)
    }

    /// Uppercase a word and collapse inner whitespace. Returns `None` unless
    /// the word is letters and single spaces with at least one letter.
    pub fn normalize(word: &str) -> Option<String> {
        let normalized = word
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();

        if Self::is_valid_word(&normalized) {
            Some(normalized)
        } else {
            None
        }
    }

    /// Check if word contains only letters and spaces, and at least one letter.
    /// A word with `WIN_SCORE` or more distinct letters is rejected so a lost
    /// game always scores below a win.
    pub fn is_valid_word(word: &str) -> bool {
        word.chars().any(char::is_alphabetic)
            && word.chars().all(|c| c.is_alphabetic() || c == ' ')
            && Self::distinct_letters(word) < WIN_SCORE as usize
    }

    /// Number of distinct letters, ignoring case and spaces
    pub fn distinct_letters(word: &str) -> usize {
        word.chars()
            .filter(|c| c.is_alphabetic())
            .flat_map(char::to_uppercase)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
