// Candidate word filtering.
//
// Raw provider results are noisy: abbreviations, fragments, proper nouns,
// archaic words. `LexFilter` rejects anything too short, with forbidden
// characters, below the frequency threshold, failing spellcheck (when
// enabled), or on an exclude list. The deny-list of provider artifacts is
// always applied on top of whatever the caller excludes.
//
// The exclude list is fixed for a whole pass over a list. Callers that want
// increasing de-duplication across successive provider calls compose a
// growing exclude set themselves (see `relations.rs`).

use crate::LexError;
use crate::freq::{FreqTable, WORD_FREQUENCY_THRESHOLD};
use crate::spell::SpellDict;

/// Provider artifacts that disrupt poetic flow, always filtered out.
pub const UNFITTING_WORDS: &[&str] = &[
    "thew", "iii", "arr", "atty", "haj", "pao", "gea", "ning", "mor", "mar", "iss", "eee",
];

/// Check whether a string has unpermitted characters: whitespace, digits,
/// hyphens, or apostrophes.
pub fn has_invalid_characters(word: &str) -> bool {
    word.chars()
        .any(|c| c.is_whitespace() || c.is_ascii_digit() || c == '-' || c == '\'')
}

/// Validate a caller-supplied word before any provider call.
pub fn validate_word(word: &str) -> Result<(), LexError> {
    if word.is_empty() || has_invalid_characters(word) {
        return Err(LexError::InvalidWord(word.to_string()));
    }
    Ok(())
}

/// A filtering pass over candidate words, borrowing the oracles it needs.
pub struct LexFilter<'a> {
    freq: &'a FreqTable,
    spell: &'a SpellDict,
}

impl<'a> LexFilter<'a> {
    pub fn new(freq: &'a FreqTable, spell: &'a SpellDict) -> Self {
        LexFilter { freq, spell }
    }

    /// Decide whether a single candidate word survives filtering.
    ///
    /// Rejects when: shorter than 3 characters; invalid characters;
    /// frequency below the threshold; spellcheck enabled and the word is
    /// not in the dictionary; the word is excluded or on the deny-list.
    pub fn keep(&self, word: &str, spellcheck: bool, exclude: &[String]) -> bool {
        if word.len() < 3 {
            return false;
        }
        if has_invalid_characters(word) {
            return false;
        }
        if self.freq.frequency(word) < WORD_FREQUENCY_THRESHOLD {
            return false;
        }
        if spellcheck && !self.spell.check(word) {
            return false;
        }
        if UNFITTING_WORDS.contains(&word) {
            return false;
        }
        if exclude.iter().any(|e| e == word) {
            return false;
        }
        true
    }

    /// Filter a list of candidates, preserving order. The same exclude list
    /// applies to every element.
    pub fn keep_all(
        &self,
        words: Vec<String>,
        spellcheck: bool,
        exclude: &[String],
    ) -> Vec<String> {
        words
            .into_iter()
            .filter(|w| self.keep(w, spellcheck, exclude))
            .collect()
    }
}
