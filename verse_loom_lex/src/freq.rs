// Word frequency oracle and rarity ranking.
//
// `FreqTable` is a pure lookup over a static corpus table loaded from JSON.
// Unknown words have frequency 0.0, which places them below the filter
// threshold. The default table is embedded at compile time from
// `data/word_frequencies.json`.
//
// `sort_by_rarity` orders a word list rarest-first with a recursive
// first-element-pivot partition. Corpus sizes here are tens of words, so
// the quadratic worst case is irrelevant.

use std::collections::HashMap;
use std::path::Path;

use crate::LexError;

/// Words rarer than this are considered too archaic or garbled for output.
/// Scaled to the reference corpus; selects moderately common-to-rare words.
pub const WORD_FREQUENCY_THRESHOLD: f64 = 4e-8;

/// Static word-frequency table.
#[derive(Debug, Clone)]
pub struct FreqTable {
    entries: HashMap<String, f64>,
}

impl FreqTable {
    /// Parse a table from a JSON object mapping word to frequency.
    pub fn from_json(json: &str) -> Result<Self, LexError> {
        let entries: HashMap<String, f64> = serde_json::from_str(json)
            .map_err(|e| LexError::Resource(format!("frequency table: {e}")))?;
        Ok(FreqTable { entries })
    }

    /// Load a table from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, LexError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| LexError::Resource(format!("frequency table {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// The default table embedded at compile time.
    ///
    /// Panics if the embedded JSON is malformed (cannot happen in a
    /// released build).
    pub fn embedded() -> Self {
        let json = include_str!("../../data/word_frequencies.json");
        Self::from_json(json).expect("embedded word_frequencies.json is malformed")
    }

    /// Frequency of a word in the corpus; 0.0 for unknown words.
    /// Lookup is case-insensitive.
    pub fn frequency(&self, word: &str) -> f64 {
        self.entries
            .get(&word.to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }

    /// Sort a word list from rarest to most common.
    ///
    /// Recursive partition on the first element: strictly rarer words
    /// before the pivot, equal-or-more-common after. The output is a
    /// permutation of the input.
    pub fn sort_by_rarity(&self, words: &[String]) -> Vec<String> {
        if words.len() <= 1 {
            return words.to_vec();
        }
        let pivot_freq = self.frequency(&words[0]);
        let rarer: Vec<String> = words[1..]
            .iter()
            .filter(|w| self.frequency(w) < pivot_freq)
            .cloned()
            .collect();
        let commoner: Vec<String> = words[1..]
            .iter()
            .filter(|w| self.frequency(w) >= pivot_freq)
            .cloned()
            .collect();

        let mut sorted = self.sort_by_rarity(&rarer);
        sorted.push(words[0].clone());
        sorted.extend(self.sort_by_rarity(&commoner));
        sorted
    }
}
