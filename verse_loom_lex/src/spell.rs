// Spelling oracle.
//
// A plain word-set dictionary standing in for hunspell: a word is spelled
// correctly if it appears in the set. The dictionary is a startup resource;
// a missing or unreadable file is a fatal configuration error surfaced by
// `load`, never a per-call failure. The default dictionary is embedded at
// compile time from `data/english_words.txt` (one word per line).

use std::collections::HashSet;
use std::path::Path;

use crate::LexError;

/// Spelling dictionary backed by a word set. Case-insensitive.
#[derive(Debug, Clone)]
pub struct SpellDict {
    words: HashSet<String>,
}

impl SpellDict {
    /// Build a dictionary from newline-separated word list contents.
    /// Blank lines and `#` comments are skipped.
    pub fn from_word_list(contents: &str) -> Self {
        let words = contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        SpellDict { words }
    }

    /// Load a dictionary from a file on disk. Absence of the file is a
    /// fatal configuration error: callers should abort initialization.
    pub fn load(path: &Path) -> Result<Self, LexError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LexError::Resource(format!(
                "spelling dictionary {} could not be read: {e}",
                path.display()
            ))
        })?;
        let dict = Self::from_word_list(&contents);
        if dict.words.is_empty() {
            return Err(LexError::Resource(format!(
                "spelling dictionary {} is empty",
                path.display()
            )));
        }
        Ok(dict)
    }

    /// The default dictionary embedded at compile time.
    pub fn embedded() -> Self {
        Self::from_word_list(include_str!("../../data/english_words.txt"))
    }

    /// Whether the word is in the dictionary.
    pub fn check(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Number of words in the dictionary.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
