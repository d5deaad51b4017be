// Rhyme dictionary.
//
// A pure local lookup, no network: words are partitioned into groups that
// share a rime, and the rhymes of a word are the other members of its
// group. Phonetic dictionaries return exact duplicates, so lookup uses set
// semantics. The default dictionary is embedded from
// `data/rhyme_groups.json`.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::LexError;

/// The top-level JSON structure for the rhyme groups file.
#[derive(Debug, Deserialize)]
struct RhymeGroupsFile {
    groups: Vec<Vec<String>>,
}

/// Local rhyme dictionary: groups of mutually rhyming words.
#[derive(Debug, Clone)]
pub struct RhymeDict {
    /// Word (lowercase) to index into `groups`.
    group_of: HashMap<String, usize>,
    groups: Vec<Vec<String>>,
}

impl RhymeDict {
    /// Parse a rhyme dictionary from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, LexError> {
        let file: RhymeGroupsFile = serde_json::from_str(json)
            .map_err(|e| LexError::Resource(format!("rhyme dictionary: {e}")))?;
        let mut group_of = HashMap::new();
        for (i, group) in file.groups.iter().enumerate() {
            for word in group {
                group_of.insert(word.to_lowercase(), i);
            }
        }
        Ok(RhymeDict {
            group_of,
            groups: file.groups,
        })
    }

    /// Load a rhyme dictionary from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, LexError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| LexError::Resource(format!("rhyme dictionary {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// The default dictionary embedded at compile time.
    ///
    /// Panics if the embedded JSON is malformed (cannot happen in a
    /// released build).
    pub fn embedded() -> Self {
        Self::from_json(include_str!("../../data/rhyme_groups.json"))
            .expect("embedded rhyme_groups.json is malformed")
    }

    /// All rhymes of a word: its group minus the word itself, deduplicated.
    /// Unknown words rhyme with nothing.
    pub fn rhymes_of(&self, word: &str) -> Vec<String> {
        let lowered = word.to_lowercase();
        let Some(&idx) = self.group_of.get(&lowered) else {
            return Vec::new();
        };
        let set: BTreeSet<&str> = self.groups[idx]
            .iter()
            .map(String::as_str)
            .filter(|w| w.to_lowercase() != lowered)
            .collect();
        set.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rhymes_of_known_word() {
        let dict = RhymeDict::embedded();
        let mut rhymes = dict.rhymes_of("clouds");
        rhymes.sort();
        assert_eq!(rhymes, vec!["crowds".to_string(), "shrouds".to_string()]);
    }

    #[test]
    fn test_rhymes_of_excludes_self() {
        let dict = RhymeDict::embedded();
        let rhymes = dict.rhymes_of("sprouting");
        assert!(!rhymes.is_empty());
        assert!(!rhymes.contains(&"sprouting".to_string()));
    }

    #[test]
    fn test_rhymes_of_unknown_word() {
        let dict = RhymeDict::embedded();
        assert!(dict.rhymes_of("metamorphosis").is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let dict =
            RhymeDict::from_json(r#"{"groups": [["moon", "june", "june", "soon"]]}"#).unwrap();
        let mut rhymes = dict.rhymes_of("moon");
        rhymes.sort();
        assert_eq!(rhymes, vec!["june".to_string(), "soon".to_string()]);
    }
}
