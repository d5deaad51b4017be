// Lexical layer for Verse Loom.
//
// Provides everything the poem generators need to turn one word into many:
// frequency and spelling oracles, a local rhyme dictionary, a pluggable
// relation provider (Datamuse-style HTTP service or an in-memory table),
// candidate filtering, a similarity guard, and the composed relation query
// operations on `WordBank`.
//
// Architecture:
// - `freq.rs`: `FreqTable` — static corpus frequencies + rarity sort
// - `spell.rs`: `SpellDict` — spelling dictionary, fail-fast load
// - `rhyme.rs`: `RhymeDict` — groups of mutually rhyming words
// - `filter.rs`: candidate word filtering and input validation
// - `similarity.rs`: "too similar to co-occur" heuristic
// - `sample.rs`: random sampling of candidate pools
// - `provider.rs`: `RelationProvider` trait + HTTP/table implementations
// - `relations.rs`: `WordBank` — the query operations themselves
//
// Default resources are embedded from the workspace `data/` directory via
// `include_str!`, so a `WordBank` can be built with no filesystem access.
// All stochastic operations take `rng: &mut impl Rng`; nothing in this
// crate holds mutable state across calls.

pub mod filter;
pub mod freq;
pub mod provider;
pub mod relations;
pub mod rhyme;
pub mod sample;
pub mod similarity;
pub mod spell;

pub use filter::{UNFITTING_WORDS, has_invalid_characters, validate_word};
pub use freq::{FreqTable, WORD_FREQUENCY_THRESHOLD};
pub use provider::{Candidate, DatamuseClient, RelationKind, RelationProvider, TableProvider};
pub use relations::WordBank;
pub use rhyme::RhymeDict;
pub use sample::extract_sample;
pub use similarity::{too_similar, too_similar_to_any};
pub use spell::SpellDict;

/// Errors from the lexical layer.
///
/// Empty query results are never errors — every relation operation returns
/// an empty list or `None` for "nothing found". Only malformed input words
/// and missing/broken startup resources surface here.
#[derive(Debug)]
pub enum LexError {
    /// A caller-supplied word contains whitespace, digits, hyphens, or
    /// apostrophes. Raised before any provider call.
    InvalidWord(String),
    /// A startup resource (spelling dictionary, frequency table, rhyme
    /// dictionary) is missing or malformed. Fatal at initialization.
    Resource(String),
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::InvalidWord(word) => write!(
                f,
                "word '{word}' may not contain digits, spaces, or special characters"
            ),
            LexError::Resource(msg) => write!(f, "lexical resource error: {msg}"),
        }
    }
}

impl std::error::Error for LexError {}
