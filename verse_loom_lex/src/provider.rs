// Lexical relation provider.
//
// The one network-bound dependency. `RelationProvider` is the seam: the
// real implementation is a blocking Datamuse-style HTTP client with a
// call-level timeout; `TableProvider` is a deterministic in-memory stand-in
// for tests and offline use.
//
// Failure semantics: the provider has no guaranteed availability, so every
// transport or decode error degrades to an empty candidate list (logged at
// warn), never an error. Empty results are a legitimate outcome that the
// query layer and the poem generators must tolerate.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;

/// The relation kinds the external provider answers.
///
/// Rhymes are not here: they come from the local `RhymeDict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Similar-sounding words (Datamuse `sl`).
    SoundsLike,
    /// Similar-meaning words (Datamuse `ml`).
    MeansLike,
    /// Contextual co-occurrence within documents (Datamuse `rel_trg`).
    Triggers,
    /// Words that frequently follow the input (Datamuse `lc`).
    FrequentFollower,
}

impl RelationKind {
    /// The Datamuse query parameter for this relation.
    fn query_param(self) -> &'static str {
        match self {
            RelationKind::SoundsLike => "sl",
            RelationKind::MeansLike => "ml",
            RelationKind::Triggers => "rel_trg",
            RelationKind::FrequentFollower => "lc",
        }
    }
}

/// One ranked provider result.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub word: String,
    /// Provider relevance score; only the ordering matters downstream.
    pub score: f64,
}

/// A source of ranked candidate words for a relation kind.
///
/// Implementations must preserve the provider's relevance ordering and
/// return an empty list (not an error) when nothing is found or the
/// backend is unreachable.
pub trait RelationProvider {
    fn lookup(&self, kind: RelationKind, word: &str, max: Option<usize>) -> Vec<Candidate>;
}

/// Wire format of one Datamuse result entry.
#[derive(Debug, Deserialize)]
struct WireEntry {
    word: String,
    #[serde(default)]
    score: f64,
}

/// Blocking HTTP client for a Datamuse-style word API.
pub struct DatamuseClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

/// Public Datamuse endpoint.
const DEFAULT_BASE_URL: &str = "https://api.datamuse.com/words";

/// The provider is the only blocking dependency; cap every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

impl DatamuseClient {
    /// Build a client against the public endpoint.
    pub fn new() -> Result<Self, crate::LexError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Build a client against an alternate endpoint (e.g. a local mirror).
    pub fn with_base_url(base_url: &str) -> Result<Self, crate::LexError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| crate::LexError::Resource(format!("http client: {e}")))?;
        Ok(DatamuseClient {
            client,
            base_url: base_url.to_string(),
        })
    }

    fn fetch(
        &self,
        kind: RelationKind,
        word: &str,
        max: Option<usize>,
    ) -> Result<Vec<WireEntry>, reqwest::Error> {
        let mut request = self
            .client
            .get(&self.base_url)
            .query(&[(kind.query_param(), word)]);
        if let Some(max) = max {
            request = request.query(&[("max", max.to_string())]);
        }
        request.send()?.error_for_status()?.json()
    }
}

impl RelationProvider for DatamuseClient {
    fn lookup(&self, kind: RelationKind, word: &str, max: Option<usize>) -> Vec<Candidate> {
        match self.fetch(kind, word, max) {
            Ok(entries) => {
                debug!("{kind:?}({word}): {} candidates", entries.len());
                entries
                    .into_iter()
                    .map(|e| Candidate {
                        word: e.word,
                        score: e.score,
                    })
                    .collect()
            }
            Err(e) => {
                warn!("provider lookup {kind:?}({word}) failed, returning empty: {e}");
                Vec::new()
            }
        }
    }
}

/// Deterministic in-memory provider for tests and offline runs.
///
/// Stores ranked candidate lists per (kind, word); anything not inserted
/// looks up as empty, which mirrors the degraded-network behavior.
#[derive(Debug, Default)]
pub struct TableProvider {
    entries: HashMap<(RelationKind, String), Vec<Candidate>>,
}

impl TableProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register ranked candidates for a (kind, word) pair, most relevant
    /// first. Scores are synthesized from the ordering.
    pub fn insert(&mut self, kind: RelationKind, word: &str, candidates: &[&str]) {
        let ranked = candidates
            .iter()
            .enumerate()
            .map(|(i, w)| Candidate {
                word: w.to_string(),
                score: (candidates.len() - i) as f64,
            })
            .collect();
        self.entries.insert((kind, word.to_string()), ranked);
    }
}

impl RelationProvider for TableProvider {
    fn lookup(&self, kind: RelationKind, word: &str, max: Option<usize>) -> Vec<Candidate> {
        let mut results = self
            .entries
            .get(&(kind, word.to_string()))
            .cloned()
            .unwrap_or_default();
        if let Some(max) = max {
            results.truncate(max);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_provider_preserves_order() {
        let mut provider = TableProvider::new();
        provider.insert(RelationKind::SoundsLike, "crypt", &["script", "cryptic", "crypts"]);
        let results = provider.lookup(RelationKind::SoundsLike, "crypt", None);
        let words: Vec<&str> = results.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["script", "cryptic", "crypts"]);
    }

    #[test]
    fn test_table_provider_respects_max() {
        let mut provider = TableProvider::new();
        provider.insert(RelationKind::MeansLike, "ghost", &["spirit", "phantom", "wraith"]);
        let results = provider.lookup(RelationKind::MeansLike, "ghost", Some(2));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].word, "spirit");
    }

    #[test]
    fn test_unknown_word_is_empty_not_error() {
        let provider = TableProvider::new();
        assert!(provider.lookup(RelationKind::Triggers, "anything", Some(10)).is_empty());
    }

    #[test]
    fn test_query_params() {
        assert_eq!(RelationKind::SoundsLike.query_param(), "sl");
        assert_eq!(RelationKind::MeansLike.query_param(), "ml");
        assert_eq!(RelationKind::Triggers.query_param(), "rel_trg");
        assert_eq!(RelationKind::FrequentFollower.query_param(), "lc");
    }
}
