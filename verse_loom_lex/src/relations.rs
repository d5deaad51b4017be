// Relation query operations.
//
// `WordBank` owns the relation provider and the three local oracles
// (frequency, spelling, rhyme) and exposes one operation per relation
// kind, plus the composed operations `phonetically_related_words` and
// `related_rare_words`. All operations share one shape: query the provider
// for each input word, filter, accumulate, then down-sample.
//
// Ordering contract: the provider's relevance order is preserved up to the
// point of filtering; sampling happens only after filtering.
//
// Spellcheck policy: enabled for phonetic relations (rhyme, sounds-like),
// disabled for meaning/contextual/following relations — the dictionary
// strips valid-but-uncommon words and the closed-class function words
// needed for natural continuations.
//
// Singular variants are the plural operation with a sample size of 1;
// "no result" is a legitimate `None`, never an error.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::LexError;
use crate::filter::{LexFilter, validate_word};
use crate::freq::FreqTable;
use crate::provider::{RelationKind, RelationProvider};
use crate::rhyme::RhymeDict;
use crate::sample::extract_sample;
use crate::similarity::too_similar;
use crate::spell::SpellDict;

/// Provider cap used by singular sounds-like lookups.
const SIMILAR_SOUNDING_WORD_MAX: usize = 20;
/// Provider cap used by singular meaning/contextual/following lookups.
const SINGLE_WORD_MAX: usize = 10;
/// Provider cap for the sounds-like half of phonetic expansion.
const PHONETIC_API_MAX: usize = 50;
/// Provider cap for the broad pools feeding the rare-word composition.
const RARE_POOL_API_MAX: usize = 100;
/// Rarest-entry cutoff used by the singular rare-word lookup.
const RARE_WORD_POPULATION_SINGLE: usize = 10;
/// Sample size feeding the singular following-word pick; above the
/// rarity-weighting cutoff so the draw is biased toward rare entries.
const FOLLOWING_POOL_SAMPLE: usize = 8;

/// The lexical knowledge a poem generation run draws from.
///
/// Holds no mutable state; every stochastic operation takes
/// `rng: &mut impl Rng`, so one bank can serve concurrent generations.
pub struct WordBank {
    provider: Box<dyn RelationProvider>,
    freq: FreqTable,
    spell: SpellDict,
    rhyme: RhymeDict,
}

impl WordBank {
    pub fn new(
        provider: Box<dyn RelationProvider>,
        freq: FreqTable,
        spell: SpellDict,
        rhyme: RhymeDict,
    ) -> Self {
        WordBank {
            provider,
            freq,
            spell,
            rhyme,
        }
    }

    /// Build a bank from the given provider and the embedded default
    /// oracles.
    pub fn with_embedded_oracles(provider: Box<dyn RelationProvider>) -> Self {
        Self::new(
            provider,
            FreqTable::embedded(),
            SpellDict::embedded(),
            RhymeDict::embedded(),
        )
    }

    /// The frequency oracle, for rarity decisions outside the bank.
    pub fn freq(&self) -> &FreqTable {
        &self.freq
    }

    fn filter(&self) -> LexFilter<'_> {
        LexFilter::new(&self.freq, &self.spell)
    }

    /// Candidate words from the provider, filtered, de-duplicated against
    /// `exclude`, in provider order.
    fn query_filtered(
        &self,
        kind: RelationKind,
        word: &str,
        api_max: Option<usize>,
        spellcheck: bool,
        exclude: &[String],
    ) -> Vec<String> {
        let raw: Vec<String> = self
            .provider
            .lookup(kind, word, api_max)
            .into_iter()
            .map(|c| c.word)
            .collect();
        self.filter().keep_all(raw, spellcheck, exclude)
    }

    /// Rhymes of the input words, in randomized order.
    ///
    /// Uses the local rhyme dictionary (set semantics before filtering),
    /// spellcheck enabled.
    pub fn rhymes(
        &self,
        words: &[String],
        sample_size: Option<usize>,
        rng: &mut impl Rng,
    ) -> Vec<String> {
        let mut collected: Vec<String> = Vec::new();
        for word in words {
            let candidates = self.rhyme.rhymes_of(word);
            collected.extend(self.filter().keep_all(candidates, true, &[]));
        }
        extract_sample(collected, sample_size, rng)
    }

    /// A random rhyme for the word, if any exists.
    pub fn rhyme(&self, word: &str, rng: &mut impl Rng) -> Option<String> {
        self.rhymes(std::slice::from_ref(&word.to_string()), Some(1), rng)
            .into_iter()
            .next()
    }

    /// Similar-sounding words, in randomized order. Spellcheck enabled;
    /// the input words and already-collected results are excluded.
    pub fn similar_sounding_words(
        &self,
        words: &[String],
        sample_size: Option<usize>,
        api_max: Option<usize>,
        rng: &mut impl Rng,
    ) -> Vec<String> {
        let mut collected: Vec<String> = Vec::new();
        for word in words {
            let mut exclude: Vec<String> = words.to_vec();
            exclude.extend(collected.iter().cloned());
            collected.extend(self.query_filtered(
                RelationKind::SoundsLike,
                word,
                api_max,
                true,
                &exclude,
            ));
        }
        extract_sample(collected, sample_size, rng)
    }

    /// A random similar-sounding word, if any exists.
    pub fn similar_sounding_word(&self, word: &str, rng: &mut impl Rng) -> Option<String> {
        self.similar_sounding_words(
            std::slice::from_ref(&word.to_string()),
            Some(1),
            Some(SIMILAR_SOUNDING_WORD_MAX),
            rng,
        )
        .into_iter()
        .next()
    }

    /// Similar-meaning words, in randomized order. Spellcheck disabled:
    /// the dictionary strips valid but uncommon words.
    pub fn similar_meaning_words(
        &self,
        words: &[String],
        sample_size: Option<usize>,
        api_max: Option<usize>,
        rng: &mut impl Rng,
    ) -> Vec<String> {
        let mut collected: Vec<String> = Vec::new();
        for word in words {
            let exclude = collected.clone();
            collected.extend(self.query_filtered(
                RelationKind::MeansLike,
                word,
                api_max,
                false,
                &exclude,
            ));
        }
        extract_sample(collected, sample_size, rng)
    }

    /// A random similar-meaning word, if any exists.
    pub fn similar_meaning_word(&self, word: &str, rng: &mut impl Rng) -> Option<String> {
        self.similar_meaning_words(
            std::slice::from_ref(&word.to_string()),
            Some(1),
            Some(SINGLE_WORD_MAX),
            rng,
        )
        .into_iter()
        .next()
    }

    /// Words that frequently co-occur in the same documents as the inputs,
    /// in randomized order. Validates each input word; spellcheck disabled
    /// (it removes proper nouns).
    pub fn contextually_linked_words(
        &self,
        words: &[String],
        sample_size: Option<usize>,
        api_max: Option<usize>,
        rng: &mut impl Rng,
    ) -> Result<Vec<String>, LexError> {
        let mut collected: Vec<String> = Vec::new();
        for word in words {
            validate_word(word)?;
            let exclude = collected.clone();
            collected.extend(self.query_filtered(
                RelationKind::Triggers,
                word,
                api_max,
                false,
                &exclude,
            ));
        }
        Ok(extract_sample(collected, sample_size, rng))
    }

    /// A random contextually linked word, if any exists.
    ///
    /// Input words reaching this point have already passed character
    /// validation, so a validation error here means a caller bug; it is
    /// treated as "no result".
    pub fn contextually_linked_word(&self, word: &str, rng: &mut impl Rng) -> Option<String> {
        match self.contextually_linked_words(
            std::slice::from_ref(&word.to_string()),
            Some(1),
            Some(SINGLE_WORD_MAX),
            rng,
        ) {
            Ok(results) => results.into_iter().next(),
            Err(_) => None,
        }
    }

    /// Words that frequently follow the inputs, in randomized order.
    /// Spellcheck disabled — it removes continuation words like "of".
    ///
    /// When `sample_size` is greater than 4, the result is rarity-weighted:
    /// a draw from the provider-order prefix plus a draw from the
    /// rarest-first resort of the same pool, so the pick is biased toward
    /// less common continuations without losing all frequent ones.
    pub fn frequently_following_words(
        &self,
        words: &[String],
        sample_size: Option<usize>,
        api_max: Option<usize>,
        rng: &mut impl Rng,
    ) -> Vec<String> {
        let mut collected: Vec<String> = Vec::new();
        for word in words {
            let exclude = collected.clone();
            collected.extend(self.query_filtered(
                RelationKind::FrequentFollower,
                word,
                api_max,
                false,
                &exclude,
            ));
        }
        match sample_size {
            Some(n) if n > 4 => {
                let ending_index = match api_max {
                    None => 20,
                    Some(m) if m % 2 == 1 => m + 1,
                    Some(m) => m,
                };
                let head: Vec<String> = collected.iter().take(ending_index).cloned().collect();
                let rare_head: Vec<String> = self
                    .freq
                    .sort_by_rarity(&collected)
                    .into_iter()
                    .take(ending_index)
                    .collect();
                let mut sampled = extract_sample(head, Some(n - 3), rng);
                sampled.extend(extract_sample(rare_head, Some(n - 3), rng));
                sampled
            }
            _ => extract_sample(collected, sample_size, rng),
        }
    }

    /// A random frequently-following word, if any exists. Drawn from the
    /// rarity-weighted pool so the single pick leans toward less common
    /// continuations.
    pub fn frequently_following_word(&self, word: &str, rng: &mut impl Rng) -> Option<String> {
        let candidates = self.frequently_following_words(
            std::slice::from_ref(&word.to_string()),
            Some(FOLLOWING_POOL_SAMPLE),
            Some(SINGLE_WORD_MAX),
            rng,
        );
        candidates.choose(rng).cloned()
    }

    /// Rhymes plus similar-sounding words for each input, deduplicated
    /// against what is already collected. With a sample size, the running
    /// pool is re-sampled down after each input word.
    pub fn phonetically_related_words(
        &self,
        words: &[String],
        sample_size: Option<usize>,
        api_max: Option<usize>,
        rng: &mut impl Rng,
    ) -> Vec<String> {
        let mut collected: Vec<String> = Vec::new();
        for word in words {
            let single = std::slice::from_ref(word);
            collected.extend(self.rhymes(single, sample_size, rng));
            let sounding = self.similar_sounding_words(single, sample_size, api_max, rng);
            for w in sounding {
                if !collected.contains(&w) {
                    collected.push(w);
                }
            }
            if let Some(n) = sample_size {
                if collected.len() >= n {
                    collected = extract_sample(collected, Some(n), rng);
                }
            }
        }
        collected
    }

    /// A random sample of rare words related to the inputs — phonetically,
    /// contextually, or by meaning. Per input word the union of all three
    /// pools (deduplicated, minus anything too similar to the input) is
    /// truncated to the `rare_word_population_max` rarest entries before
    /// sampling.
    pub fn related_rare_words(
        &self,
        words: &[String],
        sample_size: Option<usize>,
        rare_word_population_max: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<String>, LexError> {
        let mut results: Vec<String> = Vec::new();
        for word in words {
            let single = std::slice::from_ref(word);
            let mut related =
                self.phonetically_related_words(single, None, Some(PHONETIC_API_MAX), rng);
            let contextual =
                self.contextually_linked_words(single, None, Some(RARE_POOL_API_MAX), rng)?;
            for w in contextual {
                if !related.contains(&w) {
                    related.push(w);
                }
            }
            let meaning = self.similar_meaning_words(single, None, Some(RARE_POOL_API_MAX), rng);
            for w in meaning {
                if !related.contains(&w) {
                    related.push(w);
                }
            }
            related.retain(|w| !too_similar(word, w));
            results.extend(
                self.freq
                    .sort_by_rarity(&related)
                    .into_iter()
                    .take(rare_word_population_max),
            );
        }
        Ok(extract_sample(results, sample_size, rng))
    }

    /// A random rare related word, if any exists.
    pub fn related_rare_word(&self, word: &str, rng: &mut impl Rng) -> Option<String> {
        match self.related_rare_words(
            std::slice::from_ref(&word.to_string()),
            Some(1),
            RARE_WORD_POPULATION_SINGLE,
            rng,
        ) {
            Ok(results) => results.into_iter().next(),
            Err(_) => None,
        }
    }
}
