// Word-by-word stochastic poem generation.
//
// Each line grows one word at a time. Every step picks among the relation
// query strategies (never the same strategy twice in a row), consults the
// similarity guard against the whole line so far and the previous line's
// final word, and retries on rejection. Odd-indexed lines try to rhyme
// their final word with the previous line's final word.
//
// All retry loops are bounded: when every attempt of a step comes back
// empty or rejected, generation surfaces `GenError::Exhausted` instead of
// spinning. Generation state lives in `PoemContext`, passed explicitly
// through the call chain.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use verse_loom_lex::{
    WordBank, has_invalid_characters, too_similar, too_similar_to_any, validate_word,
};

use crate::GenError;
use crate::poem::Poem;

/// Closed-class stopwords that change the next-word branch and never serve
/// as rhyme targets.
pub const COMMON_WORDS: &[&str] = &["the", "with", "in", "that", "not", "a", "an"];

/// Retry cap for one word-selection step.
const MAX_ATTEMPTS: usize = 40;

/// Rhyme draws before falling back to the general strategy.
const RHYME_ATTEMPTS: usize = 5;

/// A line stops growing once its joined length is within this many
/// characters of the budget.
const NEAR_BUDGET_SLACK: usize = 6;

/// Provider cap for the phonetic expansion that seeds the pool.
const PHONETIC_API_MAX: usize = 50;

/// The next-word strategies of the general ("random non-rhyme") step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordStrategy {
    SimilarSound,
    SimilarMeaning,
    Contextual,
    FrequentFollower,
}

const ALL_STRATEGIES: &[WordStrategy] = &[
    WordStrategy::SimilarSound,
    WordStrategy::SimilarMeaning,
    WordStrategy::Contextual,
    WordStrategy::FrequentFollower,
];

/// Per-call generation state: the lines finished so far and the strategy
/// pair behind the most recent general-step pick.
#[derive(Debug, Default)]
pub struct PoemContext {
    lines: Vec<String>,
    last_strategy: Option<WordStrategy>,
    last_chained_strategy: Option<WordStrategy>,
}

impl PoemContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn previous_line_last_word(&self) -> Option<&str> {
        self.lines.last().and_then(|l| l.split_whitespace().last())
    }
}

/// Tunables for whole-poem generation.
#[derive(Debug, Clone)]
pub struct MarkovOptions {
    pub num_lines: usize,
    pub min_line_words: usize,
    pub max_line_words: usize,
    /// Character budget per line.
    pub max_line_length: usize,
}

impl Default for MarkovOptions {
    fn default() -> Self {
        MarkovOptions {
            num_lines: 10,
            min_line_words: 5,
            max_line_words: 9,
            max_line_length: 35,
        }
    }
}

/// The stochastic generator. Borrows the word bank; holds no generation
/// state of its own.
pub struct MarkovGenerator<'a> {
    bank: &'a WordBank,
}

impl<'a> MarkovGenerator<'a> {
    pub fn new(bank: &'a WordBank) -> Self {
        MarkovGenerator { bank }
    }

    fn apply_strategy(
        &self,
        strategy: WordStrategy,
        word: &str,
        rng: &mut impl Rng,
    ) -> Option<String> {
        match strategy {
            WordStrategy::SimilarSound => self.bank.similar_sounding_word(word, rng),
            WordStrategy::SimilarMeaning => self.bank.similar_meaning_word(word, rng),
            WordStrategy::Contextual => self.bank.contextually_linked_word(word, rng),
            WordStrategy::FrequentFollower => self.bank.frequently_following_word(word, rng),
        }
    }

    /// Whether a candidate may join the line: valid characters, not too
    /// similar to any word already in the line, not too similar to the
    /// previous line's final word.
    fn word_fits(&self, word: &str, line_words: &[String], ctx: &PoemContext) -> bool {
        !has_invalid_characters(word)
            && !too_similar_to_any(word, line_words.iter().map(String::as_str))
            && ctx
                .previous_line_last_word()
                .is_none_or(|prev| !too_similar(word, prev))
    }

    /// The general next-word step: a random strategy (frequent-follower
    /// weighted double, the previous pick's strategy excluded), applied to
    /// the line's last word 75% of the time and a random line word
    /// otherwise, with a 25% chance of chaining a second distinct strategy
    /// onto the first result.
    fn random_nonrhyme(
        &self,
        line_words: &[String],
        ctx: &mut PoemContext,
        rng: &mut impl Rng,
    ) -> Result<String, GenError> {
        for _ in 0..MAX_ATTEMPTS {
            let mut choices = vec![
                WordStrategy::SimilarSound,
                WordStrategy::SimilarMeaning,
                WordStrategy::Contextual,
                WordStrategy::FrequentFollower,
                WordStrategy::FrequentFollower,
            ];
            if let Some(last) = ctx.last_strategy {
                choices.retain(|s| *s != last);
            }
            let Some(&strategy) = choices.choose(rng) else {
                continue;
            };
            let input: String = if rng.random::<f64>() <= 0.75 {
                match line_words.last() {
                    Some(w) => w.clone(),
                    None => continue,
                }
            } else {
                match line_words.choose(rng) {
                    Some(w) => w.clone(),
                    None => continue,
                }
            };
            let mut result = self.apply_strategy(strategy, &input, rng);
            let mut chained: Option<WordStrategy> = None;
            if rng.random::<f64>() < 0.25 {
                let mut second_choices: Vec<WordStrategy> = ALL_STRATEGIES.to_vec();
                second_choices.retain(|s| *s != strategy);
                if let Some(last) = ctx.last_chained_strategy {
                    second_choices.retain(|s| *s != last);
                }
                if let Some(&second) = second_choices.choose(rng) {
                    // Chain onto the first result, or retry the original
                    // input if the first strategy came up empty.
                    let base = result.clone().unwrap_or_else(|| input.clone());
                    if let Some(word) = self.apply_strategy(second, &base, rng) {
                        result = Some(word);
                        chained = Some(second);
                    }
                }
            }
            if let Some(word) = result {
                if self.word_fits(&word, line_words, ctx) {
                    ctx.last_strategy = Some(strategy);
                    ctx.last_chained_strategy = chained;
                    return Ok(word);
                }
            }
        }
        Err(GenError::Exhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Pick a word for any position except the last.
    ///
    /// After a stopword: 34% a pool draw, else the general step. Otherwise
    /// roll once — above 0.66 the general step, between 0.5 and 0.66 a
    /// pool draw, below 0.5 the bigram-following relation on the last
    /// word. Without a pool the thresholds shift to 0.5/1.
    fn nonlast_word(
        &self,
        line_words: &[String],
        pool: Option<&[String]>,
        ctx: &mut PoemContext,
        rng: &mut impl Rng,
    ) -> Result<String, GenError> {
        for _ in 0..MAX_ATTEMPTS {
            let last = match line_words.last() {
                Some(w) => w.clone(),
                None => return self.random_nonrhyme(line_words, ctx, rng),
            };
            let pool_available = pool.is_some_and(|p| !p.is_empty());
            let candidate: Option<String> = if COMMON_WORDS.contains(&last.as_str()) {
                if pool_available && rng.random::<f64>() < 0.34 {
                    pool.and_then(|p| p.choose(rng)).cloned()
                } else {
                    Some(self.random_nonrhyme(line_words, ctx, rng)?)
                }
            } else {
                let nonrhyme_threshold = if pool_available { 0.66 } else { 0.5 };
                let roll = rng.random::<f64>();
                if roll > nonrhyme_threshold {
                    Some(self.random_nonrhyme(line_words, ctx, rng)?)
                } else if roll > 0.5 {
                    pool.and_then(|p| p.choose(rng)).cloned()
                } else {
                    self.bank.frequently_following_word(&last, rng)
                }
            };
            if let Some(word) = candidate {
                if self.word_fits(&word, line_words, ctx) {
                    return Ok(word);
                }
            }
        }
        Err(GenError::Exhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Pick the final word of a line. With a non-stopword rhyme target,
    /// try the rhyme relation first; fall back to the general step when no
    /// rhyme passes the guard.
    fn last_word(
        &self,
        line_words: &[String],
        rhyme_with: Option<&str>,
        ctx: &mut PoemContext,
        rng: &mut impl Rng,
    ) -> Result<String, GenError> {
        if let Some(target) = rhyme_with {
            if !COMMON_WORDS.contains(&target) {
                for _ in 0..RHYME_ATTEMPTS {
                    match self.bank.rhyme(target, rng) {
                        Some(rhyme) if self.word_fits(&rhyme, line_words, ctx) => {
                            return Ok(rhyme);
                        }
                        Some(_) => {}
                        None => break,
                    }
                }
            }
        }
        self.random_nonrhyme(line_words, ctx, rng)
    }

    /// Generate one line: the starting word, then up to `num_words - 1`
    /// more. The last slot switches to final-word logic, which also takes
    /// over early once the joined length comes within slack of the budget.
    pub fn line(
        &self,
        starting_word: &str,
        num_words: usize,
        rhyme_with: Option<&str>,
        pool: Option<&[String]>,
        max_line_length: usize,
        ctx: &mut PoemContext,
        rng: &mut impl Rng,
    ) -> Result<String, GenError> {
        let mut words = vec![starting_word.to_string()];
        let near_budget = max_line_length.saturating_sub(NEAR_BUDGET_SLACK);
        for i in 1..num_words {
            let joined_len = words.iter().map(String::len).sum::<usize>() + words.len() - 1;
            if joined_len >= near_budget || i == num_words - 1 {
                let word = self.last_word(&words, rhyme_with, ctx, rng)?;
                words.push(word);
                break;
            }
            let word = self.nonlast_word(&words, pool, ctx, rng)?;
            words.push(word);
        }
        Ok(words.join(" "))
    }

    /// Generate a whole poem: expand the seeds phonetically into one pool,
    /// shuffle it once, then pop a fresh starting word per line. Odd lines
    /// (0-indexed) rhyme-target the previous line's final word.
    pub fn poem(
        &self,
        input_words: &[String],
        opts: &MarkovOptions,
        rng: &mut impl Rng,
    ) -> Result<Poem, GenError> {
        for word in input_words {
            validate_word(word)?;
        }
        let mut pool: Vec<String> = input_words.to_vec();
        pool.extend(self.bank.phonetically_related_words(
            input_words,
            None,
            Some(PHONETIC_API_MAX),
            rng,
        ));
        pool.shuffle(rng);

        let mut ctx = PoemContext::new();
        for line_index in 0..opts.num_lines {
            let Some(starting_word) = pool.pop() else {
                return Err(GenError::PoolDrained);
            };
            let rhyme_with: Option<String> = if line_index % 2 == 1 {
                ctx.previous_line_last_word().map(str::to_string)
            } else {
                None
            };
            let num_words = rng.random_range(opts.min_line_words..=opts.max_line_words);
            let line = self.line(
                &starting_word,
                num_words,
                rhyme_with.as_deref(),
                Some(&pool),
                opts.max_line_length,
                &mut ctx,
                rng,
            )?;
            ctx.lines.push(line);
        }
        Ok(Poem::new(input_words.to_vec(), pool, ctx.lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use verse_loom_lex::{RelationKind, TableProvider};

    /// A closed vocabulary where every relation of every word lands back
    /// inside the vocabulary, so bounded retries always find a candidate.
    const VOCAB: &[&str] = &[
        "moon", "river", "stone", "fire", "night", "dream", "rain", "sea", "winter", "shadow",
        "silence", "harbor", "june", "soon", "noon", "tune",
    ];

    fn vocab_bank() -> WordBank {
        let mut provider = TableProvider::new();
        for (i, word) in VOCAB.iter().enumerate() {
            let related: Vec<&str> = (1..=3).map(|k| VOCAB[(i + k) % VOCAB.len()]).collect();
            for kind in [
                RelationKind::SoundsLike,
                RelationKind::MeansLike,
                RelationKind::Triggers,
                RelationKind::FrequentFollower,
            ] {
                provider.insert(kind, word, &related);
            }
        }
        WordBank::with_embedded_oracles(Box::new(provider))
    }

    fn strs(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_line_word_count_and_start() {
        let bank = vocab_bank();
        let generator = MarkovGenerator::new(&bank);
        let pool = strs(VOCAB);
        let mut rng = StdRng::seed_from_u64(21);
        let mut ctx = PoemContext::new();
        let line = generator
            .line("moon", 5, None, Some(&pool), 200, &mut ctx, &mut rng)
            .unwrap();
        let words: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(words.len(), 5);
        assert_eq!(words[0], "moon");
    }

    #[test]
    fn test_line_honors_rhyme_target() {
        let bank = vocab_bank();
        let generator = MarkovGenerator::new(&bank);
        let pool = strs(VOCAB);
        let mut rng = StdRng::seed_from_u64(22);
        let mut ctx = PoemContext::new();
        let line = generator
            .line("river", 4, Some("clouds"), Some(&pool), 200, &mut ctx, &mut rng)
            .unwrap();
        let last = line.split_whitespace().last().unwrap();
        assert!(last == "crowds" || last == "shrouds", "got {last}");
    }

    #[test]
    fn test_stopword_rhyme_target_falls_back() {
        let bank = vocab_bank();
        let generator = MarkovGenerator::new(&bank);
        let pool = strs(VOCAB);
        let mut rng = StdRng::seed_from_u64(23);
        let mut ctx = PoemContext::new();
        let line = generator
            .line("stone", 4, Some("the"), Some(&pool), 200, &mut ctx, &mut rng)
            .unwrap();
        assert_eq!(line.split_whitespace().count(), 4);
    }

    #[test]
    fn test_line_words_avoid_repetition() {
        let bank = vocab_bank();
        let generator = MarkovGenerator::new(&bank);
        let pool = strs(VOCAB);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ctx = PoemContext::new();
            let line = generator
                .line("night", 6, None, Some(&pool), 200, &mut ctx, &mut rng)
                .unwrap();
            let words: Vec<&str> = line.split_whitespace().collect();
            for (i, a) in words.iter().enumerate() {
                for b in &words[i + 1..] {
                    assert!(!too_similar(a, b), "repeated {a}/{b} in {line:?}");
                }
            }
        }
    }

    #[test]
    fn test_near_budget_cuts_line_short() {
        let bank = vocab_bank();
        let generator = MarkovGenerator::new(&bank);
        let pool = strs(VOCAB);
        let mut rng = StdRng::seed_from_u64(24);
        let mut ctx = PoemContext::new();
        // Budget 12, slack 6: after "silence" (7 chars) the very next slot
        // already switches to final-word logic.
        let line = generator
            .line("silence", 9, None, Some(&pool), 12, &mut ctx, &mut rng)
            .unwrap();
        assert_eq!(line.split_whitespace().count(), 2);
    }

    #[test]
    fn test_empty_provider_exhausts() {
        let bank = WordBank::with_embedded_oracles(Box::new(TableProvider::new()));
        let generator = MarkovGenerator::new(&bank);
        let mut rng = StdRng::seed_from_u64(25);
        let mut ctx = PoemContext::new();
        let result = generator.line("moon", 4, None, None, 200, &mut ctx, &mut rng);
        assert!(matches!(result, Err(GenError::Exhausted { .. })));
    }

    #[test]
    fn test_poem_rejects_invalid_seed() {
        let bank = vocab_bank();
        let generator = MarkovGenerator::new(&bank);
        let mut rng = StdRng::seed_from_u64(26);
        let result = generator.poem(&strs(&["m00n"]), &MarkovOptions::default(), &mut rng);
        assert!(matches!(result, Err(GenError::Lex(_))));
    }
}
