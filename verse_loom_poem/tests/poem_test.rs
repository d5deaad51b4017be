// End-to-end generation tests against a deterministic in-memory provider
// and the embedded oracles.

use rand::SeedableRng;
use rand::rngs::StdRng;

use verse_loom_lex::{RelationKind, TableProvider, WordBank};
use verse_loom_poem::{
    GenError, MarkovGenerator, MarkovOptions, WordListPoemOptions, poem_from_word_list,
};

/// A closed vocabulary: every relation of every member lands back inside
/// the vocabulary, so the generators always find candidates. Rhyme-group
/// members of "moon" and "night" are included because the phonetic pool
/// expansion pulls them in as line starting words.
const VOCAB: &[&str] = &[
    "moon", "river", "stone", "fire", "night", "dream", "rain", "sea", "winter", "shadow",
    "silence", "harbor", "june", "soon", "noon", "tune", "light", "bright", "sight", "flight",
    "white",
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
fn test_word_list_poem_shape() {
    let bank = vocab_bank();
    let inputs = strs(&["crypt", "sleep", "ghost", "time"]);
    let opts = WordListPoemOptions {
        num_lines: 8,
        ..WordListPoemOptions::default()
    };
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let poem = poem_from_word_list(&bank, &inputs, &opts, &mut rng).unwrap();
        assert_eq!(poem.matches('\n').count(), 7, "poem:\n{poem}");

        // Closing couplet: one of the first three seeds, then "time".
        let last_line = poem.lines().last().unwrap();
        let mut parts = last_line.split(' ');
        let opener = parts.next().unwrap();
        assert!(["crypt", "sleep", "ghost"].contains(&opener), "{last_line}");
        assert_eq!(parts.next(), Some("time"));
        assert_eq!(parts.next(), None);

        // No two consecutive lines share a non-empty indent.
        let lines: Vec<&str> = poem.lines().collect();
        fn indent_of(l: &str) -> &str {
            &l[..l.len() - l.trim_start().len()]
        }
        for pair in lines.windows(2) {
            let (a, b) = (indent_of(pair[0]), indent_of(pair[1]));
            if !a.is_empty() && !b.is_empty() {
                assert_ne!(a, b, "repeated indent in:\n{poem}");
            }
        }
    }
}

#[test]
fn test_word_list_poem_one_seed_per_line() {
    let bank = vocab_bank();
    let inputs = strs(&["moon", "night"]);
    let opts = WordListPoemOptions {
        num_lines: 5,
        one_input_word_per_line: true,
        ..WordListPoemOptions::default()
    };
    let mut rng = StdRng::seed_from_u64(3);
    let poem = poem_from_word_list(&bank, &inputs, &opts, &mut rng).unwrap();
    assert_eq!(poem.matches('\n').count(), 4);
    assert_eq!(poem.lines().last(), Some("moon night"));
}

#[test]
fn test_word_list_poem_rejects_invalid_seed() {
    let bank = vocab_bank();
    let inputs = strs(&["moon", "ni ght"]);
    let mut rng = StdRng::seed_from_u64(4);
    let result = poem_from_word_list(&bank, &inputs, &WordListPoemOptions::default(), &mut rng);
    assert!(result.is_err());
}

#[test]
fn test_markov_poem_structure() {
    let bank = vocab_bank();
    let generator = MarkovGenerator::new(&bank);
    let opts = MarkovOptions {
        num_lines: 4,
        min_line_words: 3,
        max_line_words: 5,
        max_line_length: 200,
    };
    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let poem = generator.poem(&strs(&["moon", "night"]), &opts, &mut rng).unwrap();
        assert_eq!(poem.lines.len(), 4);
        assert_eq!(poem.input_words, strs(&["moon", "night"]));
        for line in &poem.lines {
            let count = line.split_whitespace().count();
            assert!((3..=5).contains(&count), "line {line:?} has {count} words");
        }
        assert_eq!(poem.to_text().matches('\n').count(), 3);
    }
}

#[test]
fn test_markov_poem_drains_pool() {
    let bank = vocab_bank();
    let generator = MarkovGenerator::new(&bank);
    // "harbor" has no rhyme group: the pool is the seed plus three
    // similar-sounding words, far fewer than the requested line count.
    let opts = MarkovOptions {
        num_lines: 10,
        min_line_words: 3,
        max_line_words: 4,
        max_line_length: 200,
    };
    let mut rng = StdRng::seed_from_u64(9);
    let result = generator.poem(&strs(&["harbor"]), &opts, &mut rng);
    assert!(matches!(result, Err(GenError::PoolDrained)));
}

#[test]
fn test_markov_poem_exhausts_on_nonsense_seed() {
    // An always-empty provider: every strategy comes back empty, so the
    // bounded retries give up instead of hanging.
    let bank = WordBank::with_embedded_oracles(Box::new(TableProvider::new()));
    let generator = MarkovGenerator::new(&bank);
    let opts = MarkovOptions {
        num_lines: 2,
        min_line_words: 4,
        max_line_words: 4,
        max_line_length: 200,
    };
    let mut rng = StdRng::seed_from_u64(10);
    let result = generator.poem(&strs(&["catabasis"]), &opts, &mut rng);
    assert!(matches!(result, Err(GenError::Exhausted { .. })));
}
