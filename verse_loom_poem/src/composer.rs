// Direct line composition from word pools.
//
// The non-Markov "visual poem" flow: each line strings pool words together
// with random connectors, terminates early at random (more eagerly the
// longer the line gets), and silently drops words that would overflow the
// character budget. The poem wrapper adds random line enders and indents
// and closes with a fixed couplet built from the seed words.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use verse_loom_lex::{LexError, WordBank, too_similar, validate_word};

/// Punctuation appended after a composed line (never after the last one).
const LINE_ENDERS: &[&str] = &["", ",", ".", "!", "?", "...", " or"];

/// Indent prefixes; consecutive lines never share one.
const LINE_INDENTS: &[&str] = &["", "    ", "         "];

/// Base probability of ending a line before the next word.
const STOP_PROBABILITY_BASE: f64 = 0.2;

/// Cap on re-rolls when avoiding a repeated connector or indent. With a
/// single-element set the re-roll could never succeed; after the cap the
/// repeat is accepted.
const REROLL_CAP: usize = 16;

/// Provider cap for the phonetic expansion feeding each pool.
const PHONETIC_API_MAX: usize = 50;

/// Options for [`poem_from_word_list`].
#[derive(Debug, Clone)]
pub struct WordListPoemOptions {
    /// Total line count, closing couplet included.
    pub num_lines: usize,
    /// Character budget per line, connectors included.
    pub max_line_length: usize,
    /// Connector strings; empty means "use [`default_connectors`]".
    pub connectors: Vec<String>,
    /// Build each line from words related to a single random seed word
    /// instead of one shared pool.
    pub one_input_word_per_line: bool,
}

impl Default for WordListPoemOptions {
    fn default() -> Self {
        WordListPoemOptions {
            num_lines: 6,
            max_line_length: 35,
            connectors: Vec::new(),
            one_input_word_per_line: false,
        }
    }
}

/// The default connector set. The ampersand-or-"and" slot is fixed once
/// per poem, not per line.
pub fn default_connectors(rng: &mut impl Rng) -> Vec<String> {
    let conjunction = if rng.random_bool(0.5) { " & " } else { " and " };
    vec![
        " ".to_string(),
        "... ".to_string(),
        conjunction.to_string(),
        " or ".to_string(),
        "   ".to_string(),
    ]
}

fn choose_avoiding<'a>(
    options: &'a [String],
    avoid: &str,
    rng: &mut impl Rng,
) -> Option<&'a String> {
    let mut picked = options.choose(rng)?;
    let mut rerolls = 0;
    while picked.as_str() == avoid && rerolls < REROLL_CAP {
        picked = options.choose(rng)?;
        rerolls += 1;
    }
    Some(picked)
}

/// Compose a single line from a word list.
///
/// Starts with the first word, then walks the rest in order: stop early
/// with probability `0.2 + len/100`; skip words too similar to the last
/// word taken; join with a random connector, never the same connector
/// twice in a row; drop (do not truncate) any word whose append would
/// exceed `max_line_length`. The tracked last word and connector advance
/// even when the append was dropped. Never returns leading or trailing
/// newlines.
pub fn line_from_word_list(
    words: &[String],
    max_line_length: usize,
    connectors: &[String],
    rng: &mut impl Rng,
) -> String {
    let Some(first) = words.first() else {
        return String::new();
    };
    let mut output = first.clone();
    let mut last_word = first.as_str();
    let mut last_connector = "";
    for word in &words[1..] {
        if rng.random::<f64>() < STOP_PROBABILITY_BASE + output.len() as f64 / 100.0 {
            break;
        }
        if too_similar(last_word, word) {
            continue;
        }
        let Some(connector) = choose_avoiding(connectors, last_connector, rng) else {
            break;
        };
        if output.len() + connector.len() + word.len() <= max_line_length {
            output.push_str(connector);
            output.push_str(word);
        }
        last_word = word;
        last_connector = connector.as_str();
    }
    output
}

/// Compose a whole poem from seed words.
///
/// Validates the seeds, expands them phonetically into a pool, then
/// composes `num_lines - 1` lines (re-shuffling the pool per line), each
/// followed by a random line ender except the last, each after the first
/// prefixed by a random indent that never repeats the previous line's.
/// The final line is always a seed-word couplet: a random seed except the
/// last, a space, then the last seed.
pub fn poem_from_word_list(
    bank: &WordBank,
    input_words: &[String],
    opts: &WordListPoemOptions,
    rng: &mut impl Rng,
) -> Result<String, LexError> {
    for word in input_words {
        validate_word(word)?;
    }
    let connectors = if opts.connectors.is_empty() {
        default_connectors(rng)
    } else {
        opts.connectors.clone()
    };

    let mut shared_pool: Vec<String> = Vec::new();
    if !opts.one_input_word_per_line {
        shared_pool.extend(input_words.iter().cloned());
        shared_pool.extend(bank.phonetically_related_words(
            input_words,
            None,
            Some(PHONETIC_API_MAX),
            rng,
        ));
    }

    let composed_count = opts.num_lines.saturating_sub(1);
    let mut lines: Vec<String> = Vec::with_capacity(opts.num_lines);
    let mut indent = String::new();
    let indents: Vec<String> = LINE_INDENTS.iter().map(|s| s.to_string()).collect();
    for i in 0..composed_count {
        let line_words: Vec<String> = if opts.one_input_word_per_line {
            match input_words.choose(rng) {
                Some(word) => bank.phonetically_related_words(
                    std::slice::from_ref(word),
                    None,
                    Some(PHONETIC_API_MAX),
                    rng,
                ),
                None => Vec::new(),
            }
        } else {
            shared_pool.shuffle(rng);
            shared_pool.clone()
        };

        let mut line = line_from_word_list(&line_words, opts.max_line_length, &connectors, rng);
        if i + 1 < composed_count {
            if let Some(ender) = LINE_ENDERS.choose(rng) {
                line.push_str(ender);
            }
        }
        if i > 0 {
            if let Some(new_indent) = choose_avoiding(&indents, &indent, rng) {
                line.insert_str(0, new_indent);
                indent = new_indent.clone();
            }
        }
        lines.push(line);
    }

    // Closing couplet from the seed words themselves.
    let head = if input_words.len() > 1 {
        &input_words[..input_words.len() - 1]
    } else {
        input_words
    };
    if let (Some(opener), Some(closer)) = (head.choose(rng), input_words.last()) {
        lines.push(format!("{opener} {closer}"));
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_word_list_gives_empty_line() {
        let mut rng = StdRng::seed_from_u64(0);
        let connectors = words(&[" "]);
        assert_eq!(line_from_word_list(&[], 35, &connectors, &mut rng), "");
    }

    #[test]
    fn test_line_invariants() {
        let pool = words(&[
            "crypt", "script", "ghost", "phantom", "moon", "river", "stone", "ember", "lantern",
            "frost", "raven", "tide",
        ]);
        let connectors = words(&[" "]);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let line = line_from_word_list(&pool, 35, &connectors, &mut rng);
            assert!(!line.starts_with(' '), "leading space in {line:?}");
            assert!(!line.contains('\n'), "newline in {line:?}");
            assert!(line.len() <= 35, "over budget: {line:?}");
            let tokens: Vec<&str> = line.split_whitespace().collect();
            for token in &tokens {
                assert!(
                    pool.iter().any(|w| w == token),
                    "token {token:?} not in pool"
                );
            }
            for pair in tokens.windows(2) {
                assert!(
                    !too_similar(pair[0], pair[1]),
                    "adjacent similar pair {pair:?}"
                );
            }
        }
    }

    #[test]
    fn test_similar_neighbors_are_skipped() {
        // Stop probability is never hit before length 0.2*100 = 20 chars is
        // possible, so run many seeds and require the pair never co-occurs.
        let pool = words(&["ghost", "ghosts", "moon", "stone"]);
        let connectors = words(&[" "]);
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let line = line_from_word_list(&pool, 60, &connectors, &mut rng);
            let tokens: Vec<&str> = line.split_whitespace().collect();
            for pair in tokens.windows(2) {
                assert!(!too_similar(pair[0], pair[1]), "{line:?}");
            }
        }
    }

    #[test]
    fn test_overflow_word_is_dropped_not_truncated() {
        let pool = words(&["moon", "extraordinarily", "sea"]);
        let connectors = words(&[" "]);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let line = line_from_word_list(&pool, 10, &connectors, &mut rng);
            assert!(line.len() <= 10);
            assert!(!line.contains("extraordinarily"));
        }
    }

    #[test]
    fn test_default_connectors_pick_one_conjunction() {
        let mut rng = StdRng::seed_from_u64(3);
        let connectors = default_connectors(&mut rng);
        assert_eq!(connectors.len(), 5);
        let has_amp = connectors.iter().any(|c| c == " & ");
        let has_and = connectors.iter().any(|c| c == " and ");
        assert!(has_amp != has_and);
    }

    #[test]
    fn test_choose_avoiding_single_option_terminates() {
        let mut rng = StdRng::seed_from_u64(4);
        let only = words(&[" "]);
        assert_eq!(choose_avoiding(&only, " ", &mut rng), Some(&" ".to_string()));
    }
}
