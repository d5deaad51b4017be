// Poem generation layer for Verse Loom.
//
// Two generation modes over the `verse_loom_lex` query layer:
// - `composer.rs`: direct line composition from a word pool, with random
//   connectors, random early termination, and a character budget
// - `markov.rs`: word-by-word stochastic generation with per-step strategy
//   selection, repetition avoidance, and optional end-of-line rhyme
//
// `poem.rs` holds the finished-poem value type shared by both modes.
//
// Everything stochastic takes `rng: &mut impl Rng`; generation state lives
// in an explicit per-call context, never on a shared instance, so one
// `WordBank` can back concurrent generations.

pub mod composer;
pub mod markov;
pub mod poem;

pub use composer::{WordListPoemOptions, default_connectors, line_from_word_list, poem_from_word_list};
pub use markov::{COMMON_WORDS, MarkovGenerator, MarkovOptions, PoemContext, WordStrategy};
pub use poem::Poem;

use verse_loom_lex::LexError;

/// Errors from poem generation.
///
/// Empty relation results are never errors; they trigger strategy
/// fallbacks. Only bounded-retry exhaustion, a consumed word pool, and
/// invalid caller input surface here.
#[derive(Debug)]
pub enum GenError {
    /// Every retry of a word-selection step came back empty or rejected.
    /// The probabilistic search gives up instead of looping forever.
    Exhausted { attempts: usize },
    /// The sampling pool ran out of starting words before the requested
    /// number of lines was reached.
    PoolDrained,
    /// Invalid input word or broken lexical resource.
    Lex(LexError),
}

impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::Exhausted { attempts } => {
                write!(f, "could not generate a word after {attempts} attempts")
            }
            GenError::PoolDrained => {
                write!(f, "word pool exhausted before the requested line count")
            }
            GenError::Lex(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenError::Lex(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LexError> for GenError {
    fn from(e: LexError) -> Self {
        GenError::Lex(e)
    }
}
