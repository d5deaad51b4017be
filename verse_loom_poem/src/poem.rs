// The finished-poem value type.
//
// A poem is an ordered sequence of generated lines plus the seed words and
// the sampling pool that produced it. Built line-by-line during a
// generation call, returned finished, never mutated afterwards.

/// A generated poem.
#[derive(Debug, Clone)]
pub struct Poem {
    /// The seed words the caller supplied.
    pub input_words: Vec<String>,
    /// What remained of the sampling pool when generation finished.
    pub pool: Vec<String>,
    /// The finished lines, in order.
    pub lines: Vec<String>,
}

impl Poem {
    pub fn new(input_words: Vec<String>, pool: Vec<String>, lines: Vec<String>) -> Self {
        Poem {
            input_words,
            pool,
            lines,
        }
    }

    /// The most recently finished line, if any.
    pub fn previous_line(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// The poem as a single string, lines joined by newlines.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}
