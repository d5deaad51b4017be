// CLI entry point for Verse Loom.
//
// Generates a poem from a comma-separated seed word list using one of two
// modes: `markov` (word-by-word stochastic generation, see `markov.rs`) or
// `visual` (pool-based line composition, see `composer.rs`). Prints the
// poem to stdout and optionally saves it to a text file named after the
// seed words.
//
// Usage:
//   verseloom --words <W1,W2,...> [OPTIONS]
//     --words <LIST>            Comma-separated seed words (required)
//     --mode <markov|visual>    Generation mode (default: markov)
//     --lines <N>               Line count (default: 10 markov, 6 visual)
//     --min-words <N>           Min words per markov line (default: 5)
//     --max-words <N>           Max words per markov line (default: 9)
//     --max-line-length <N>     Character budget per line (default: 35)
//     --one-word-lines          Visual mode: one seed word per line
//     --seed <N>                RNG seed (default: OS entropy)
//     --spell-dict <PATH>       Spelling dictionary file (default: embedded)
//     --offline                 No network; relation lookups return empty
//     --save                    Write the poem to <w1,w2,...>.txt
//     --help, -h                Show this help

use std::path::{Path, PathBuf};

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use verse_loom_lex::{
    DatamuseClient, FreqTable, RelationProvider, RhymeDict, SpellDict, TableProvider, WordBank,
};
use verse_loom_poem::{MarkovGenerator, MarkovOptions, WordListPoemOptions, poem_from_word_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Markov,
    Visual,
}

struct CliConfig {
    words: Vec<String>,
    mode: Mode,
    lines: Option<usize>,
    min_words: usize,
    max_words: usize,
    max_line_length: usize,
    one_word_lines: bool,
    seed: Option<u64>,
    spell_dict: Option<PathBuf>,
    offline: bool,
    save: bool,
}

fn main() {
    env_logger::init();
    let config = parse_args();

    let text = match generate(&config) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to generate poem: {e}");
            std::process::exit(1);
        }
    };

    print_poem(&text);

    if config.save {
        let filename = poem_filename(&config.words);
        if let Err(e) = std::fs::write(&filename, format!("{text}\n")) {
            eprintln!("Failed to save poem to {filename}: {e}");
            std::process::exit(1);
        }
        println!("Saved to {filename}");
    }
}

fn generate(config: &CliConfig) -> Result<String, Box<dyn std::error::Error>> {
    let provider: Box<dyn RelationProvider> = if config.offline {
        Box::new(TableProvider::new())
    } else {
        Box::new(DatamuseClient::new()?)
    };
    let spell = match &config.spell_dict {
        Some(path) => SpellDict::load(path)?,
        None => SpellDict::embedded(),
    };
    let bank = WordBank::new(provider, FreqTable::embedded(), spell, RhymeDict::embedded());

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    info!(
        "generating {:?} poem from {} seed words",
        config.mode,
        config.words.len()
    );

    match config.mode {
        Mode::Markov => {
            let opts = MarkovOptions {
                num_lines: config.lines.unwrap_or(10),
                min_line_words: config.min_words,
                max_line_words: config.max_words,
                max_line_length: config.max_line_length,
            };
            let generator = MarkovGenerator::new(&bank);
            let poem = generator.poem(&config.words, &opts, &mut rng)?;
            Ok(poem.to_text())
        }
        Mode::Visual => {
            let opts = WordListPoemOptions {
                num_lines: config.lines.unwrap_or(6),
                max_line_length: config.max_line_length,
                connectors: Vec::new(),
                one_input_word_per_line: config.one_word_lines,
            };
            Ok(poem_from_word_list(&bank, &config.words, &opts, &mut rng)?)
        }
    }
}

fn print_poem(text: &str) {
    println!();
    println!("{text}");
    println!();
}

/// File name derived from the seed words, with `(n)` suffixes so an
/// existing poem is never clobbered.
fn poem_filename(words: &[String]) -> String {
    let base = words.join(",");
    let mut candidate = format!("{base}.txt");
    let mut n = 1;
    while Path::new(&candidate).exists() {
        candidate = format!("{base}({n}).txt");
        n += 1;
    }
    candidate
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching —
/// no clap dependency.
fn parse_args() -> CliConfig {
    let mut config = CliConfig {
        words: Vec::new(),
        mode: Mode::Markov,
        lines: None,
        min_words: 5,
        max_words: 9,
        max_line_length: 35,
        one_word_lines: false,
        seed: None,
        spell_dict: None,
        offline: false,
        save: false,
    };
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--words" => {
                i += 1;
                config.words = args
                    .get(i)
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|w| !w.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                if config.words.is_empty() {
                    eprintln!("--words requires a comma-separated word list");
                    std::process::exit(1);
                }
            }
            "--mode" => {
                i += 1;
                config.mode = match args.get(i).map(String::as_str) {
                    Some("markov") => Mode::Markov,
                    Some("visual") => Mode::Visual,
                    _ => {
                        eprintln!("--mode must be 'markov' or 'visual'");
                        std::process::exit(1);
                    }
                };
            }
            "--lines" => {
                i += 1;
                config.lines = Some(parse_number(&args, i, "--lines"));
            }
            "--min-words" => {
                i += 1;
                config.min_words = parse_number(&args, i, "--min-words");
            }
            "--max-words" => {
                i += 1;
                config.max_words = parse_number(&args, i, "--max-words");
            }
            "--max-line-length" => {
                i += 1;
                config.max_line_length = parse_number(&args, i, "--max-line-length");
            }
            "--one-word-lines" => {
                config.one_word_lines = true;
            }
            "--seed" => {
                i += 1;
                config.seed = Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--seed requires a valid number");
                    std::process::exit(1);
                }));
            }
            "--spell-dict" => {
                i += 1;
                config.spell_dict = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--spell-dict requires a path");
                    std::process::exit(1);
                }));
            }
            "--offline" => {
                config.offline = true;
            }
            "--save" => {
                config.save = true;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    if config.words.is_empty() {
        eprintln!("--words is required");
        print_usage();
        std::process::exit(1);
    }
    if config.min_words == 0 || config.max_words < config.min_words {
        eprintln!("--min-words must be at least 1 and no greater than --max-words");
        std::process::exit(1);
    }

    config
}

fn parse_number(args: &[String], i: usize, flag: &str) -> usize {
    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        eprintln!("{flag} requires a valid number");
        std::process::exit(1);
    })
}

fn print_usage() {
    println!("Usage: verseloom --words <W1,W2,...> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --words <LIST>            Comma-separated seed words (required)");
    println!("  --mode <markov|visual>    Generation mode (default: markov)");
    println!("  --lines <N>               Line count (default: 10 markov, 6 visual)");
    println!("  --min-words <N>           Min words per markov line (default: 5)");
    println!("  --max-words <N>           Max words per markov line (default: 9)");
    println!("  --max-line-length <N>     Character budget per line (default: 35)");
    println!("  --one-word-lines          Visual mode: one seed word per line");
    println!("  --seed <N>                RNG seed (default: OS entropy)");
    println!("  --spell-dict <PATH>       Spelling dictionary file (default: embedded)");
    println!("  --offline                 No network; relation lookups return empty");
    println!("  --save                    Write the poem to <w1,w2,...>.txt");
    println!("  --help, -h                Show this help");
}
