// Cipher pattern search CLI
// Command-line interface for ranked candidate lookup

use cipher_patterns::{encode, normalize, ConstraintSet, DataLoader, QueryService, SourceConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Cipher Search Tool - Find plaintext candidates for an enciphered word
#[derive(Parser, Debug)]
#[command(name = "cipher-search")]
#[command(about = "Find ranked plaintext words matching a cipher word's letter pattern", long_about = None)]
#[command(version)]
struct Args {
    /// Pattern to match
    /// - Letters: an enciphered word or letter form (e.g. "XQQX", "ABBA")
    /// - Digits: 1-based pattern (e.g. "1221")
    /// - Tokens: separated symbols (e.g. "0 1 1 0", "1-2-3-...-10")
    #[arg(value_name = "PATTERN")]
    pattern: String,

    /// Word list, one `WORD` or `WORD COUNT` per line
    #[arg(short, long, env = "DICTIONARY_FILE")]
    dictionary: Option<PathBuf>,

    /// Pattern list, one `PATTERN WORD WORD ...` per line
    #[arg(short, long, env = "PATTERNS_FILE")]
    patterns: Option<PathBuf>,

    /// Word counts, one `WORD COUNT` per line
    #[arg(short, long, env = "FREQUENCY_FILE")]
    frequencies: Option<PathBuf>,

    /// Letter n-gram weights, one `NGRAM WEIGHT` per line
    #[arg(short, long, env = "NGRAM_FILE")]
    ngrams: Option<PathBuf>,

    /// Confirmed mapping (e.g. "0=N", or "X=N" for a letter of the pattern)
    #[arg(short, long = "confirm", value_name = "SYMBOL=LETTER", value_parser = parse_confirm)]
    confirm: Vec<(SymbolRef, char)>,

    /// Excluded letters for a symbol (e.g. "1=AE", "Q=AE")
    #[arg(short = 'x', long = "exclude", value_name = "SYMBOL=LETTERS", value_parser = parse_exclude)]
    exclude: Vec<(SymbolRef, Vec<char>)>,

    /// Constraints as JSON: {"confirmed": {"0": "N"}, "excluded": {"1": ["A"]}}
    #[arg(long, value_name = "JSON")]
    constraints: Option<String>,

    /// Maximum number of results to display
    #[arg(short, long, default_value_t = 50, allow_negative_numbers = true)]
    limit: i64,

    /// Drop implausible corpus words (abbreviations, runs, no vowels)
    #[arg(long)]
    strict: bool,

    /// Show frequency scores
    #[arg(short, long)]
    scores: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Show detailed information
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SourceConfig {
        dictionary: args.dictionary.clone(),
        patterns: args.patterns.clone(),
        frequencies: args.frequencies.clone(),
        ngrams: args.ngrams.clone(),
        strict: args.strict,
    };

    let index = DataLoader::build_index(&config)?;
    let service = QueryService::new(Arc::new(index));

    if args.verbose {
        let stats = service.stats();
        println!(
            "Index loaded: {} words in {} patterns ({} rows skipped)\n",
            stats.words, stats.patterns, stats.anomalies
        );
    }

    let mut constraints = match &args.constraints {
        Some(json) => ConstraintSet::from_json(json)?,
        None => ConstraintSet::new(),
    };
    for &(symbol, letter) in &args.confirm {
        constraints = constraints.confirm(symbol.resolve(&args.pattern)?, letter);
    }
    for (symbol, letters) in &args.exclude {
        constraints = constraints.exclude(symbol.resolve(&args.pattern)?, letters.iter().copied());
    }

    let results = service.query_entries(&args.pattern, &constraints, args.limit)?;
    let pattern = normalize(&args.pattern)?;

    if args.json {
        let candidates: Vec<serde_json::Value> = results
            .iter()
            .map(|entry| serde_json::json!({ "word": entry.word(), "frequency": entry.frequency() }))
            .collect();
        let output = serde_json::json!({ "pattern": pattern.to_string(), "candidates": candidates });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Pattern: {}", pattern);

    if results.is_empty() {
        println!("No matches found.");
        return Ok(());
    }

    println!("Found {} matches:\n", results.len());

    let top = results.first().map_or(0.0, |entry| entry.frequency());
    for (idx, entry) in results.iter().enumerate() {
        print!("{}. {:<20}", idx + 1, entry.word());
        if args.scores {
            let share = if top > 0.0 { entry.frequency() / top } else { 0.0 };
            print!(" {:>12.1} {}", entry.frequency(), score_bar(share));
        }
        println!();
    }

    Ok(())
}

/// Symbol named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolRef {
    /// Canonical symbol index
    Index(usize),
    /// A letter of the pattern as typed (e.g. `X` in "XQQX")
    Letter(char),
}

impl SymbolRef {
    /// Symbol index within `pattern`
    ///
    /// Letters of a letter-form pattern name the symbol at their first
    /// position. For digit or token patterns a letter is read in canonical
    /// letter form (`A` is 0, `B` is 1, ...).
    fn resolve(self, pattern: &str) -> Result<usize, String> {
        let letter = match self {
            SymbolRef::Index(symbol) => return Ok(symbol),
            SymbolRef::Letter(letter) => letter.to_ascii_uppercase(),
        };
        let pattern = pattern.trim();
        if !pattern.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok((letter as u8 - b'A') as usize);
        }
        let position = pattern
            .chars()
            .position(|c| c.eq_ignore_ascii_case(&letter))
            .ok_or_else(|| format!("letter '{}' does not occur in pattern '{}'", letter, pattern))?;
        let encoded = encode(pattern).map_err(|err| err.to_string())?;
        Ok(encoded.symbols()[position] as usize)
    }
}

/// Parse a symbol given as an index ("2") or a letter ("X")
fn parse_symbol(raw: &str) -> Result<SymbolRef, String> {
    let raw = raw.trim();
    if let Ok(symbol) = raw.parse::<usize>() {
        return Ok(SymbolRef::Index(symbol));
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_alphabetic() => Ok(SymbolRef::Letter(ch)),
        _ => Err(format!("invalid symbol '{}': use an index or a letter", raw)),
    }
}

fn parse_confirm(raw: &str) -> Result<(SymbolRef, char), String> {
    let (symbol, letter) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=LETTER, got '{}'", raw))?;
    let mut letters = letter.trim().chars();
    match (letters.next(), letters.next()) {
        (Some(letter), None) => Ok((parse_symbol(symbol)?, letter)),
        _ => Err(format!("expected a single letter after '=', got '{}'", letter)),
    }
}

fn parse_exclude(raw: &str) -> Result<(SymbolRef, Vec<char>), String> {
    let (symbol, letters) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=LETTERS, got '{}'", raw))?;
    let letters: Vec<char> = letters.trim().chars().filter(|c| !matches!(c, ',' | ' ')).collect();
    if letters.is_empty() {
        return Err(format!("no letters given for symbol '{}'", symbol));
    }
    Ok((parse_symbol(symbol)?, letters))
}

/// Generate a visual score bar
fn score_bar(score: f64) -> String {
    let bar_len = 10;
    let filled = (score.clamp(0.0, 1.0) * bar_len as f64) as usize;
    let mut bar = String::from("[");
    for i in 0..bar_len {
        if i < filled {
            bar.push('█');
        } else {
            bar.push('░');
        }
    }
    bar.push(']');
    bar
}
