// Cipher pattern type definitions
// Core types for structural patterns, index entries and query errors

use std::fmt;
use thiserror::Error;

/// Abstract identifier of one letter-equality class within a word.
///
/// Symbols are numbered 0, 1, 2, ... in order of first appearance.
pub type Symbol = u8;

/// Longest word (and pattern) the encoder accepts
pub const MAX_WORD_LEN: usize = 45;

/// Number of letters in the cipher alphabet (A-Z)
pub const ALPHABET_SIZE: usize = 26;

/// Canonical structural pattern of a word
///
/// One symbol per character position. Two words are structurally
/// equivalent iff their patterns are equal. Always non-empty, at most
/// `MAX_WORD_LEN` long and at most `ALPHABET_SIZE` distinct symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern(Box<[Symbol]>);

impl Pattern {
    /// Wrap symbols that are already canonically numbered.
    pub(crate) fn from_canonical(symbols: Vec<Symbol>) -> Self {
        debug_assert!(!symbols.is_empty());
        Self(symbols.into_boxed_slice())
    }

    /// Symbols, one per position
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    /// Number of positions (equals the word length)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Patterns are never empty; provided for API completeness
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct symbols
    pub fn symbol_count(&self) -> usize {
        // Canonical numbering means the largest symbol is the last one introduced.
        self.0.iter().max().map_or(0, |&max| max as usize + 1)
    }

    /// Position of the first occurrence of each symbol, indexed by symbol
    pub fn first_positions(&self) -> Vec<usize> {
        let mut positions = Vec::with_capacity(self.symbol_count());
        for (position, &symbol) in self.0.iter().enumerate() {
            if symbol as usize == positions.len() {
                positions.push(position);
            }
        }
        positions
    }

    /// 1-based digit form used by pattern-list files (e.g. "12213")
    ///
    /// Returns `None` when the pattern has more than 9 symbols.
    pub fn to_digits(&self) -> Option<String> {
        if self.symbol_count() > 9 {
            return None;
        }
        Some(
            self.0
                .iter()
                .map(|&s| char::from(b'1' + s))
                .collect(),
        )
    }
}

/// Letter form: symbol 0 is `A`, symbol 1 is `B`, ...
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &symbol in self.0.iter() {
            write!(f, "{}", char::from(b'A' + symbol))?;
        }
        Ok(())
    }
}

/// Immutable dictionary entry owned by the index
#[derive(Debug, Clone, PartialEq)]
pub struct WordEntry {
    word: String,
    frequency: f64,
}

impl WordEntry {
    pub(crate) fn new(word: String, frequency: f64) -> Self {
        Self { word, frequency }
    }

    /// Uppercase word
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Non-negative ranking score
    pub fn frequency(&self) -> f64 {
        self.frequency
    }
}

/// Recoverable problem found in one row of a data source
#[derive(Debug, Clone, PartialEq)]
pub struct Anomaly {
    /// 1-based row number within its source
    pub line: usize,
    /// The offending row as supplied
    pub raw: String,
    pub kind: AnomalyKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnomalyKind {
    /// Word cannot be a cipher word (non-letters, empty, too long)
    MalformedWord(PatternError),
    /// Count is missing, negative, not a number or not finite
    InvalidCount(String),
    /// Pattern-list row whose word does not have the declared pattern
    PatternMismatch { declared: String, actual: String },
    /// N-gram whose length differs from the model's
    NgramLength { expected: usize, actual: usize },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            AnomalyKind::MalformedWord(err) => write!(f, "skipped {:?}: {}", self.raw, err),
            AnomalyKind::InvalidCount(count) => {
                write!(f, "invalid count {:?} in {:?}", count, self.raw)
            }
            AnomalyKind::PatternMismatch { declared, actual } => write!(
                f,
                "{:?} has pattern {} but is listed under {}",
                self.raw, actual, declared
            ),
            AnomalyKind::NgramLength { expected, actual } => write!(
                f,
                "n-gram {:?} has length {}, expected {}",
                self.raw, actual, expected
            ),
        }
    }
}

/// Pattern parsing and word encoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("Invalid pattern: empty")]
    EmptyPattern,

    #[error("Invalid character '{char}' at position {position}: only letters A-Z allowed")]
    InvalidCharacter { char: char, position: usize },

    #[error("Invalid pattern token '{token}'")]
    InvalidToken { token: String },

    #[error("Invalid pattern: symbol {found} at position {position} skips ahead, expected at most {expected}")]
    NonCanonical {
        found: usize,
        expected: usize,
        position: usize,
    },

    #[error("Invalid pattern: length {actual} exceeds maximum of {max}", max = MAX_WORD_LEN)]
    LengthTooLong { actual: usize },

    #[error("Invalid pattern: {actual} distinct symbols exceed the {size}-letter alphabet", size = ALPHABET_SIZE)]
    TooManySymbols { actual: usize },
}

/// Inconsistent confirmed/excluded letter knowledge
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("Symbol {symbol} is out of range for a pattern with {symbols} symbols")]
    SymbolOutOfRange { symbol: usize, symbols: usize },

    #[error("Invalid letter '{char}' for symbol {symbol}: only letters A-Z allowed")]
    InvalidLetter { symbol: usize, char: char },

    #[error("Letter '{letter}' is both confirmed and excluded for symbol {symbol}")]
    ConfirmedAndExcluded { symbol: usize, letter: char },

    #[error("Letter '{letter}' is confirmed for both symbol {first} and symbol {second}")]
    DuplicateLetter {
        letter: char,
        first: usize,
        second: usize,
    },
}

/// Caller-input errors reported by the query path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    #[error(transparent)]
    InvalidConstraintSet(#[from] ConstraintError),

    #[error("Invalid limit {0}: must be at least 1")]
    InvalidLimit(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(symbols: &[Symbol]) -> Pattern {
        Pattern::from_canonical(symbols.to_vec())
    }

    #[test]
    fn test_pattern_display() {
        assert_eq!(pattern(&[0, 1, 1, 0]).to_string(), "ABBA");
        assert_eq!(pattern(&[0]).to_string(), "A");
    }

    #[test]
    fn test_pattern_digits() {
        assert_eq!(pattern(&[0, 0, 1, 0, 2]).to_digits().as_deref(), Some("11213"));
        let wide: Vec<Symbol> = (0..10).collect();
        assert_eq!(pattern(&wide).to_digits(), None);
    }

    #[test]
    fn test_symbol_count_and_first_positions() {
        let p = pattern(&[0, 1, 2, 2, 1, 3]);
        assert_eq!(p.len(), 6);
        assert_eq!(p.symbol_count(), 4);
        assert_eq!(p.first_positions(), vec![0, 1, 2, 5]);
    }

    #[test]
    fn test_anomaly_display() {
        let anomaly = Anomaly {
            line: 3,
            raw: "it's".to_string(),
            kind: AnomalyKind::MalformedWord(PatternError::InvalidCharacter {
                char: '\'',
                position: 2,
            }),
        };
        assert_eq!(
            anomaly.to_string(),
            "line 3: skipped \"it's\": Invalid character '\'' at position 2: only letters A-Z allowed"
        );
    }

    #[test]
    fn test_query_error_display() {
        let err = QueryError::from(PatternError::EmptyPattern);
        assert_eq!(err.to_string(), "Invalid pattern: empty");
        assert_eq!(
            QueryError::InvalidLimit(0).to_string(),
            "Invalid limit 0: must be at least 1"
        );
    }
}
