//! Letter constraints: confirmed mappings and exclusions per symbol
//!
//! A [`ConstraintSet`] is what the caller accumulates over a solving
//! session. It is compiled against one pattern per query into
//! [`CompiledConstraints`], which is where consistency is enforced:
//! - every symbol must exist in the pattern
//! - letters must be A-Z (case-insensitive)
//! - no two symbols may be confirmed to the same letter
//! - a symbol's confirmed letter may not also be excluded for it

use crate::types::{ConstraintError, Pattern, ALPHABET_SIZE};
use crate::vocab::{letter_index, LetterSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Caller-supplied letter knowledge, keyed by symbol index
///
/// Deserializes from the JSON shape used by API callers:
/// `{"confirmed": {"0": "N"}, "excluded": {"1": ["A", "E"]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConstraintSet {
    /// Symbol → letter known to be its plaintext
    pub confirmed: BTreeMap<usize, char>,

    /// Symbol → letters known not to be its plaintext
    pub excluded: BTreeMap<usize, BTreeSet<char>>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the API layer's JSON representation
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add a confirmed mapping
    pub fn confirm(mut self, symbol: usize, letter: char) -> Self {
        self.confirmed.insert(symbol, letter);
        self
    }

    /// Add excluded letters for a symbol
    pub fn exclude<I>(mut self, symbol: usize, letters: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        self.excluded.entry(symbol).or_default().extend(letters);
        self
    }

    /// No confirmed or excluded letters at all
    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty() && self.excluded.values().all(BTreeSet::is_empty)
    }

    /// Validate against a pattern and build the per-symbol lookup tables
    pub fn compile(&self, pattern: &Pattern) -> Result<CompiledConstraints, ConstraintError> {
        let symbols = pattern.symbol_count();
        let mut confirmed: Vec<Option<u8>> = vec![None; symbols];
        let mut excluded: Vec<LetterSet> = vec![LetterSet::new(); symbols];
        let mut owners: [Option<usize>; ALPHABET_SIZE] = [None; ALPHABET_SIZE];

        for (&symbol, &ch) in &self.confirmed {
            check_range(symbol, symbols)?;
            let letter = letter_index(ch).ok_or(ConstraintError::InvalidLetter { symbol, char: ch })?;
            if let Some(first) = owners[letter as usize] {
                return Err(ConstraintError::DuplicateLetter {
                    letter: ch.to_ascii_uppercase(),
                    first,
                    second: symbol,
                });
            }
            owners[letter as usize] = Some(symbol);
            confirmed[symbol] = Some(letter);
        }

        for (&symbol, letters) in &self.excluded {
            check_range(symbol, symbols)?;
            for &ch in letters {
                let letter = letter_index(ch).ok_or(ConstraintError::InvalidLetter { symbol, char: ch })?;
                if confirmed[symbol] == Some(letter) {
                    return Err(ConstraintError::ConfirmedAndExcluded {
                        symbol,
                        letter: ch.to_ascii_uppercase(),
                    });
                }
                excluded[symbol].insert(letter);
            }
        }

        Ok(CompiledConstraints {
            confirmed,
            excluded,
        })
    }
}

fn check_range(symbol: usize, symbols: usize) -> Result<(), ConstraintError> {
    if symbol < symbols {
        Ok(())
    } else {
        Err(ConstraintError::SymbolOutOfRange { symbol, symbols })
    }
}

/// Constraints validated for one pattern, indexed by symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledConstraints {
    confirmed: Vec<Option<u8>>,
    excluded: Vec<LetterSet>,
}

impl CompiledConstraints {
    /// Confirmed letter index for a symbol
    pub fn confirmed(&self, symbol: usize) -> Option<u8> {
        self.confirmed.get(symbol).copied().flatten()
    }

    /// Excluded letters for a symbol
    pub fn excluded(&self, symbol: usize) -> LetterSet {
        self.excluded.get(symbol).copied().unwrap_or_default()
    }

    /// Whether `letter` is an acceptable plaintext for `symbol`
    #[inline]
    pub fn admits(&self, symbol: usize, letter: u8) -> bool {
        match self.confirmed(symbol) {
            Some(confirmed) => confirmed == letter,
            None => !self.excluded(symbol).contains(letter),
        }
    }

    /// Symbols carrying any constraint, ascending
    pub fn constrained_symbols(&self) -> Vec<usize> {
        (0..self.confirmed.len())
            .filter(|&s| self.confirmed[s].is_some() || !self.excluded[s].is_empty())
            .collect()
    }

    /// Every candidate passes
    pub fn is_unconstrained(&self) -> bool {
        self.confirmed.iter().all(Option::is_none) && self.excluded.iter().all(LetterSet::is_empty)
    }
}
