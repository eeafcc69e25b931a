// Cipher alphabet
// Maps letters to indices and holds compact letter sets

use crate::types::{PatternError, ALPHABET_SIZE, MAX_WORD_LEN};
use std::fmt;

/// Index of an ASCII letter in the alphabet, case-insensitive
///
/// `'a'` and `'A'` both map to 0. Anything outside A-Z maps to `None`.
#[inline]
pub fn letter_index(ch: char) -> Option<u8> {
    if ch.is_ascii_alphabetic() {
        Some(ch.to_ascii_uppercase() as u8 - b'A')
    } else {
        None
    }
}

/// Uppercase letter for an alphabet index
#[inline]
pub fn index_letter(index: u8) -> char {
    debug_assert!((index as usize) < ALPHABET_SIZE);
    char::from(b'A' + index)
}

/// Validate a dictionary word and normalise it to uppercase
///
/// # Examples
/// ```
/// # use cipher_patterns::vocab::normalize_word;
/// assert_eq!(normalize_word("Noon").unwrap(), "NOON");
/// assert!(normalize_word("it's").is_err());
/// ```
pub fn normalize_word(word: &str) -> Result<String, PatternError> {
    if word.is_empty() {
        return Err(PatternError::EmptyPattern);
    }

    let mut normalized = String::with_capacity(word.len());
    for (position, ch) in word.chars().enumerate() {
        if position >= MAX_WORD_LEN {
            return Err(PatternError::LengthTooLong {
                actual: word.chars().count(),
            });
        }
        let index = letter_index(ch).ok_or(PatternError::InvalidCharacter { char: ch, position })?;
        normalized.push(index_letter(index));
    }
    Ok(normalized)
}

/// Set of alphabet letters packed into a bitmask
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LetterSet(u32);

impl LetterSet {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, index: u8) {
        self.0 |= 1 << index;
    }

    #[inline]
    pub fn contains(&self, index: u8) -> bool {
        self.0 & (1 << index) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Letter indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..ALPHABET_SIZE as u8).filter(move |&i| self.contains(i))
    }
}

impl FromIterator<u8> for LetterSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::new();
        for index in iter {
            set.insert(index);
        }
        set
    }
}

impl fmt::Debug for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(index_letter)).finish()
    }
}
