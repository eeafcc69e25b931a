// Cipher pattern encoder
// Canonicalises words and raw caller patterns into structural patterns

use crate::types::{Pattern, PatternError, Symbol, ALPHABET_SIZE, MAX_WORD_LEN};
use crate::vocab::letter_index;
use regex::Regex;
use std::sync::LazyLock;

/// Separators accepted between tokens of a raw symbol pattern
static TOKEN_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,.\-]+").expect("token separator regex is valid"));

/// Encode a word into its canonical structural pattern
///
/// Letters are compared case-insensitively. Each distinct letter gets the
/// next symbol in order of first appearance.
///
/// # Examples
/// ```
/// # use cipher_patterns::pattern::encode;
/// let pattern = encode("letter").unwrap();
/// assert_eq!(pattern.symbols(), &[0, 1, 2, 2, 1, 3]);
/// assert_eq!(pattern.to_string(), "ABCCBD");
///
/// assert!(encode("don't").is_err());
/// ```
pub fn encode(word: &str) -> Result<Pattern, PatternError> {
    if word.is_empty() {
        return Err(PatternError::EmptyPattern);
    }

    let mut seen: [Option<Symbol>; ALPHABET_SIZE] = [None; ALPHABET_SIZE];
    let mut next: Symbol = 0;
    let mut symbols = Vec::with_capacity(word.len());

    for (position, ch) in word.chars().enumerate() {
        if position >= MAX_WORD_LEN {
            return Err(PatternError::LengthTooLong {
                actual: word.chars().count(),
            });
        }
        let index = letter_index(ch).ok_or(PatternError::InvalidCharacter { char: ch, position })?;
        let symbol = *seen[index as usize].get_or_insert_with(|| {
            let symbol = next;
            next += 1;
            symbol
        });
        symbols.push(symbol);
    }

    Ok(Pattern::from_canonical(symbols))
}

/// Normalise a caller-supplied pattern into canonical form
///
/// # Accepted Forms
/// - Letters: `"ABCA"`, `"xyzx"` or an enciphered word, encoded like a word
/// - Compact digits: `"11213"` (1-based, as in pattern lists) or `"00102"`
/// - Separated tokens: `"0 1 1 0"`, `"1,2,2,1"`, `"1-2-3-4-5-6-7-8-9-10"`
///
/// Token forms must start at 0 or 1 and introduce each new symbol as
/// exactly one more than the largest seen so far.
///
/// # Examples
/// ```
/// # use cipher_patterns::pattern::{encode, normalize};
/// let noon = encode("noon").unwrap();
/// assert_eq!(normalize("ABBA").unwrap(), noon);
/// assert_eq!(normalize("1221").unwrap(), noon);
/// assert_eq!(normalize("0 1 1 0").unwrap(), noon);
///
/// assert!(normalize("1 3 2").is_err());
/// ```
pub fn normalize(raw: &str) -> Result<Pattern, PatternError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(PatternError::EmptyPattern);
    }

    if raw.chars().all(|c| c.is_ascii_alphabetic()) {
        return encode(raw);
    }

    let values = if TOKEN_SEPARATORS.is_match(raw) {
        TOKEN_SEPARATORS
            .split(raw)
            .filter(|token| !token.is_empty())
            .map(parse_token)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        raw.chars()
            .enumerate()
            .map(|(position, ch)| {
                ch.to_digit(10)
                    .map(|d| d as usize)
                    .ok_or(PatternError::InvalidCharacter { char: ch, position })
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    from_tokens(&values)
}

/// Check whether two words share the same letter-equality structure
pub fn is_structurally_equivalent(a: &str, b: &str) -> Result<bool, PatternError> {
    Ok(encode(a)? == encode(b)?)
}

/// Parse one separated token as a decimal symbol number
fn parse_token(token: &str) -> Result<usize, PatternError> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PatternError::InvalidToken {
            token: token.to_string(),
        });
    }
    token.parse().map_err(|_| PatternError::InvalidToken {
        token: token.to_string(),
    })
}

/// Build a canonical pattern from numeric tokens, detecting the base
fn from_tokens(values: &[usize]) -> Result<Pattern, PatternError> {
    let Some(&first) = values.first() else {
        return Err(PatternError::EmptyPattern);
    };

    if values.len() > MAX_WORD_LEN {
        return Err(PatternError::LengthTooLong {
            actual: values.len(),
        });
    }

    let base = match first {
        0 | 1 => first,
        found => {
            return Err(PatternError::NonCanonical {
                found,
                expected: 1,
                position: 0,
            })
        }
    };

    let mut introduced = 0usize;
    let mut symbols = Vec::with_capacity(values.len());

    for (position, &value) in values.iter().enumerate() {
        let Some(symbol) = value.checked_sub(base) else {
            return Err(PatternError::InvalidToken {
                token: value.to_string(),
            });
        };
        if symbol > introduced {
            return Err(PatternError::NonCanonical {
                found: value,
                expected: introduced + base,
                position,
            });
        }
        if symbol == introduced {
            introduced += 1;
        }
        symbols.push(symbol as Symbol);
    }

    if introduced > ALPHABET_SIZE {
        return Err(PatternError::TooManySymbols { actual: introduced });
    }

    Ok(Pattern::from_canonical(symbols))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============ Word Encoding Tests ============

    #[test]
    fn test_encode_letter() {
        let pattern = encode("LETTER").unwrap();
        assert_eq!(pattern.symbols(), &[0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn test_encode_kettle() {
        let pattern = encode("KETTLE").unwrap();
        assert_eq!(pattern.symbols(), &[0, 1, 2, 2, 3, 1]);
    }

    #[test]
    fn test_encode_case_insensitive() {
        assert_eq!(encode("Noon").unwrap(), encode("nOoN").unwrap());
        assert_eq!(encode("aA").unwrap().symbols(), &[0, 0]);
    }

    #[test]
    fn test_encode_single_letter() {
        assert_eq!(encode("I").unwrap().symbols(), &[0]);
    }

    #[test]
    fn test_encode_all_distinct() {
        let pattern = encode("abcdefghijklmnopqrstuvwxyz").unwrap();
        assert_eq!(pattern.symbol_count(), 26);
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(""), Err(PatternError::EmptyPattern));
    }

    #[test]
    fn test_encode_rejects_non_letters() {
        assert_eq!(
            encode("it's"),
            Err(PatternError::InvalidCharacter { char: '\'', position: 2 })
        );
        assert_eq!(
            encode("a b"),
            Err(PatternError::InvalidCharacter { char: ' ', position: 1 })
        );
        assert!(encode("café").is_err());
    }

    #[test]
    fn test_encode_too_long() {
        let word = "ab".repeat(30);
        assert_eq!(
            encode(&word),
            Err(PatternError::LengthTooLong { actual: 60 })
        );
    }

    // ============ Raw Pattern Normalisation Tests ============

    #[test]
    fn test_normalize_letter_form() {
        assert_eq!(normalize("ABBA").unwrap().symbols(), &[0, 1, 1, 0]);
        assert_eq!(normalize("xyzx").unwrap().symbols(), &[0, 1, 2, 0]);
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize("  ABBA \n").unwrap().symbols(), &[0, 1, 1, 0]);
    }

    #[test]
    fn test_normalize_compact_one_based() {
        assert_eq!(normalize("11213").unwrap().symbols(), &[0, 0, 1, 0, 2]);
    }

    #[test]
    fn test_normalize_compact_zero_based() {
        assert_eq!(normalize("00102").unwrap().symbols(), &[0, 0, 1, 0, 2]);
    }

    #[test]
    fn test_normalize_separated_tokens() {
        assert_eq!(normalize("0 1 1 0").unwrap().symbols(), &[0, 1, 1, 0]);
        assert_eq!(normalize("1,2,2,1").unwrap().symbols(), &[0, 1, 1, 0]);
        assert_eq!(normalize("1, 2, 2, 1").unwrap().symbols(), &[0, 1, 1, 0]);
        assert_eq!(normalize("1.2.2.1").unwrap().symbols(), &[0, 1, 1, 0]);
    }

    #[test]
    fn test_normalize_more_than_nine_symbols() {
        let raw = "1-2-3-4-5-6-7-8-9-10-1";
        let pattern = normalize(raw).unwrap();
        assert_eq!(pattern.symbol_count(), 10);
        assert_eq!(pattern.symbols()[10], 0);
    }

    #[test]
    fn test_normalize_rejects_skipped_symbol() {
        assert_eq!(
            normalize("1 3 2"),
            Err(PatternError::NonCanonical {
                found: 3,
                expected: 2,
                position: 1
            })
        );
        assert_eq!(
            normalize("0130"),
            Err(PatternError::NonCanonical {
                found: 3,
                expected: 2,
                position: 2
            })
        );
        assert_eq!(normalize("0102").unwrap().symbols(), &[0, 1, 0, 2]);
    }

    #[test]
    fn test_normalize_rejects_bad_start() {
        assert_eq!(
            normalize("2 1"),
            Err(PatternError::NonCanonical {
                found: 2,
                expected: 1,
                position: 0
            })
        );
    }

    #[test]
    fn test_normalize_rejects_below_base() {
        assert_eq!(
            normalize("1 0"),
            Err(PatternError::InvalidToken {
                token: "0".to_string()
            })
        );
    }

    #[test]
    fn test_normalize_rejects_mixed_forms() {
        assert_eq!(
            normalize("A1"),
            Err(PatternError::InvalidCharacter { char: 'A', position: 0 })
        );
        assert_eq!(
            normalize("AB BA"),
            Err(PatternError::InvalidToken {
                token: "AB".to_string()
            })
        );
        assert!(normalize("1 +2").is_err());
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert_eq!(normalize(""), Err(PatternError::EmptyPattern));
        assert_eq!(normalize("   "), Err(PatternError::EmptyPattern));
        assert_eq!(normalize(" , "), Err(PatternError::EmptyPattern));
    }

    #[test]
    fn test_normalize_rejects_too_many_symbols() {
        let raw: Vec<String> = (1..=27).map(|n| n.to_string()).collect();
        assert_eq!(
            normalize(&raw.join(" ")),
            Err(PatternError::TooManySymbols { actual: 27 })
        );
    }

    #[test]
    fn test_normalize_idempotent_on_display() {
        let pattern = encode("mississippi").unwrap();
        assert_eq!(normalize(&pattern.to_string()).unwrap(), pattern);
    }

    #[test]
    fn test_structural_equivalence() {
        assert!(is_structurally_equivalent("abba", "noon").unwrap());
        assert!(!is_structurally_equivalent("letter", "kettle").unwrap());
        assert!(is_structurally_equivalent("abba", "no-n").is_err());
    }
}
