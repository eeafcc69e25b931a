// Cipher pattern word rules
// Plausibility heuristics for raw corpus words (strict loading mode)

use std::fmt;

/// Words that look like words but are abbreviations
const ABBREVIATIONS: &[&str] = &[
    "BBC", "CNN", "CIA", "FBI", "USA", "UK", "EU", "UN", "NATO", "WHO", "WTO", "EEC", "EEG", "EKG",
    "DNA", "RNA", "HIV", "AIDS", "UFO", "CCTV", "AARP", "DDT", "EPA", "FDA", "IRS", "NASA", "NBA",
    "NFL", "NHL", "NPR", "PBS", "TV", "VCR", "VHS", "WWW", "WWI", "WWII",
];

const VOWELS: &[u8] = b"AEIOU";

/// Longest word strict mode keeps
pub const MAX_PLAUSIBLE_LEN: usize = 20;

/// Why a word was judged implausible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Longer than `MAX_PLAUSIBLE_LEN`
    TooLong,
    /// One-letter word other than A or I
    SingleLetter,
    /// Every letter is the same
    RepeatedLetter,
    /// Known abbreviation
    Abbreviation,
    /// Same letter more than twice in a row
    LongRun,
    /// No consonants or no vowels
    NoVowelBalance,
    /// Some letter occurs more than three times
    LetterOveruse,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooLong => write!(f, "TooLong"),
            Rejection::SingleLetter => write!(f, "SingleLetter"),
            Rejection::RepeatedLetter => write!(f, "RepeatedLetter"),
            Rejection::Abbreviation => write!(f, "Abbreviation"),
            Rejection::LongRun => write!(f, "LongRun"),
            Rejection::NoVowelBalance => write!(f, "NoVowelBalance"),
            Rejection::LetterOveruse => write!(f, "LetterOveruse"),
        }
    }
}

/// Plausibility rules for corpus words
///
/// Applied in strict mode to drop n-gram corpus noise (abbreviations,
/// keyboard mashes, OCR runs) before indexing. Inputs are expected to be
/// normalised uppercase words.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordRules;

impl WordRules {
    pub fn new() -> Self {
        Self
    }

    /// First rule the word breaks, if any
    pub fn check(&self, word: &str) -> Result<(), Rejection> {
        let bytes = word.as_bytes();

        if bytes.len() > MAX_PLAUSIBLE_LEN {
            return Err(Rejection::TooLong);
        }

        // A and I are the only single-letter words
        if bytes.len() == 1 {
            return match bytes[0] {
                b'A' | b'I' => Ok(()),
                _ => Err(Rejection::SingleLetter),
            };
        }

        if bytes.iter().all(|&b| b == bytes[0]) {
            return Err(Rejection::RepeatedLetter);
        }

        if ABBREVIATIONS.contains(&word) {
            return Err(Rejection::Abbreviation);
        }

        if bytes.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]) {
            return Err(Rejection::LongRun);
        }

        let vowels = bytes.iter().filter(|b| VOWELS.contains(b)).count();
        if vowels == 0 || vowels == bytes.len() {
            return Err(Rejection::NoVowelBalance);
        }

        let mut counts = [0u8; 26];
        for &b in bytes {
            if let Some(count) = counts.get_mut(b.wrapping_sub(b'A') as usize) {
                *count += 1;
                if *count > 3 {
                    return Err(Rejection::LetterOveruse);
                }
            }
        }

        Ok(())
    }

    /// Whether the word passes every rule
    pub fn is_plausible(&self, word: &str) -> bool {
        self.check(word).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinary_words_pass() {
        let rules = WordRules::new();
        for word in ["LETTER", "KETTLE", "NOON", "ABBA", "A", "I", "CIPHER"] {
            assert!(rules.is_plausible(word), "{} should pass", word);
        }
    }

    #[test]
    fn test_single_letters() {
        let rules = WordRules::new();
        assert_eq!(rules.check("B"), Err(Rejection::SingleLetter));
    }

    #[test]
    fn test_too_long() {
        let rules = WordRules::new();
        assert_eq!(rules.check(&"AB".repeat(11)), Err(Rejection::TooLong));
    }

    #[test]
    fn test_repeated_letter() {
        let rules = WordRules::new();
        assert_eq!(rules.check("AA"), Err(Rejection::RepeatedLetter));
        assert_eq!(rules.check("ZZZZ"), Err(Rejection::RepeatedLetter));
    }

    #[test]
    fn test_abbreviations() {
        let rules = WordRules::new();
        assert_eq!(rules.check("NASA"), Err(Rejection::Abbreviation));
        assert_eq!(rules.check("FBI"), Err(Rejection::Abbreviation));
    }

    #[test]
    fn test_long_run() {
        let rules = WordRules::new();
        assert_eq!(rules.check("BOOOK"), Err(Rejection::LongRun));
    }

    #[test]
    fn test_vowel_balance() {
        let rules = WordRules::new();
        assert_eq!(rules.check("RHYTHM"), Err(Rejection::NoVowelBalance));
        assert_eq!(rules.check("EAU"), Err(Rejection::NoVowelBalance));
    }

    #[test]
    fn test_letter_overuse() {
        let rules = WordRules::new();
        assert_eq!(rules.check("MISSISSIPPI"), Err(Rejection::LetterOveruse));
        assert!(!rules.is_plausible("SASSES"));
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(Rejection::LongRun.to_string(), "LongRun");
    }
}
