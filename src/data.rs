// Cipher pattern data loader
// Reads dictionary, frequency and n-gram sources and builds the index

use crate::frequency::{FrequencyModel, NgramModel};
use crate::index::WordIndex;
use crate::pattern::{encode, normalize};
use crate::rules::WordRules;
use crate::types::{Anomaly, AnomalyKind, Pattern};
use crate::vocab::normalize_word;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal source loading errors; the index is not built
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No dictionary source: set a word list or a pattern list")]
    NoDictionary,
}

/// Where the index inputs live
#[derive(Debug, Clone, Default)]
pub struct SourceConfig {
    /// Word list, `WORD` or `WORD COUNT` per line
    pub dictionary: Option<PathBuf>,

    /// Pattern list, `PATTERN WORD WORD ...` per line
    pub patterns: Option<PathBuf>,

    /// Word counts, `WORD COUNT` per line; defaults to counts in the word list
    pub frequencies: Option<PathBuf>,

    /// Letter n-gram weights, `NGRAM WEIGHT` per line
    pub ngrams: Option<PathBuf>,

    /// Drop implausible corpus words before indexing
    pub strict: bool,
}

/// Words and optional counts parsed from a `WORD [COUNT]` source
#[derive(Debug, Clone, Default)]
pub struct WordCounts {
    pub words: Vec<String>,
    pub counts: Vec<(String, f64)>,
    pub anomalies: Vec<Anomaly>,
}

/// Words parsed from a pattern-list source
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    pub words: Vec<String>,
    pub anomalies: Vec<Anomaly>,
}

/// Source file parser and index builder
pub struct DataLoader;

impl DataLoader {
    /// Parse `WORD` / `WORD COUNT` lines
    ///
    /// Extra columns are ignored. A count that is not a number is an
    /// anomaly; the word itself is still kept.
    pub fn parse_word_counts(contents: &str) -> WordCounts {
        let mut parsed = WordCounts::default();

        for (idx, line) in contents.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            parsed.words.push(word.to_string());

            if let Some(raw_count) = fields.next() {
                match raw_count.parse::<f64>() {
                    Ok(count) => parsed.counts.push((word.to_string(), count)),
                    Err(_) => parsed.anomalies.push(Anomaly {
                        line: idx + 1,
                        raw: line.to_string(),
                        kind: AnomalyKind::InvalidCount(raw_count.to_string()),
                    }),
                }
            }
        }

        parsed
    }

    /// Parse `PATTERN WORD WORD ...` lines
    ///
    /// Patterns use the 1-based digit form (e.g. `12213`), separated tokens,
    /// or run-together numbers for patterns with ten or more symbols. Words
    /// whose own pattern differs from the declared one are anomalies and
    /// are dropped.
    pub fn parse_pattern_list(contents: &str) -> PatternList {
        let mut parsed = PatternList::default();

        for (idx, line) in contents.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(raw_pattern) = fields.next() else {
                continue;
            };
            let declared = match normalize(raw_pattern) {
                Ok(pattern) => Declared::Pattern(pattern),
                // Wide rows have their 1-based symbols run together ("12345678910")
                Err(_) if raw_pattern.bytes().all(|b| b.is_ascii_digit()) => {
                    Declared::Digits(raw_pattern)
                }
                Err(err) => {
                    parsed.anomalies.push(Anomaly {
                        line: idx + 1,
                        raw: raw_pattern.to_string(),
                        kind: AnomalyKind::MalformedWord(err),
                    });
                    continue;
                }
            };

            for word in fields {
                let kind = match encode(word) {
                    Ok(actual) if declared.matches(&actual) => {
                        parsed.words.push(word.to_string());
                        continue;
                    }
                    Ok(actual) => AnomalyKind::PatternMismatch {
                        declared: declared.to_string(),
                        actual: actual.to_string(),
                    },
                    Err(err) => AnomalyKind::MalformedWord(err),
                };
                parsed.anomalies.push(Anomaly {
                    line: idx + 1,
                    raw: word.to_string(),
                    kind,
                });
            }
        }

        parsed
    }

    /// Read a source file into memory
    pub fn read(path: &Path) -> Result<String, LoadError> {
        fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load every configured source and build the index
    ///
    /// I/O failures abort the build. Row-level problems are logged as
    /// warnings and the build continues.
    pub fn build_index(config: &SourceConfig) -> Result<WordIndex, LoadError> {
        if config.dictionary.is_none() && config.patterns.is_none() {
            return Err(LoadError::NoDictionary);
        }

        let mut words = Vec::new();
        let mut counts = Vec::new();

        if let Some(path) = &config.dictionary {
            let parsed = Self::parse_word_counts(&Self::read(path)?);
            report(path, &parsed.anomalies);
            words.extend(parsed.words);
            counts.extend(parsed.counts);
        }

        if let Some(path) = &config.patterns {
            let parsed = Self::parse_pattern_list(&Self::read(path)?);
            report(path, &parsed.anomalies);
            words.extend(parsed.words);
        }

        if let Some(path) = &config.frequencies {
            let parsed = Self::parse_word_counts(&Self::read(path)?);
            report(path, &parsed.anomalies);
            counts = parsed.counts;
        }

        let mut frequencies = FrequencyModel::from_counts(counts);

        if let Some(path) = &config.ngrams {
            let parsed = Self::parse_word_counts(&Self::read(path)?);
            report(path, &parsed.anomalies);
            let ngrams = NgramModel::from_weights(parsed.counts);
            tracing::info!(n = ngrams.n(), path = %path.display(), "n-gram model loaded");
            frequencies = frequencies.with_ngrams(ngrams);
        }

        if config.strict {
            let before = words.len();
            words.retain(|word| is_plausible_or_malformed(word));
            tracing::info!(filtered = before - words.len(), "strict mode dropped implausible words");
        }

        let model_anomalies = frequencies.anomalies().len()
            + frequencies.ngrams().map_or(0, |ngrams| ngrams.anomalies().len());
        tracing::info!(
            words = words.len(),
            frequencies = frequencies.len(),
            skipped = model_anomalies,
            "sources loaded"
        );

        Ok(WordIndex::build(words, &frequencies))
    }
}

/// Pattern declared by a pattern-list row
enum Declared<'a> {
    Pattern(Pattern),
    /// Unseparated 1-based symbols, ambiguous once a symbol reaches 10
    Digits(&'a str),
}

impl Declared<'_> {
    fn matches(&self, actual: &Pattern) -> bool {
        match self {
            Declared::Pattern(pattern) => pattern == actual,
            Declared::Digits(raw) => joined_digits(actual) == *raw,
        }
    }
}

impl fmt::Display for Declared<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declared::Pattern(pattern) => write!(f, "{}", pattern),
            Declared::Digits(raw) => write!(f, "{}", raw),
        }
    }
}

/// 1-based symbol numbers written with no separator
fn joined_digits(pattern: &Pattern) -> String {
    pattern
        .symbols()
        .iter()
        .map(|&s| (s as usize + 1).to_string())
        .collect()
}

/// Malformed words are kept so the index build reports them
fn is_plausible_or_malformed(word: &str) -> bool {
    normalize_word(word).map_or(true, |word| WordRules::new().is_plausible(&word))
}

fn report(path: &Path, anomalies: &[Anomaly]) {
    for anomaly in anomalies {
        tracing::warn!(path = %path.display(), "{}", anomaly);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PatternError;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cipher-patterns-{}-{}", std::process::id(), name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_plain_words() {
        let parsed = DataLoader::parse_word_counts("noon\nabba\n\n  letter  \n");
        assert_eq!(parsed.words, vec!["noon", "abba", "letter"]);
        assert!(parsed.counts.is_empty());
        assert!(parsed.anomalies.is_empty());
    }

    #[test]
    fn test_parse_word_counts() {
        let parsed = DataLoader::parse_word_counts("NOON 40\nABBA 7.5\nDEED lots\n");
        assert_eq!(parsed.words.len(), 3);
        assert_eq!(
            parsed.counts,
            vec![("NOON".to_string(), 40.0), ("ABBA".to_string(), 7.5)]
        );
        assert_eq!(parsed.anomalies.len(), 1);
        assert_eq!(parsed.anomalies[0].line, 3);
        assert_eq!(
            parsed.anomalies[0].kind,
            AnomalyKind::InvalidCount("lots".to_string())
        );
    }

    #[test]
    fn test_parse_pattern_list() {
        let parsed = DataLoader::parse_pattern_list("1221 ABBA NOON DEED\n123 THE AND\n");
        assert_eq!(parsed.words, vec!["ABBA", "NOON", "DEED", "THE", "AND"]);
        assert!(parsed.anomalies.is_empty());
    }

    #[test]
    fn test_parse_pattern_list_mismatch() {
        let parsed = DataLoader::parse_pattern_list("1221 ABBA NOTE\n13 WORD\n");
        assert_eq!(parsed.words, vec!["ABBA"]);
        assert_eq!(parsed.anomalies.len(), 2);
        assert_eq!(
            parsed.anomalies[0].kind,
            AnomalyKind::PatternMismatch {
                declared: "ABBA".to_string(),
                actual: "ABCD".to_string()
            }
        );
        assert_eq!(
            parsed.anomalies[1].kind,
            AnomalyKind::PatternMismatch {
                declared: "13".to_string(),
                actual: "ABCD".to_string()
            }
        );
    }

    #[test]
    fn test_parse_pattern_list_wide_rows() {
        let parsed = DataLoader::parse_pattern_list("12345678910 BLACKSMITH\n1221 NOON\n");
        assert_eq!(parsed.words, vec!["BLACKSMITH", "NOON"]);
        assert!(parsed.anomalies.is_empty());

        let parsed = DataLoader::parse_pattern_list("12345678910 BLACKSMITHS\n");
        assert!(parsed.words.is_empty());
        assert_eq!(
            parsed.anomalies[0].kind,
            AnomalyKind::PatternMismatch {
                declared: "12345678910".to_string(),
                actual: "ABCDEFGHIJF".to_string()
            }
        );
    }

    #[test]
    fn test_parse_pattern_list_bad_pattern() {
        let parsed = DataLoader::parse_pattern_list("1-3-2 ABC\n");
        assert!(parsed.words.is_empty());
        assert!(matches!(
            parsed.anomalies[0].kind,
            AnomalyKind::MalformedWord(PatternError::NonCanonical { .. })
        ));
    }

    #[test]
    fn test_build_requires_dictionary() {
        let result = DataLoader::build_index(&SourceConfig::default());
        assert!(matches!(result, Err(LoadError::NoDictionary)));
    }

    #[test]
    fn test_build_missing_file_is_fatal() {
        let config = SourceConfig {
            dictionary: Some(PathBuf::from("/nonexistent/cipher-patterns/words.txt")),
            ..SourceConfig::default()
        };
        let result = DataLoader::build_index(&config);
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_build_from_word_counts() {
        let path = temp_file("counts.txt", "abba 3\nnoon 40\ndeed 12\nit's 9\n");
        let config = SourceConfig {
            dictionary: Some(path.clone()),
            ..SourceConfig::default()
        };
        let index = DataLoader::build_index(&config).unwrap();
        let words: Vec<&str> = index
            .lookup_word("ABBA")
            .unwrap()
            .iter()
            .map(|e| e.word())
            .collect();
        assert_eq!(words, vec!["NOON", "DEED", "ABBA"]);
        assert_eq!(index.anomalies().len(), 1);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_build_with_separate_frequencies_and_strict() {
        let dictionary = temp_file("strict-words.txt", "abba\nnoon\nnasa\nrhythm\n");
        let frequencies = temp_file("strict-freq.txt", "ABBA 100\nNOON 5\n");
        let config = SourceConfig {
            dictionary: Some(dictionary.clone()),
            frequencies: Some(frequencies.clone()),
            strict: true,
            ..SourceConfig::default()
        };
        let index = DataLoader::build_index(&config).unwrap();
        assert_eq!(index.word_count(), 2);
        assert_eq!(index.lookup_word("ABBA").unwrap()[0].word(), "ABBA");
        fs::remove_file(dictionary).ok();
        fs::remove_file(frequencies).ok();
    }

    #[test]
    fn test_build_from_pattern_list_with_ngrams() {
        let patterns = temp_file("patterns.txt", "1221 ABBA NOON\n");
        let ngrams = temp_file("bigrams.txt", "NO 90\nOO 20\nON 80\n");
        let config = SourceConfig {
            patterns: Some(patterns.clone()),
            ngrams: Some(ngrams.clone()),
            ..SourceConfig::default()
        };
        let index = DataLoader::build_index(&config).unwrap();
        let bucket = index.lookup_word("DEED").unwrap();
        assert_eq!(bucket[0].word(), "NOON");
        assert!(bucket[0].frequency() > bucket[1].frequency());
        fs::remove_file(patterns).ok();
        fs::remove_file(ngrams).ok();
    }
}
