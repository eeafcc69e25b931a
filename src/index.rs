// Cipher pattern word index
// Maps each canonical pattern to its frequency-ranked bucket of words

use crate::frequency::FrequencyModel;
use crate::pattern::encode;
use crate::types::{Anomaly, AnomalyKind, Pattern, PatternError, WordEntry};
use crate::vocab::normalize_word;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;

/// Immutable pattern → candidates index
///
/// Built once from a dictionary and a [`FrequencyModel`]. Every bucket is
/// sorted by descending frequency, then ascending word, so identical
/// inputs always give identical buckets regardless of input order. Nothing
/// mutates the index after [`WordIndex::build`] returns, so it can be
/// shared across threads behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    /// Pattern → ranked entries
    buckets: FxHashMap<Pattern, Vec<WordEntry>>,

    /// Distinct words indexed
    total_words: usize,

    /// Dictionary rows skipped during the build
    anomalies: Vec<Anomaly>,
}

/// Summary counts for an index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub patterns: usize,
    pub words: usize,
    pub anomalies: usize,
    pub largest_bucket: usize,
}

/// Bucket ordering: descending frequency, ties by ascending word
fn rank(a: &WordEntry, b: &WordEntry) -> Ordering {
    b.frequency()
        .total_cmp(&a.frequency())
        .then_with(|| a.word().cmp(b.word()))
}

impl WordIndex {
    /// Build the index from dictionary words
    ///
    /// Words are normalised to uppercase and de-duplicated. A word that
    /// cannot be a cipher word (non-letters, empty, too long) is skipped
    /// and recorded as an anomaly; the build always completes.
    ///
    /// # Example
    /// ```
    /// # use cipher_patterns::{FrequencyModel, WordIndex, pattern::encode};
    /// let frequencies = FrequencyModel::from_counts([("NOON", 30.0), ("ABBA", 5.0)]);
    /// let index = WordIndex::build(["abba", "noon", "it's"], &frequencies);
    ///
    /// let bucket = index.lookup(&encode("deed").unwrap());
    /// assert_eq!(bucket[0].word(), "NOON");
    /// assert_eq!(bucket[1].word(), "ABBA");
    /// assert_eq!(index.anomalies().len(), 1);
    /// ```
    pub fn build<I, S>(dictionary: I, frequencies: &FrequencyModel) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buckets: FxHashMap<Pattern, Vec<WordEntry>> = FxHashMap::default();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut anomalies = Vec::new();

        for (idx, raw) in dictionary.into_iter().enumerate() {
            let raw = raw.as_ref();
            let indexed = normalize_word(raw).and_then(|word| Ok((encode(&word)?, word)));
            let (pattern, word) = match indexed {
                Ok(indexed) => indexed,
                Err(err) => {
                    tracing::warn!(line = idx + 1, word = raw, error = %err, "skipping dictionary row");
                    anomalies.push(Anomaly {
                        line: idx + 1,
                        raw: raw.to_string(),
                        kind: AnomalyKind::MalformedWord(err),
                    });
                    continue;
                }
            };

            if !seen.insert(word.clone()) {
                continue;
            }

            let frequency = frequencies.score_of(&word);
            buckets
                .entry(pattern)
                .or_default()
                .push(WordEntry::new(word, frequency));
        }

        for bucket in buckets.values_mut() {
            bucket.sort_by(rank);
        }

        let index = Self {
            buckets,
            total_words: seen.len(),
            anomalies,
        };

        tracing::info!(
            patterns = index.pattern_count(),
            words = index.total_words,
            anomalies = index.anomalies.len(),
            "word index built"
        );

        index
    }

    /// Ranked bucket for a pattern, empty when no word matches
    pub fn lookup(&self, pattern: &Pattern) -> &[WordEntry] {
        self.buckets.get(pattern).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ranked bucket of words structurally equivalent to `word`
    pub fn lookup_word(&self, word: &str) -> Result<&[WordEntry], PatternError> {
        Ok(self.lookup(&encode(word)?))
    }

    /// All indexed patterns, in no particular order
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> + '_ {
        self.buckets.keys()
    }

    /// Number of distinct patterns
    pub fn pattern_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of distinct words
    pub fn word_count(&self) -> usize {
        self.total_words
    }

    /// Get counts of words by word length
    pub fn words_count_by_length(&self) -> FxHashMap<usize, usize> {
        let mut counts: FxHashMap<usize, usize> = FxHashMap::default();
        for (pattern, bucket) in &self.buckets {
            *counts.entry(pattern.len()).or_insert(0) += bucket.len();
        }
        counts
    }

    /// Dictionary rows skipped during the build
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            patterns: self.pattern_count(),
            words: self.total_words,
            anomalies: self.anomalies.len(),
            largest_bucket: self.buckets.values().map(Vec::len).max().unwrap_or(0),
        }
    }
}
