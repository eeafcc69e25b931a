// Cipher pattern frequency model
// Static word frequency table with optional letter n-gram fallback for ranking

use crate::types::{Anomaly, AnomalyKind, ALPHABET_SIZE};
use crate::vocab::normalize_word;
use rustc_hash::FxHashMap;
use std::borrow::Cow;

/// Score given to words with no frequency data and no n-gram fallback
pub const FREQUENCY_FLOOR: f64 = 0.0;

/// Validate a raw count, returning it when usable for ranking
fn checked_count(count: f64) -> Option<f64> {
    (count.is_finite() && count >= 0.0).then_some(count)
}

/// Whole-word corpus frequencies
///
/// Built once from `(word, count)` pairs and read-only afterwards. Words
/// absent from the table score `FREQUENCY_FLOOR`, or a synthesized score
/// strictly below every known positive count when an [`NgramModel`] is
/// attached.
#[derive(Debug, Clone)]
pub struct FrequencyModel {
    /// Uppercase word → summed count
    words: FxHashMap<String, f64>,

    /// Letter n-gram fallback for unknown words
    ngrams: Option<NgramModel>,

    /// Smallest positive known count, scales synthesized scores
    scale: f64,

    /// Rows rejected while loading
    anomalies: Vec<Anomaly>,
}

impl FrequencyModel {
    /// Empty model: every word scores the floor
    pub fn new() -> Self {
        Self {
            words: FxHashMap::default(),
            ngrams: None,
            scale: 1.0,
            anomalies: Vec::new(),
        }
    }

    /// Build the table from `(word, count)` pairs
    ///
    /// Case variants of a word are summed. Rows with a malformed word or a
    /// negative / non-finite count are skipped and recorded as anomalies.
    ///
    /// # Example
    /// ```
    /// # use cipher_patterns::FrequencyModel;
    /// let model = FrequencyModel::from_counts([("noon", 40.0), ("Noon", 2.0)]);
    /// assert_eq!(model.score_of("NOON"), 42.0);
    /// assert_eq!(model.score_of("abba"), 0.0);
    /// ```
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut words: FxHashMap<String, f64> = FxHashMap::default();
        let mut anomalies = Vec::new();

        for (idx, (raw, count)) in counts.into_iter().enumerate() {
            let raw = raw.as_ref();
            let word = match normalize_word(raw) {
                Ok(word) => word,
                Err(err) => {
                    tracing::warn!(line = idx + 1, word = raw, error = %err, "skipping frequency row");
                    anomalies.push(Anomaly {
                        line: idx + 1,
                        raw: raw.to_string(),
                        kind: AnomalyKind::MalformedWord(err),
                    });
                    continue;
                }
            };
            let Some(count) = checked_count(count) else {
                tracing::warn!(line = idx + 1, word = raw, count, "skipping frequency row with invalid count");
                anomalies.push(Anomaly {
                    line: idx + 1,
                    raw: raw.to_string(),
                    kind: AnomalyKind::InvalidCount(count.to_string()),
                });
                continue;
            };
            *words.entry(word).or_insert(0.0) += count;
        }

        let scale = words
            .values()
            .copied()
            .filter(|&c| c > 0.0)
            .min_by(f64::total_cmp)
            .unwrap_or(1.0);

        Self {
            words,
            ngrams: None,
            scale,
            anomalies,
        }
    }

    /// Attach an n-gram model used to synthesize scores for unknown words
    pub fn with_ngrams(mut self, ngrams: NgramModel) -> Self {
        self.ngrams = Some(ngrams);
        self
    }

    /// Ranking score for a word, case-insensitive
    pub fn score_of(&self, word: &str) -> f64 {
        let key = if word.bytes().any(|b| b.is_ascii_lowercase()) {
            Cow::Owned(word.to_ascii_uppercase())
        } else {
            Cow::Borrowed(word)
        };

        if let Some(&count) = self.words.get(key.as_ref()) {
            return count;
        }

        self.ngrams
            .as_ref()
            .and_then(|ngrams| ngrams.probability(&key))
            .map_or(FREQUENCY_FLOOR, |p| p * self.scale)
    }

    /// Whether the word has a corpus count
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word.to_ascii_uppercase().as_str())
    }

    /// Number of words with a corpus count
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Attached n-gram model, if any
    pub fn ngrams(&self) -> Option<&NgramModel> {
        self.ngrams.as_ref()
    }

    /// Rows rejected while building the table
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }
}

impl Default for FrequencyModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-length letter n-gram weights
///
/// Gives an add-one smoothed likelihood for words missing from the word
/// table. All n-grams in one model share the same length `n`.
#[derive(Debug, Clone, Default)]
pub struct NgramModel {
    n: usize,
    weights: FxHashMap<String, f64>,
    total: f64,
    anomalies: Vec<Anomaly>,
}

impl NgramModel {
    /// Build a model from `(ngram, weight)` pairs
    ///
    /// The first valid row fixes `n`. Rows of another length, with
    /// non-letters, or with an invalid weight are skipped and recorded.
    pub fn from_weights<I, S>(weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut model = Self::default();

        for (idx, (raw, weight)) in weights.into_iter().enumerate() {
            let raw = raw.as_ref();
            let line = idx + 1;
            let gram = match normalize_word(raw) {
                Ok(gram) => gram,
                Err(err) => {
                    tracing::warn!(line, ngram = raw, error = %err, "skipping n-gram row");
                    model.reject(line, raw, AnomalyKind::MalformedWord(err));
                    continue;
                }
            };
            let Some(weight) = checked_count(weight) else {
                tracing::warn!(line, ngram = raw, weight, "skipping n-gram row with invalid weight");
                model.reject(line, raw, AnomalyKind::InvalidCount(weight.to_string()));
                continue;
            };
            if model.n == 0 {
                model.n = gram.len();
            } else if gram.len() != model.n {
                tracing::warn!(line, ngram = raw, expected = model.n, "skipping n-gram of wrong length");
                let kind = AnomalyKind::NgramLength {
                    expected: model.n,
                    actual: gram.len(),
                };
                model.reject(line, raw, kind);
                continue;
            }
            *model.weights.entry(gram).or_insert(0.0) += weight;
            model.total += weight;
        }

        model
    }

    fn reject(&mut self, line: usize, raw: &str, kind: AnomalyKind) {
        self.anomalies.push(Anomaly {
            line,
            raw: raw.to_string(),
            kind,
        });
    }

    /// N-gram length, 0 for an empty model
    pub fn n(&self) -> usize {
        self.n
    }

    /// Geometric mean of the smoothed n-gram probabilities of an uppercase word
    ///
    /// Always in (0, 1). `None` when the model is empty or the word is
    /// shorter than `n`.
    pub fn probability(&self, word: &str) -> Option<f64> {
        if self.n == 0 || word.len() < self.n {
            return None;
        }

        let vocabulary = (ALPHABET_SIZE as f64).powi(self.n as i32);
        let denominator = self.total + vocabulary;
        let bytes = word.as_bytes();
        let mut log_sum = 0.0;
        let mut count = 0usize;

        for window in bytes.windows(self.n) {
            let weight = std::str::from_utf8(window)
                .ok()
                .and_then(|gram| self.weights.get(gram))
                .copied()
                .unwrap_or(0.0);
            log_sum += ((weight + 1.0) / denominator).ln();
            count += 1;
        }

        Some((log_sum / count as f64).exp())
    }

    /// Rows rejected while building the model
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }
}
