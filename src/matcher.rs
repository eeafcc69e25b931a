// Cipher pattern constraint matcher
// Filters a ranked bucket down to words consistent with known letters

use crate::constraints::{CompiledConstraints, ConstraintSet};
use crate::types::{ConstraintError, Pattern, WordEntry};
use crate::vocab::letter_index;

/// Matcher for one pattern under one validated constraint set
///
/// For each constrained symbol, the candidate's letter at that symbol's
/// first position must equal the confirmed letter, or must not be one of
/// the excluded letters. Filtering keeps the bucket's order, so ranking
/// survives untouched.
#[derive(Debug, Clone)]
pub struct ConstraintMatcher<'a> {
    pattern: &'a Pattern,

    constraints: CompiledConstraints,

    /// (symbol, first position) for every constrained symbol
    checks: Vec<(usize, usize)>,
}

impl<'a> ConstraintMatcher<'a> {
    /// Validate `constraints` against `pattern` and prepare the checks
    ///
    /// # Example
    /// ```
    /// # use cipher_patterns::{ConstraintMatcher, ConstraintSet, FrequencyModel, WordIndex};
    /// # use cipher_patterns::pattern::encode;
    /// let index = WordIndex::build(["abba", "noon"], &FrequencyModel::new());
    /// let pattern = encode("ABBA").unwrap();
    /// let constraints = ConstraintSet::new().confirm(0, 'N');
    ///
    /// let matcher = ConstraintMatcher::new(&pattern, &constraints).unwrap();
    /// let survivors = matcher.filter(index.lookup(&pattern));
    /// let words: Vec<&str> = survivors.iter().map(|e| e.word()).collect();
    /// assert_eq!(words, vec!["NOON"]);
    /// ```
    pub fn new(pattern: &'a Pattern, constraints: &ConstraintSet) -> Result<Self, ConstraintError> {
        let constraints = constraints.compile(pattern)?;
        let first_positions = pattern.first_positions();
        let checks = constraints
            .constrained_symbols()
            .into_iter()
            .map(|symbol| (symbol, first_positions[symbol]))
            .collect();

        Ok(Self {
            pattern,
            constraints,
            checks,
        })
    }

    /// The pattern this matcher was built for
    pub fn pattern(&self) -> &Pattern {
        self.pattern
    }

    /// Whether a candidate word satisfies every constraint
    ///
    /// The word must already have this matcher's pattern, as every entry
    /// of the pattern's bucket does; only the first position of each
    /// constrained symbol is read. Words of the wrong length never match.
    pub fn is_match(&self, word: &str) -> bool {
        let bytes = word.as_bytes();
        if bytes.len() != self.pattern.len() {
            return false;
        }

        self.checks.iter().all(|&(symbol, position)| {
            letter_index(char::from(bytes[position]))
                .is_some_and(|letter| self.constraints.admits(symbol, letter))
        })
    }

    /// Surviving entries of `bucket`, in bucket order
    pub fn filter<'b>(&self, bucket: &'b [WordEntry]) -> Vec<&'b WordEntry> {
        self.filter_limit(bucket, usize::MAX)
    }

    /// The first `limit` surviving entries of `bucket`, in bucket order
    ///
    /// Stops scanning once `limit` entries have been found.
    pub fn filter_limit<'b>(&self, bucket: &'b [WordEntry], limit: usize) -> Vec<&'b WordEntry> {
        bucket
            .iter()
            .filter(|entry| self.is_match(entry.word()))
            .take(limit)
            .collect()
    }
}

/// Filter a bucket in one call
///
/// Fails only when the constraint set itself is inconsistent; an empty
/// result is a valid outcome.
pub fn filter<'b>(
    bucket: &'b [WordEntry],
    pattern: &Pattern,
    constraints: &ConstraintSet,
) -> Result<Vec<&'b WordEntry>, ConstraintError> {
    let matcher = ConstraintMatcher::new(pattern, constraints)?;
    Ok(matcher.filter(bucket))
}
