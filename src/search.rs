// Cipher pattern query service
// Main API that orchestrates pattern normalisation, index lookup and filtering

use crate::constraints::ConstraintSet;
use crate::frequency::FrequencyModel;
use crate::index::{IndexStats, WordIndex};
use crate::matcher::ConstraintMatcher;
use crate::pattern::normalize;
use crate::types::{QueryError, WordEntry};
use std::sync::Arc;

/// Result bound used by [`QueryService::search`]
pub const DEFAULT_LIMIT: usize = 50;

/// Main query engine
///
/// Combines all components:
/// - Pattern normalisation (letter, digit or token forms)
/// - Index lookup (pre-ranked buckets)
/// - Constraint filtering (confirmed and excluded letters)
///
/// Holds the index behind an `Arc`; cloning the service is cheap and
/// queries take `&self`, so one index serves any number of threads.
#[derive(Debug, Clone)]
pub struct QueryService {
    index: Arc<WordIndex>,
}

impl QueryService {
    /// Create a service over a built index
    pub fn new(index: Arc<WordIndex>) -> Self {
        Self { index }
    }

    /// Build an index from in-memory sources and wrap it
    pub fn from_words<I, S>(dictionary: I, frequencies: &FrequencyModel) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Arc::new(WordIndex::build(dictionary, frequencies)))
    }

    /// The shared index
    pub fn index(&self) -> &WordIndex {
        &self.index
    }

    /// Ranked entries for a pattern under constraints
    ///
    /// # Arguments
    /// * `raw_pattern` - Pattern in any accepted form (e.g. "ABBA", "1221", "0 1 1 0")
    /// * `constraints` - Confirmed and excluded letters by symbol
    /// * `limit` - Maximum number of results, at least 1
    ///
    /// # Returns
    /// At most `limit` entries in bucket rank order; empty when nothing fits.
    pub fn query_entries(
        &self,
        raw_pattern: &str,
        constraints: &ConstraintSet,
        limit: i64,
    ) -> Result<Vec<&WordEntry>, QueryError> {
        // Step 1: Normalise the pattern
        let pattern = normalize(raw_pattern)?;

        // Step 2: Validate constraints against it
        let matcher = ConstraintMatcher::new(&pattern, constraints)?;

        let limit = checked_limit(limit)?;

        // Step 3: Filter the pre-ranked bucket
        let bucket = self.index.lookup(&pattern);
        let results = matcher.filter_limit(bucket, limit);

        tracing::debug!(
            pattern = %pattern,
            bucket = bucket.len(),
            returned = results.len(),
            limit,
            "query"
        );

        Ok(results)
    }

    /// Ranked candidate words for a pattern under constraints
    ///
    /// # Example
    /// ```
    /// # use cipher_patterns::{ConstraintSet, FrequencyModel, QueryService};
    /// let service = QueryService::from_words(["abba", "noon"], &FrequencyModel::new());
    ///
    /// let constraints = ConstraintSet::new().confirm(0, 'N');
    /// assert_eq!(service.query("ABBA", &constraints, 10).unwrap(), vec!["NOON"]);
    /// assert!(service.query("ABBA", &constraints, 0).is_err());
    /// ```
    pub fn query(
        &self,
        raw_pattern: &str,
        constraints: &ConstraintSet,
        limit: i64,
    ) -> Result<Vec<String>, QueryError> {
        Ok(self
            .query_entries(raw_pattern, constraints, limit)?
            .into_iter()
            .map(|entry| entry.word().to_string())
            .collect())
    }

    /// Query with the default result bound
    pub fn search(
        &self,
        raw_pattern: &str,
        constraints: &ConstraintSet,
    ) -> Result<Vec<String>, QueryError> {
        self.query(raw_pattern, constraints, DEFAULT_LIMIT as i64)
    }

    /// Get statistics about the current index
    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}

fn checked_limit(limit: i64) -> Result<usize, QueryError> {
    if limit < 1 {
        return Err(QueryError::InvalidLimit(limit));
    }
    Ok(usize::try_from(limit).unwrap_or(usize::MAX))
}
