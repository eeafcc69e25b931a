//! # Cipher Patterns: Candidate Retrieval for Substitution Ciphers
//!
//! Given the structural pattern of an enciphered word (which positions
//! share a cipher symbol) and whatever letters are already known, returns
//! real words that fit, ranked by corpus frequency.
//!
//! ## Query Flow
//!
//! 1. **Normalise** - the caller's pattern becomes a canonical [`Pattern`]
//!    - `"XQQX"`, `"ABBA"`, `"1221"` and `"0 1 1 0"` are all the same pattern
//! 2. **Lookup** - the [`WordIndex`] bucket for that pattern, pre-sorted
//!    by descending frequency (ties alphabetical)
//! 3. **Filter** - [`ConstraintMatcher`] drops words that contradict
//!    confirmed letters or use excluded ones, keeping bucket order
//! 4. **Truncate** - at most `limit` words are returned
//!
//! ## Example Usage
//!
//! ```
//! use cipher_patterns::{ConstraintSet, FrequencyModel, QueryService};
//!
//! let frequencies = FrequencyModel::from_counts([("NOON", 120.0), ("DEED", 40.0)]);
//! let service = QueryService::from_words(["abba", "noon", "deed"], &frequencies);
//!
//! // No letters known yet
//! let all = service.query("XQQX", &ConstraintSet::new(), 10)?;
//! assert_eq!(all, vec!["NOON", "DEED", "ABBA"]);
//!
//! // X is known not to be N, and Q is known to be E
//! let constraints = ConstraintSet::new().exclude(0, ['N']).confirm(1, 'E');
//! assert_eq!(service.query("XQQX", &constraints, 10)?, vec!["DEED"]);
//! # Ok::<(), cipher_patterns::QueryError>(())
//! ```
//!
//! ## Architecture
//!
//! - **Pattern Encoder** - Canonical symbol renumbering of words and raw patterns
//! - **Frequency Model** - Static word counts with optional n-gram fallback
//! - **Word Index** - Immutable pattern → ranked bucket map, built once
//! - **Constraint Matcher** - Stateless, order-preserving filter
//! - **Query Service** - Main entry point combining all components
//! - **Data Loader** - Word list, pattern list and n-gram file readers

pub mod constraints;
pub mod data;
pub mod frequency;
pub mod index;
pub mod matcher;
pub mod pattern;
pub mod rules;
pub mod search;
pub mod types;
pub mod vocab;

// Re-export main types and functions for convenience
pub use constraints::{CompiledConstraints, ConstraintSet};
pub use data::{DataLoader, LoadError, SourceConfig};
pub use frequency::{FrequencyModel, NgramModel, FREQUENCY_FLOOR};
pub use index::{IndexStats, WordIndex};
pub use matcher::ConstraintMatcher;
pub use pattern::{encode, normalize};
pub use rules::{Rejection, WordRules};
pub use search::{QueryService, DEFAULT_LIMIT};
pub use types::{
    Anomaly, AnomalyKind, ConstraintError, Pattern, PatternError, QueryError, Symbol, WordEntry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_shared_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WordIndex>();
        assert_send_sync::<FrequencyModel>();
        assert_send_sync::<QueryService>();
    }
}
