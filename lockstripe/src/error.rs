//! Errors surfaced when building a table.

use thiserror::Error;

/// Result alias for fallible table operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Construction failures.
///
/// Lookups never fail: a missing key is `None`, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A table needs at least one bucket to route keys into.
    #[error("bucket count must be positive")]
    InvalidBucketCount,

    /// Bucket storage could not be reserved.
    #[error("out of memory allocating {buckets} buckets")]
    ResourceExhaustion {
        /// Number of buckets requested.
        buckets: usize,
    },
}
