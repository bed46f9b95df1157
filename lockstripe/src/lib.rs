//! Fixed-size concurrent hash tables built on lock striping.
//!
//! [`StripedHashTable`] splits its key space into a fixed number of
//! buckets, each behind its own mutex, so threads working on different
//! buckets never wait on each other. [`CoarseHashTable`] offers the same
//! [`Table`] interface behind a single lock, for comparison.
//!
//! Neither table supports removal or resizing.

mod error;
mod table;

pub use error::{Result, TableError};
pub use table::{CoarseHashTable, Key, StripedHashTable, Table};
