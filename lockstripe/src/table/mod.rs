//! This module contains concurrent hash table implementations.

mod bucket;
mod coarse_table;
mod striped_table;

pub use coarse_table::CoarseHashTable;
pub use striped_table::StripedHashTable;

/// Key type shared by every table.
pub type Key = i64;

/// Common functionalities for hash tables.
///
/// Both operations take `&self` so a table can be shared between threads
/// behind an `Arc`.
pub trait Table {
    /// Value type stored alongside each key.
    type Val;

    /// Stores a key-value pair.
    ///
    /// Inserting a key that is already present adds a second entry rather
    /// than overwriting the first; later lookups see the newer value.
    fn insert(&self, key: Key, value: Self::Val);

    /// Returns the most recently inserted value for `key`, if any.
    fn lookup(&self, key: Key) -> Option<Self::Val>;

    /// Total number of stored entries, duplicates included.
    fn len(&self) -> usize;

    /// Whether the table holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
