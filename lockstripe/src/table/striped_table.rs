use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use super::bucket::{alloc_buckets, bucket_index, Bucket};
use super::{Key, Table};
use crate::Result;

/// One bucket together with the lock guarding it.
struct Stripe<V> {
    bucket: Mutex<Bucket<V>>,
    // Times an operation found `bucket` already locked and had to wait.
    contended: AtomicU64,
}

impl<V> Stripe<V> {
    fn new() -> Self {
        Self {
            bucket: Mutex::new(Bucket::default()),
            contended: AtomicU64::new(0),
        }
    }
}

/// A concurrent hash table with one lock per bucket.
///
/// Keys are routed to bucket `key mod N`, where `N` is fixed at construction.
/// An insert or lookup locks exactly one bucket for its whole duration, so
/// operations on different buckets run in parallel while operations on the
/// same bucket are serialized. No operation ever holds two bucket locks.
///
/// A small `N` serializes most operations; it is a knob for experimentation
/// and has no effect on correctness.
///
/// ```
/// use lockstripe::{StripedHashTable, Table};
///
/// let table = StripedHashTable::new(5)?;
/// table.insert(7, 3);
/// table.insert(12, 9);
/// assert_eq!(table.bucket_index(7), table.bucket_index(12));
/// assert_eq!(table.lookup(7), Some(3));
/// assert_eq!(table.lookup(12), Some(9));
/// assert_eq!(table.lookup(8), None);
/// # Ok::<(), lockstripe::TableError>(())
/// ```
pub struct StripedHashTable<V> {
    stripes: Vec<CachePadded<Stripe<V>>>,
}

impl<V> StripedHashTable<V> {
    /// Builds a table with `num_buckets` empty buckets.
    ///
    /// Fails with [`TableError::InvalidBucketCount`] for zero buckets and
    /// [`TableError::ResourceExhaustion`] when the buckets cannot be allocated.
    ///
    /// [`TableError::InvalidBucketCount`]: crate::TableError::InvalidBucketCount
    /// [`TableError::ResourceExhaustion`]: crate::TableError::ResourceExhaustion
    pub fn new(num_buckets: usize) -> Result<Self> {
        let stripes = alloc_buckets(num_buckets, || CachePadded::new(Stripe::new()))?;
        tracing::debug!(num_buckets, "built striped hash table");
        Ok(Self { stripes })
    }

    pub fn bucket_count(&self) -> usize {
        self.stripes.len()
    }

    /// The bucket every entry for `key` lives in.
    pub fn bucket_index(&self, key: Key) -> usize {
        bucket_index(key, self.stripes.len())
    }

    /// Number of entries stored in bucket `idx`, or `None` if out of range.
    pub fn bucket_len(&self, idx: usize) -> Option<usize> {
        self.stripes.get(idx).map(|_| self.lock(idx).len())
    }

    /// How many acquisitions of bucket `idx` had to wait for another holder.
    pub fn contended_acquisitions(&self, idx: usize) -> Option<u64> {
        self.stripes
            .get(idx)
            .map(|stripe| stripe.contended.load(Ordering::Relaxed))
    }

    pub fn total_contended_acquisitions(&self) -> u64 {
        self.stripes
            .iter()
            .map(|stripe| stripe.contended.load(Ordering::Relaxed))
            .sum()
    }

    fn lock(&self, idx: usize) -> MutexGuard<'_, Bucket<V>> {
        let stripe = &self.stripes[idx];
        // Entries are immutable once pushed, so a poisoned bucket is still
        // consistent.
        match stripe.bucket.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                stripe.contended.fetch_add(1, Ordering::Relaxed);
                stripe
                    .bucket
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
            }
        }
    }
}

impl<V: Clone> Table for StripedHashTable<V> {
    type Val = V;

    fn insert(&self, key: Key, value: V) {
        let idx = self.bucket_index(key);
        self.lock(idx).push(key, value);
    }

    fn lookup(&self, key: Key) -> Option<V> {
        let idx = self.bucket_index(key);
        self.lock(idx).find(key).cloned()
    }

    fn len(&self) -> usize {
        (0..self.stripes.len()).map(|idx| self.lock(idx).len()).sum()
    }
}

impl<V> std::fmt::Debug for StripedHashTable<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripedHashTable")
            .field("buckets", &self.stripes.len())
            .finish_non_exhaustive()
    }
}
