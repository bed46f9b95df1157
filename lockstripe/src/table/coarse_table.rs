use std::sync::{Mutex, MutexGuard, PoisonError};

use super::bucket::{alloc_buckets, bucket_index, Bucket};
use super::{Key, Table};
use crate::Result;

/// A concurrent hash table implemented with coarse-grained locking.
///
/// Routes keys exactly like [`StripedHashTable`](super::StripedHashTable)
/// but guards every bucket with one shared lock, so all operations are
/// serialized. Useful as a baseline when measuring what striping buys.
pub struct CoarseHashTable<V> {
    buckets: Mutex<Vec<Bucket<V>>>,
    num_buckets: usize,
}

impl<V> CoarseHashTable<V> {
    pub fn new(num_buckets: usize) -> Result<Self> {
        let buckets = alloc_buckets(num_buckets, Bucket::default)?;
        tracing::debug!(num_buckets, "built coarse hash table");
        Ok(Self {
            buckets: Mutex::new(buckets),
            num_buckets,
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.num_buckets
    }

    pub fn bucket_index(&self, key: Key) -> usize {
        bucket_index(key, self.num_buckets)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Bucket<V>>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Table for CoarseHashTable<V> {
    type Val = V;

    fn insert(&self, key: Key, value: V) {
        let idx = self.bucket_index(key);
        self.lock()[idx].push(key, value);
    }

    fn lookup(&self, key: Key) -> Option<V> {
        let idx = self.bucket_index(key);
        self.lock()[idx].find(key).cloned()
    }

    fn len(&self) -> usize {
        self.lock().iter().map(Bucket::len).sum()
    }
}

impl<V> std::fmt::Debug for CoarseHashTable<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoarseHashTable")
            .field("buckets", &self.num_buckets)
            .finish_non_exhaustive()
    }
}
