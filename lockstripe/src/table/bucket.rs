use super::Key;

/// A single key-value pair. Entries are never modified once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<V> {
    pub(crate) key: Key,
    pub(crate) value: V,
}

/// Append-only list of entries belonging to one bucket.
///
/// New entries go on the end and searches walk from the end, so a lookup
/// sees the most recently inserted entry for a key first.
#[derive(Debug)]
pub(crate) struct Bucket<V> {
    entries: Vec<Entry<V>>,
}

impl<V> Default for Bucket<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> Bucket<V> {
    pub(crate) fn push(&mut self, key: Key, value: V) {
        self.entries.push(Entry { key, value });
    }

    pub(crate) fn find(&self, key: Key) -> Option<&V> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entry<V>> {
        self.entries.iter().rev()
    }
}

/// Maps `key` onto `0..num_buckets`.
///
/// Uses the Euclidean remainder so negative keys still land in range.
/// `num_buckets` must be non-zero.
#[inline]
pub(crate) fn bucket_index(key: Key, num_buckets: usize) -> usize {
    key.rem_euclid(num_buckets as Key) as usize
}

/// Reserves exactly `num_buckets` empty buckets, failing instead of aborting
/// when the allocation cannot be satisfied.
pub(crate) fn alloc_buckets<T>(
    num_buckets: usize,
    mut make: impl FnMut() -> T,
) -> crate::Result<Vec<T>> {
    if num_buckets == 0 {
        return Err(crate::TableError::InvalidBucketCount);
    }
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(num_buckets)
        .map_err(|_| crate::TableError::ResourceExhaustion {
            buckets: num_buckets,
        })?;
    buckets.extend((0..num_buckets).map(|_| make()));
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_wins() {
        let mut bucket = Bucket::default();
        bucket.push(7, "old");
        bucket.push(12, "other");
        bucket.push(7, "new");
        assert_eq!(bucket.find(7), Some(&"new"));
        assert_eq!(bucket.find(12), Some(&"other"));
        assert_eq!(bucket.find(2), None);
        assert_eq!(bucket.len(), 3);

        let keys: Vec<Key> = bucket.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![7, 12, 7]);
    }

    #[test]
    fn routing() {
        assert_eq!(bucket_index(7, 5), 2);
        assert_eq!(bucket_index(12, 5), 2);
        assert_eq!(bucket_index(0, 5), 0);
        assert_eq!(bucket_index(-1, 5), 4);
        assert_eq!(bucket_index(i64::MIN, 5), i64::MIN.rem_euclid(5) as usize);
        assert_eq!(bucket_index(123_456, 1), 0);
    }

    #[test]
    fn zero_buckets_rejected() {
        let res = alloc_buckets(0, || ());
        assert_eq!(res.unwrap_err(), crate::TableError::InvalidBucketCount);
    }

    #[test]
    fn impossible_reservation_reported() {
        let res = alloc_buckets(usize::MAX, || 0u64);
        assert_eq!(
            res.unwrap_err(),
            crate::TableError::ResourceExhaustion {
                buckets: usize::MAX
            }
        );
    }
}
