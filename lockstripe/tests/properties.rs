//! Property tests for routing and lookup behaviour.

use lockstripe::{Key, StripedHashTable, Table};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use std::collections::HashMap;

#[quickcheck]
fn keys_route_to_their_remainder(entries: Vec<(Key, u32)>, buckets: u8) -> TestResult {
    if buckets == 0 {
        return TestResult::discard();
    }
    let buckets = buckets as usize;
    let table = StripedHashTable::new(buckets).unwrap();
    let mut expected = vec![0; buckets];
    for &(key, value) in &entries {
        table.insert(key, value);
        expected[key.rem_euclid(buckets as Key) as usize] += 1;
    }

    let routed = entries
        .iter()
        .all(|&(key, _)| table.bucket_index(key) == key.rem_euclid(buckets as Key) as usize);
    let counts = (0..buckets).all(|idx| table.bucket_len(idx) == Some(expected[idx]));
    TestResult::from_bool(routed && counts)
}

#[quickcheck]
fn absent_keys_are_not_found(present: Vec<Key>, probes: Vec<Key>) -> bool {
    let table = StripedHashTable::new(5).unwrap();
    for &key in &present {
        table.insert(key, key);
    }
    probes
        .iter()
        .filter(|key| !present.contains(key))
        .all(|&key| table.lookup(key).is_none())
}

#[quickcheck]
fn lookups_return_latest_insert(entries: Vec<(Key, u16)>) -> bool {
    let table = StripedHashTable::new(3).unwrap();
    let mut model = HashMap::new();
    for &(key, value) in &entries {
        table.insert(key, value);
        model.insert(key, value);
    }
    model
        .iter()
        .all(|(&key, &value)| table.lookup(key) == Some(value))
}

#[quickcheck]
fn repeated_lookups_agree(entries: Vec<(Key, u8)>, probe: Key) -> bool {
    let table = StripedHashTable::new(4).unwrap();
    for &(key, value) in &entries {
        table.insert(key, value);
    }
    let first = table.lookup(probe);
    (0..10).all(|_| table.lookup(probe) == first)
}
