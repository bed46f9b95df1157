//! Put and get phases driven from a pool of worker threads.
//!
//! Worker `t` of `k` owns key positions `t, t + k, t + 2k, ...`, so the
//! positions are split round-robin and no two workers share one.

use dashmap::DashMap;
use lockstripe::{Key, Table, TableError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::iter::StepBy;
use std::ops::Range;
use std::sync::{Arc, Barrier};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

macro_rules! bench {
    ($body: expr) => {{
        let now = Instant::now();
        let out = $body;
        (out, now.elapsed())
    }};
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("worker {tid} panicked during the {phase} phase")]
    WorkerPanicked { phase: &'static str, tid: usize },

    #[error("{lost} of {total} keys were lost")]
    KeysLost { lost: u64, total: usize },
}

/// Wraps `DashMap` so it can be driven like the lockstripe tables.
///
/// Unlike those tables, inserting an existing key overwrites it.
#[derive(Default)]
pub struct DashTable(DashMap<Key, Key>);

impl Table for DashTable {
    type Val = Key;

    fn insert(&self, key: Key, value: Key) {
        self.0.insert(key, value);
    }

    fn lookup(&self, key: Key) -> Option<Key> {
        self.0.get(&key).map(|value| *value)
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// `count` keys in `0..=i32::MAX`, reproducible for a given `seed`.
pub fn generate_keys(count: usize, seed: u64) -> Vec<Key> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(0..=i32::MAX as Key)).collect()
}

fn positions(tid: usize, threads: usize, len: usize) -> StepBy<Range<usize>> {
    (tid..len).step_by(threads)
}

/// Spawns `threads` workers running `work(tid)`, releases them together and
/// times them from release until the last one finishes.
fn run_phase<F, R>(phase: &'static str, threads: usize, work: F) -> Result<(Vec<R>, Duration), BenchError>
where
    F: Fn(usize) -> R + Send + Sync + 'static,
    R: Send + 'static,
{
    let work = Arc::new(work);
    let start = Arc::new(Barrier::new(threads + 1));

    let handles: Vec<JoinHandle<R>> = (0..threads)
        .map(|tid| {
            let work = work.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                work(tid)
            })
        })
        .collect();

    let (results, elapsed) = bench!({
        start.wait();
        handles
            .into_iter()
            .enumerate()
            .map(|(tid, h)| h.join().map_err(|_| BenchError::WorkerPanicked { phase, tid }))
            .collect::<Result<Vec<R>, BenchError>>()
    });
    Ok((results?, elapsed))
}

/// Inserts every key, valued with the id of the worker that inserted it.
pub fn put_phase<T>(table: &Arc<T>, keys: &Arc<Vec<Key>>, threads: usize) -> Result<Duration, BenchError>
where
    T: Table<Val = Key> + Send + Sync + 'static,
{
    let table = table.clone();
    let keys = keys.clone();
    let (_, elapsed) = run_phase("put", threads, move |tid| {
        for pos in positions(tid, threads, keys.len()) {
            table.insert(keys[pos], tid as Key);
        }
    })?;
    Ok(elapsed)
}

/// Looks every key up again and returns how many could not be found.
pub fn get_phase<T>(table: &Arc<T>, keys: &Arc<Vec<Key>>, threads: usize) -> Result<(u64, Duration), BenchError>
where
    T: Table<Val = Key> + Send + Sync + 'static,
{
    let table = table.clone();
    let keys = keys.clone();
    let (lost, elapsed) = run_phase("get", threads, move |tid| {
        let lost = positions(tid, threads, keys.len())
            .filter(|&pos| table.lookup(keys[pos]).is_none())
            .count() as u64;
        info!("[thread {tid}] {lost} keys lost!");
        lost
    })?;
    Ok((lost.into_iter().sum(), elapsed))
}

/// Outcome of one put phase followed by one get phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTrip {
    pub inserted: usize,
    pub lost: u64,
    pub put_elapsed: Duration,
    pub get_elapsed: Duration,
}

pub fn round_trip<T>(table: T, keys: Vec<Key>, threads: usize) -> Result<RoundTrip, BenchError>
where
    T: Table<Val = Key> + Send + Sync + 'static,
{
    let table = Arc::new(table);
    let keys = Arc::new(keys);

    let put_elapsed = put_phase(&table, &keys, threads)?;
    println!(
        "[main] Inserted {} keys in {:.6} seconds",
        keys.len(),
        put_elapsed.as_secs_f64()
    );

    let (lost, get_elapsed) = get_phase(&table, &keys, threads)?;
    println!(
        "[main] Retrieved {}/{} keys in {:.6} seconds",
        keys.len() as u64 - lost,
        keys.len(),
        get_elapsed.as_secs_f64()
    );

    Ok(RoundTrip {
        inserted: keys.len(),
        lost,
        put_elapsed,
        get_elapsed,
    })
}
