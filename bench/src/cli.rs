use clap::{Parser, ValueEnum};

/// Put/get throughput benchmark for lock-striped hash tables
#[derive(Parser, Debug)]
#[command(name = "bench_striped_table", version, about)]
pub struct BenchArgs {
    /// Number of worker threads per phase
    #[arg(value_name = "NUM_THREADS", value_parser = positive)]
    pub threads: usize,

    /// Number of random keys inserted and then looked up
    #[arg(long, default_value_t = 100_000, value_parser = positive)]
    pub keys: usize,

    /// Number of buckets (and bucket locks) in the table
    #[arg(long, default_value_t = 5, value_parser = positive)]
    pub buckets: usize,

    /// Seed for key generation; drawn from entropy when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Table implementation to drive
    #[arg(long, value_enum, default_value_t = TableKind::Striped)]
    pub table: TableKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TableKind {
    /// One lock per bucket
    Striped,
    /// One lock for the whole table
    Coarse,
    /// `dashmap::DashMap` as an external baseline
    Dashmap,
}

fn positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be a positive number".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
