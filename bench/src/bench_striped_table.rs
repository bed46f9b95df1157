mod cli;
mod harness;

use clap::Parser;
use cli::{BenchArgs, TableKind};
use harness::{generate_keys, round_trip, BenchError, DashTable, RoundTrip};
use lockstripe::{CoarseHashTable, StripedHashTable};
use rand::Rng;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn run(args: &BenchArgs) -> Result<RoundTrip, BenchError> {
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(
        threads = args.threads,
        keys = args.keys,
        buckets = args.buckets,
        seed,
        table = ?args.table,
        "starting benchmark"
    );
    let keys = generate_keys(args.keys, seed);

    let report = match args.table {
        TableKind::Striped => round_trip(StripedHashTable::new(args.buckets)?, keys, args.threads)?,
        TableKind::Coarse => round_trip(CoarseHashTable::new(args.buckets)?, keys, args.threads)?,
        TableKind::Dashmap => round_trip(DashTable::default(), keys, args.threads)?,
    };

    if report.lost > 0 {
        return Err(BenchError::KeysLost {
            lost: report.lost,
            total: report.inserted,
        });
    }
    Ok(report)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = BenchArgs::parse();
    match run(&args) {
        Ok(report) => {
            info!(
                put_secs = report.put_elapsed.as_secs_f64(),
                get_secs = report.get_elapsed.as_secs_f64(),
                "all {} keys round-tripped",
                report.inserted
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
