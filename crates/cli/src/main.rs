//! LRU-IPV trace replay CLI.
//!
//! This binary drives the replacement engine from the command line. It performs:
//! 1. **Replay:** Run an access trace through the reference cache and report
//!    cache and policy statistics, optionally dumping every policy operation.
//! 2. **Schedule:** Print the insertion pattern for a quantum / MRU share.
//!
//! Logging is controlled with `RUST_LOG` and goes to stderr.

use std::io;
use std::process;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ipvsim_core::cache::policies::{Insertion, InsertionSchedule, TextTraceObserver};
use ipvsim_core::config::Config;
use ipvsim_core::sim::{self, trace};
use ipvsim_core::CacheSim;

#[derive(Parser, Debug)]
#[command(
    name = "ipvsim",
    author,
    version,
    about = "LRU-IPV cache replacement trace replayer",
    long_about = "Replay an access trace against a set-associative cache using LRU replacement with an insertion policy vector.\n\nExamples:\n  ipvsim replay --trace loop.trace\n  ipvsim replay --trace loop.trace --config l1.json --dump\n  ipvsim schedule --quantum 8 --mru-pct 25"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and print statistics.
    Replay {
        /// Trace file (`R|W|I <addr>` per line).
        #[arg(short, long)]
        trace: String,

        /// JSON configuration file; built-in defaults when omitted.
        #[arg(short, long)]
        config: Option<String>,

        /// Latency charged for writing back a dirty victim.
        #[arg(long, default_value_t = 10)]
        next_level_latency: u64,

        /// Dump every policy operation to stdout in the text trace format.
        #[arg(long)]
        dump: bool,

        /// Print statistics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the insertion schedule for the given parameters.
    Schedule {
        /// Schedule period.
        #[arg(short, long, default_value_t = 4, allow_negative_numbers = true)]
        quantum: i64,

        /// Percentage of fills inserted at MRU.
        #[arg(short, long, default_value_t = 50, allow_negative_numbers = true)]
        mru_pct: i64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay {
            trace,
            config,
            next_level_latency,
            dump,
            json,
        } => cmd_replay(&trace, config.as_deref(), next_level_latency, dump, json),
        Commands::Schedule { quantum, mru_pct } => cmd_schedule(quantum, mru_pct),
    }
}

/// Loads configuration and trace, replays, and prints statistics.
///
/// Any failure is reported on stderr and exits with status 1.
fn cmd_replay(
    trace_path: &str,
    config_path: Option<&str>,
    next_level_latency: u64,
    dump: bool,
    json: bool,
) {
    let config = match config_path {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| fatal(&format!("{path}: {e}"))),
        None => Config::default(),
    };
    let records = trace::load_trace(trace_path)
        .unwrap_or_else(|e| fatal(&format!("{trace_path}: {e}")));

    let mut cache = CacheSim::new(&config).unwrap_or_else(|e| fatal(&e.to_string()));
    if dump {
        cache
            .policy_mut()
            .set_observer(Some(Box::new(TextTraceObserver::new(io::stdout()))));
    }
    info!(
        records = records.len(),
        sets = cache.num_sets(),
        ways = cache.ways(),
        "replaying trace"
    );

    let summary = sim::replay(&mut cache, &records, next_level_latency)
        .unwrap_or_else(|e| fatal(&e.to_string()));

    if json {
        let report = json!({
            "replay": summary,
            "cache": cache.stats(),
            "policy": cache.policy().stats(),
        });
        println!("{report:#}");
    } else {
        println!();
        println!(
            "trace: {} records, {} access cycles ({} write-back)",
            summary.records, summary.access_cycles, summary.writeback_cycles
        );
        cache.stats().print(cache.policy().stats());
    }
}

/// Prints the insertion pattern as slot ranges.
fn cmd_schedule(quantum: i64, mru_pct: i64) {
    let schedule = InsertionSchedule::new(quantum, mru_pct);
    let (mru, period) = (schedule.mru_slots(), schedule.quantum());
    println!("quantum {period} (mru_pct {mru_pct})");
    if mru > 0 {
        println!("  slots {:>12}..{mru:<12} {}", 0, Insertion::Mru);
    }
    if mru < period {
        println!("  slots {mru:>12}..{period:<12} {}", Insertion::NearLru);
    }
}

fn fatal(msg: &str) -> ! {
    eprintln!("\n[!] FATAL: {msg}");
    process::exit(1);
}
