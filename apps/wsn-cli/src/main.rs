//! wsn-sim — batch driver for the WSN fault simulator.
//!
//! Reads a TOML batch description, runs every problem × variant × parameter
//! set on a worker pool, and streams results to CSV files or a SQLite
//! database.
//!
//! ```bash
//! # One default problem with default parameters, CSV output in ./results
//! wsn-sim
//!
//! # A configured sweep on 8 threads into SQLite
//! wsn-sim --config wsn.toml --threads 8 --backend sqlite --out sweep
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod config;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wsn_batch::BatchRunner;
use wsn_output::{CsvWriter, SqliteWriter, WriteBehind};

use config::{Backend, BatchConfig};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "wsn-sim")]
#[command(version, about = "Fault-tolerant wireless sensor network simulator", long_about = None)]
struct Args {
    /// Batch configuration file (TOML).  Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides `out`)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Worker threads, 0 for every core (overrides `threads`)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Root seed for problems and runs (overrides `seed`)
    #[arg(long)]
    seed: Option<u64>,

    /// Output backend (overrides `backend`)
    #[arg(long, value_enum)]
    backend: Option<Backend>,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => BatchConfig::load(path)?,
        None => BatchConfig::default(),
    };
    if let Some(out) = args.out {
        cfg.out = out;
    }
    if let Some(threads) = args.threads {
        cfg.threads = threads;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(backend) = args.backend {
        cfg.backend = backend;
    }

    let problems = cfg.problems.build(cfg.seed).context("building problems")?;
    let variants = cfg.variants()?;

    let sink = match cfg.backend {
        Backend::Csv => WriteBehind::spawn(CsvWriter::new(&cfg.out)?)?,
        Backend::Sqlite => WriteBehind::spawn(SqliteWriter::new(&cfg.out)?)?,
    };

    info!(
        out = %cfg.out.display(),
        backend = ?cfg.backend,
        seed = cfg.seed,
        "writing results"
    );

    let t0 = Instant::now();
    let outcome = BatchRunner::new(cfg.threads, cfg.seed).run(&problems, &variants, &cfg.grid, &sink.handle());
    // Drain whatever was queued even when the batch aborted.
    let stats = sink.finish();

    let summaries = outcome.context("batch aborted")?;
    let stats = stats.context("writing results")?;

    let failures: u64 = summaries.iter().map(|s| s.final_failure_count).sum();
    let delivered: f64 = summaries.iter().map(|s| s.delivered_volume).sum();
    info!(
        runs = stats.runs,
        nodes = stats.nodes,
        failures,
        delivered,
        elapsed_s = t0.elapsed().as_secs_f64(),
        "done"
    );
    Ok(())
}
