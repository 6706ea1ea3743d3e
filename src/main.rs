//! # Feed Harness CLI (`feed-harness`)
//!
//! Moves every note in a queue directory into a dated content tree.
//!
//! ## Usage
//!
//! ```bash
//! feed-harness ./queue ./content/feed
//! feed-harness ./queue ./content/feed --verbose
//! feed-harness ./queue ./content/feed --dry-run --config ./feed.toml
//! ```
//!
//! Exits non-zero only when the content tree or the queue cannot be read,
//! or when an explicitly given config file is invalid. Files skipped or
//! failed along the way are logged and do not change the exit status.

use clap::Parser;
use std::path::PathBuf;

use feed_harness::config::{self, Config};
use feed_harness::ingest::{run_ingest, IngestOptions};

/// Feed Harness: turn a queue of plain-text notes into a dated content tree.
#[derive(Parser)]
#[command(
    name = "feed-harness",
    about = "Turn a queue of plain-text notes into a dated, tagged content tree",
    version
)]
struct Cli {
    /// Queue directory holding `.txt` (or extensionless) notes.
    source_dir: PathBuf,

    /// Root of the content tree (created on demand).
    dest_dir: PathBuf,

    /// Log every processed file.
    #[arg(short, long)]
    verbose: bool,

    /// Path to an optional configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show the identifiers that would be assigned without writing or
    /// deleting anything.
    #[arg(long)]
    dry_run: bool,

    /// Print the run summary as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .init();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };

    let options = IngestOptions {
        dry_run: cli.dry_run,
    };
    let report = run_ingest(&cfg, &cli.source_dir, &cli.dest_dir, &options)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }

    Ok(())
}
