//! Ingestion pipeline orchestration.
//!
//! Coordinates one batch: recover the next identifier from the content tree,
//! scan the queue, order candidates oldest first, assign identifiers, write
//! each record and remove its queue file. A bad file never stops the batch;
//! only failing to read the tree or the queue does.
//!
//! Two runs must not target the same content tree at the same time.

use anyhow::{bail, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::connector_fs::scan_queue;
use crate::models::{Candidate, FeedItem};
use crate::next_id::next_id;
use crate::tree::write_item;

/// Options for a single ingest run.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Plan identifiers without writing or deleting anything.
    pub dry_run: bool,
}

/// One identifier handed out during a run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Assignment {
    pub id: u64,
    pub source: PathBuf,
    /// Leaf path, when the record was written.
    pub leaf: Option<PathBuf>,
}

/// Summary of an ingest run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub found: usize,
    pub skipped: usize,
    pub written: usize,
    pub failed: usize,
    pub delete_failed: usize,
    /// First identifier still free after this run.
    pub next_id: u64,
    pub dry_run: bool,
    pub assignments: Vec<Assignment>,
}

impl IngestReport {
    pub fn print(&self) {
        if self.dry_run {
            println!("ingest (dry-run)");
        } else {
            println!("ingest");
        }
        println!("  found: {} items", self.found);
        println!("  skipped: {}", self.skipped);
        if self.dry_run {
            for a in &self.assignments {
                println!("  {} -> {}", a.source.display(), a.id);
            }
        } else {
            println!("  written: {}", self.written);
            println!("  failed: {}", self.failed);
            println!("  not removed: {}", self.delete_failed);
        }
        println!("  next id: {}", self.next_id);
        println!("ok");
    }
}

pub fn run_ingest(
    config: &Config,
    source: &Path,
    dest: &Path,
    options: &IngestOptions,
) -> Result<IngestReport> {
    debug!(
        "Processing files from {} to {}",
        source.display(),
        dest.display()
    );

    let first_id = next_id(dest)?;
    let scan = scan_queue(config, source)?;

    let mut report = IngestReport {
        found: scan.candidates.len(),
        skipped: scan.skipped,
        next_id: first_id,
        dry_run: options.dry_run,
        ..Default::default()
    };

    if scan.candidates.is_empty() {
        debug!("No files to process");
        return Ok(report);
    }

    let items = assign_ids(scan.candidates, first_id)?;
    report.next_id = first_id + items.len() as u64;

    for item in items {
        if options.dry_run {
            report.assignments.push(Assignment {
                id: item.id,
                source: item.source_path,
                leaf: None,
            });
            continue;
        }
        ingest_item(config, dest, item, &mut report);
    }

    if !options.dry_run {
        info!("Successfully processed {} feed items", report.written);
    }

    Ok(report)
}

/// Writes one record and removes its queue file, recording the outcome.
/// Failures are logged and counted; the identifier stays used either way.
pub fn ingest_item(config: &Config, dest: &Path, item: FeedItem, report: &mut IngestReport) {
    let leaf = match write_item(config, dest, &item) {
        Ok(leaf) => leaf,
        Err(err) => {
            error!(
                "Error creating feed file for {}: {:#}",
                item.source_path.display(),
                err
            );
            report.failed += 1;
            report.assignments.push(Assignment {
                id: item.id,
                source: item.source_path,
                leaf: None,
            });
            return;
        }
    };

    if let Err(err) = std::fs::remove_file(&item.source_path) {
        warn!(
            "Error removing original file {}: {}",
            item.source_path.display(),
            err
        );
        report.delete_failed += 1;
    }

    debug!(
        "Processed: {} -> ID {}",
        item.source_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        item.id
    );
    report.written += 1;
    report.assignments.push(Assignment {
        id: item.id,
        source: item.source_path,
        leaf: Some(leaf),
    });
}

/// Orders candidates oldest first (stable for equal timestamps) and numbers
/// them consecutively from `first_id`.
pub fn assign_ids(mut candidates: Vec<Candidate>, first_id: u64) -> Result<Vec<FeedItem>> {
    let count = candidates.len() as u64;
    if first_id.checked_add(count).is_none() {
        bail!(
            "Not enough identifiers left for {} items starting at {}",
            count,
            first_id
        );
    }

    candidates.sort_by_key(|c| c.date);
    Ok(candidates
        .into_iter()
        .zip(first_id..)
        .map(|(candidate, id)| candidate.with_id(id))
        .collect())
}
