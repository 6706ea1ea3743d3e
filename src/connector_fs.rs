//! Queue directory scanner.
//!
//! Walks the queue root and turns every eligible file into a [`Candidate`].
//! Each walk entry is classified by [`visit`] into a [`Visit`]: accepted,
//! ignored (not a queue file at all) or skipped (a queue file that cannot be
//! used this run). Errors returned from the walk itself abort the scan.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, Local, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::{Config, TimeZoneMode};
use crate::models::Candidate;
use crate::normalize::normalize;

/// Extension of plain-text queue files. Files without an extension are
/// accepted as well.
pub const TEXT_EXTENSION: &str = "txt";

/// Outcome of looking at one walk entry.
#[derive(Debug)]
pub enum Visit {
    Accept(Candidate),
    Ignore,
    Skip(String),
}

/// Everything the scan found.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// In discovery order (sorted by file name within each directory).
    pub candidates: Vec<Candidate>,
    /// Eligible files left in place because they could not be used.
    pub skipped: usize,
}

pub fn scan_queue(config: &Config, root: &Path) -> Result<ScanOutcome> {
    if !root.is_dir() {
        bail!("Queue directory does not exist: {}", root.display());
    }

    let exclude_set = build_globset(&config.queue.exclude_globs)?;
    let mut outcome = ScanOutcome::default();

    let walker = WalkDir::new(root)
        .follow_links(config.queue.follow_symlinks)
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_not_found(err.io_error()) => {
                debug!("Entry vanished during scan: {}", err);
                continue;
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to scan queue: {}", root.display()))
            }
        };

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if exclude_set.is_match(relative) {
            continue;
        }

        match visit(&entry, config.time.zone)? {
            Visit::Accept(candidate) => outcome.candidates.push(candidate),
            Visit::Ignore => {}
            Visit::Skip(reason) => {
                warn!("Skipping {}: {}", entry.path().display(), reason);
                outcome.skipped += 1;
            }
        }
    }

    Ok(outcome)
}

/// Classifies a single walk entry. An `Err` aborts the whole scan.
pub fn visit(entry: &DirEntry, zone: TimeZoneMode) -> Result<Visit> {
    if entry.file_type().is_dir() || !is_queue_file(entry.path()) {
        return Ok(Visit::Ignore);
    }

    let path = entry.path();
    // Only reported when links are not followed; followed links resolve to their target type.
    if entry.file_type().is_symlink() {
        return Ok(Visit::Skip(
            "symbolic link not followed (queue.follow_symlinks is off)".to_string(),
        ));
    }
    let metadata = match entry.metadata() {
        Ok(metadata) => metadata,
        Err(err) if is_not_found(err.io_error()) => return Ok(Visit::Ignore),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to stat {}", path.display()))
        }
    };
    if !metadata.is_file() {
        return Ok(Visit::Ignore);
    }
    let modified = match metadata.modified() {
        Ok(modified) => modified,
        Err(err) => return Ok(Visit::Skip(format!("no modification time: {}", err))),
    };

    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(err) => return Ok(Visit::Skip(format!("cannot read file: {}", err))),
    };

    let base_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let normalized = match normalize(&raw, &base_name) {
        Ok(normalized) => normalized,
        Err(err) => return Ok(Visit::Skip(err.to_string())),
    };

    Ok(Visit::Accept(Candidate {
        body: normalized.body,
        tags: normalized.tags,
        date: record_time(modified, zone),
        source_path: path.to_path_buf(),
    }))
}

/// Plain-text files and files without an extension. The extension is
/// whatever follows the last dot of the name, so `.DS_Store` has extension
/// `DS_Store` while `.note.txt` is a text file.
pub fn is_queue_file(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    match name.rfind('.') {
        None => true,
        Some(dot) => &name[dot + 1..] == TEXT_EXTENSION,
    }
}

/// File mtime truncated to whole seconds, expressed in the configured zone.
pub fn record_time(modified: SystemTime, zone: TimeZoneMode) -> DateTime<FixedOffset> {
    let secs = DateTime::<Utc>::from(modified).timestamp();
    let utc = DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();
    match zone {
        TimeZoneMode::Local => utc.with_timezone(&Local).fixed_offset(),
        TimeZoneMode::Utc => utc.fixed_offset(),
    }
}

fn is_not_found(err: Option<&std::io::Error>) -> bool {
    err.map(|io| io.kind() == ErrorKind::NotFound)
        .unwrap_or(false)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(
            Glob::new(pattern).with_context(|| format!("Invalid exclude glob: {}", pattern))?,
        );
    }
    Ok(builder.build()?)
}
