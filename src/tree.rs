//! Content tree writer.
//!
//! Lays out records as `root/YYYY/MM/DD/{id}.md`, each grouping directory
//! carrying an `_index.md` node. Index nodes are created only when absent
//! and never rewritten, so a half-finished run leaves a tree the next run
//! can complete.

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::Config;
use crate::models::{FeedItem, IndexLevel};
use crate::next_id::CONTENT_EXTENSION;

/// Reserved file name of grouping nodes.
pub const INDEX_FILE: &str = "_index.md";

const FRONT_MATTER_FENCE: &str = "---";

/// Writes `item` under `root`, creating the dated directory and any missing
/// index nodes. Returns the path of the new leaf.
pub fn write_item(config: &Config, root: &Path, item: &FeedItem) -> Result<PathBuf> {
    let day_dir = IndexLevel::Day.dir(root, &item.date);
    fs::create_dir_all(&day_dir)
        .with_context(|| format!("Failed to create directory {}", day_dir.display()))?;

    for level in IndexLevel::ALL {
        ensure_index(config, root, item, level)?;
    }

    let leaf = day_dir.join(format!("{}.{}", item.id, CONTENT_EXTENSION));
    create_new(&leaf, &render_leaf(config, item))
        .with_context(|| format!("Failed to write {}", leaf.display()))?;

    Ok(leaf)
}

/// Creates the index node for `level` unless one already exists.
/// Returns whether a node was written.
pub fn ensure_index(
    config: &Config,
    root: &Path,
    item: &FeedItem,
    level: IndexLevel,
) -> Result<bool> {
    let dir = level.dir(root, &item.date);
    let index = dir.join(INDEX_FILE);
    if index.exists() {
        return Ok(false);
    }

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let content = render_index(config, &level.title(&item.date));
    match create_new(&index, &content) {
        Ok(()) => Ok(true),
        // Someone else created it between the check and the write.
        Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(err) => Err(err).with_context(|| format!("Failed to write {}", index.display())),
    }
}

pub fn render_index(config: &Config, title: &str) -> String {
    format!(
        "{fence}\ntitle: \"{title}\"\ntype: \"{kind}\"\n{fence}\n\n",
        fence = FRONT_MATTER_FENCE,
        title = title,
        kind = config.feed.kind,
    )
}

pub fn render_leaf(config: &Config, item: &FeedItem) -> String {
    let mut out = format!(
        "{fence}\ntitle: \"#{id}\"\ndate: \"{date}\"\ntype: \"{kind}\"\nurl: \"{url}\"\n",
        fence = FRONT_MATTER_FENCE,
        id = item.id,
        date = item.date.to_rfc3339_opts(SecondsFormat::Secs, true),
        kind = config.feed.kind,
        url = config.leaf_url(item.id),
    );
    if !item.tags.is_empty() {
        out.push_str("tags:\n");
        for tag in &item.tags {
            out.push_str(&format!("  - \"{}\"\n", tag));
        }
    }
    out.push_str(FRONT_MATTER_FENCE);
    out.push_str("\n\n");
    out.push_str(&item.body);
    out
}

fn create_new(path: &Path, content: &str) -> io::Result<()> {
    create_new_with(path, |file| {
        file.write_all(content.as_bytes())?;
        file.sync_all()
    })
}

/// Creates `path` exclusively and fills it with `fill`. A file that could
/// not be filled completely is removed again, so a failed write never
/// leaves a truncated leaf or index behind.
fn create_new_with<F>(path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(err) = fill(&mut file) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(
                "Failed to remove partial file {}: {}",
                path.display(),
                cleanup
            );
        }
        return Err(err);
    }
    Ok(())
}
