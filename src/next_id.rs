//! Next-identifier recovery.
//!
//! The content tree is the only record of which identifiers are taken: the
//! next identifier is always one past the largest numeric leaf name found
//! under the destination root.

use anyhow::{bail, Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use walkdir::WalkDir;

/// Extension of leaf and index files in the content tree.
pub const CONTENT_EXTENSION: &str = "md";

/// Returns the first identifier not used by any leaf under `root`.
///
/// A missing root is an empty tree. Entries that vanish while walking are
/// ignored; any other walk error is returned.
pub fn next_id(root: &Path) -> Result<u64> {
    let mut max_id = 0u64;

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_not_found(&err) => continue,
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to scan destination tree: {}", root.display())
                })
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }

        if let Some(id) = leaf_id(&entry.file_name().to_string_lossy()) {
            max_id = max_id.max(id);
        }
    }

    match max_id.checked_add(1) {
        Some(next) => Ok(next),
        None => bail!(
            "No identifier left after leaf {} in {}",
            max_id,
            root.display()
        ),
    }
}

/// Parses a leaf file name such as `42.md` into its identifier.
pub fn leaf_id(file_name: &str) -> Option<u64> {
    let stem = file_name.strip_suffix(CONTENT_EXTENSION)?.strip_suffix('.')?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .map(|io| io.kind() == ErrorKind::NotFound)
        .unwrap_or(false)
}
