//! Core data models used throughout the ingestion pipeline.
//!
//! A queue file becomes a [`Candidate`] when it survives normalization, and a
//! [`FeedItem`] once the orchestrator has given it an identifier.

use chrono::{DateTime, Datelike, FixedOffset};
use std::path::{Path, PathBuf};

/// A normalized queue file waiting for an identifier.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub body: String,
    pub tags: Vec<String>,
    pub date: DateTime<FixedOffset>,
    pub source_path: PathBuf,
}

impl Candidate {
    pub fn with_id(self, id: u64) -> FeedItem {
        FeedItem {
            id,
            body: self.body,
            tags: self.tags,
            date: self.date,
            source_path: self.source_path,
        }
    }
}

/// A record ready to be written as a leaf node.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub id: u64,
    pub body: String,
    pub tags: Vec<String>,
    pub date: DateTime<FixedOffset>,
    pub source_path: PathBuf,
}

/// One of the three grouping levels above a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexLevel {
    Year,
    Month,
    Day,
}

impl IndexLevel {
    pub const ALL: [IndexLevel; 3] = [IndexLevel::Year, IndexLevel::Month, IndexLevel::Day];

    /// Human title of the index node for `date` at this level.
    pub fn title(&self, date: &DateTime<FixedOffset>) -> String {
        match self {
            IndexLevel::Year => date.year().to_string(),
            IndexLevel::Month => date.format("%B %Y").to_string(),
            IndexLevel::Day => date.format("%B %-d, %Y").to_string(),
        }
    }

    /// Directory holding this level's index node, relative to the tree root.
    pub fn dir(&self, root: &Path, date: &DateTime<FixedOffset>) -> PathBuf {
        let year = root.join(format!("{:04}", date.year()));
        match self {
            IndexLevel::Year => year,
            IndexLevel::Month => year.join(format!("{:02}", date.month())),
            IndexLevel::Day => year
                .join(format!("{:02}", date.month()))
                .join(format!("{:02}", date.day())),
        }
    }
}
