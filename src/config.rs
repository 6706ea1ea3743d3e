use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub time: TimeConfig,
}

/// Values written into every node of the content tree.
#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    /// Kind marker (`type:` front-matter field).
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Leaf URLs are `{url_prefix}/{id}/`.
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            url_prefix: default_url_prefix(),
        }
    }
}

fn default_kind() -> String {
    "feed".to_string()
}
fn default_url_prefix() -> String {
    "/feed".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct QueueConfig {
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Globs (relative to the queue root) that are never ingested.
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TimeConfig {
    #[serde(default)]
    pub zone: TimeZoneMode,
}

/// Offset used when turning a file mtime into a record timestamp.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneMode {
    #[default]
    Local,
    Utc,
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.feed.kind.trim().is_empty() {
            anyhow::bail!("feed.kind must not be empty");
        }
        if self.feed.kind.contains('"') {
            anyhow::bail!("feed.kind must not contain quotes");
        }

        let prefix = &self.feed.url_prefix;
        if !prefix.starts_with('/') {
            anyhow::bail!("feed.url_prefix must start with '/': '{}'", prefix);
        }
        if prefix.len() > 1 && prefix.ends_with('/') {
            anyhow::bail!("feed.url_prefix must not end with '/': '{}'", prefix);
        }
        if prefix.contains('"') {
            anyhow::bail!("feed.url_prefix must not contain quotes");
        }

        Ok(())
    }

    /// Builds the canonical URL of a leaf.
    pub fn leaf_url(&self, id: u64) -> String {
        if self.feed.url_prefix == "/" {
            format!("/{}/", id)
        } else {
            format!("{}/{}/", self.feed.url_prefix, id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_feed_stream() {
        let config = Config::default();
        assert_eq!(config.feed.kind, "feed");
        assert_eq!(config.leaf_url(12), "/feed/12/");
        assert_eq!(config.time.zone, TimeZoneMode::Local);
        assert!(!config.queue.follow_symlinks);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("feed.toml");
        std::fs::write(&path, "[time]\nzone = \"utc\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.time.zone, TimeZoneMode::Utc);
        assert_eq!(config.feed.url_prefix, "/feed");
    }

    #[test]
    fn custom_prefix_and_kind() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("feed.toml");
        std::fs::write(&path, "[feed]\nkind = \"notes\"\nurl_prefix = \"/n\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.feed.kind, "notes");
        assert_eq!(config.leaf_url(3), "/n/3/");
    }

    #[test]
    fn rejects_bad_prefix() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("feed.toml");
        std::fs::write(&path, "[feed]\nurl_prefix = \"feed/\"\n").unwrap();
        assert!(load_config(&path).is_err());

        std::fs::write(&path, "[feed]\nurl_prefix = \"/feed/\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn rejects_unknown_zone() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("feed.toml");
        std::fs::write(&path, "[time]\nzone = \"mars\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
