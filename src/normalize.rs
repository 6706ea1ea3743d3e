//! Queue-file text normalization and tag extraction.
//!
//! Non-empty lines of a queue file are joined, inline `#word` markers are
//! lifted out into the tag list, and all whitespace (line breaks included)
//! collapses to single spaces. Words from the file name are added as extra
//! tags. Whatever paragraph breaks survive the collapse are rebuilt with
//! [`PARAGRAPH_SEPARATOR`], so a body never holds a blank run.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Separator between paragraphs of a normalized body.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Filename tokens must be strictly longer than this.
const MIN_FILENAME_TAG_LEN: usize = 2;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w+)").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalization failure. The scanner skips the file and keeps going.
#[derive(Debug, PartialEq, Eq)]
pub enum NormalizeError {
    /// Nothing but whitespace was left after trimming.
    EmptyContent,
}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeError::EmptyContent => write!(f, "empty file"),
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Cleaned body plus tags, marker tags first (sorted) then filename tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub body: String,
    pub tags: Vec<String>,
}

/// Normalizes the raw bytes of one queue file.
///
/// `base_name` is the file name without its extension; it contributes tags
/// but never body text.
pub fn normalize(raw: &[u8], base_name: &str) -> Result<Normalized, NormalizeError> {
    let text = String::from_utf8_lossy(raw);

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(NormalizeError::EmptyContent);
    }

    let joined = lines.join(PARAGRAPH_SEPARATOR);

    let marker_tags: BTreeSet<String> = TAG_RE
        .captures_iter(&joined)
        .map(|cap| cap[1].to_lowercase())
        .collect();

    let stripped = TAG_RE.replace_all(&joined, "");
    // Line breaks collapse too; the split below only keeps breaks that survive.
    let flattened = WHITESPACE_RE.replace_all(&stripped, " ");
    let body = flattened
        .trim()
        .split(PARAGRAPH_SEPARATOR)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR);

    let mut tags: Vec<String> = marker_tags.iter().cloned().collect();
    for word in filename_tags(base_name) {
        if !marker_tags.contains(&word) && !tags.contains(&word) {
            tags.push(word);
        }
    }

    Ok(Normalized { body, tags })
}

/// Words of a file name that look like tags: split on runs of `-`/`_`,
/// lower-cased, longer than two characters, ASCII letters only.
pub fn filename_tags(base_name: &str) -> Vec<String> {
    base_name
        .split(['-', '_'])
        .map(|word| word.trim().to_lowercase())
        .filter(|word| {
            word.len() > MIN_FILENAME_TAG_LEN && word.bytes().all(|b| b.is_ascii_lowercase())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_markers_become_tags() {
        let n = normalize(b"hello #Foo world #foo #Bar", "").unwrap();
        assert_eq!(n.tags, vec!["bar", "foo"]);
        assert_eq!(n.body, "hello world");
    }

    #[test]
    fn filename_words_become_tags() {
        let n = normalize(b"Just some text.", "my-great-post").unwrap();
        assert_eq!(n.tags, vec!["great", "post"]);
        assert_eq!(n.body, "Just some text.");
    }

    #[test]
    fn filename_tags_follow_marker_tags_without_duplicates() {
        let n = normalize(b"a note #zeta #rust", "rust_and__apple-apple").unwrap();
        assert_eq!(n.tags, vec!["rust", "zeta", "and", "apple"]);
    }

    #[test]
    fn filename_tokens_filtered() {
        assert_eq!(filename_tags("Draft-v2-Notes_ok"), vec!["draft", "notes"]);
        assert!(filename_tags("").is_empty());
        assert!(filename_tags("2024-01-02").is_empty());
        assert!(filename_tags("café-menu").contains(&"menu".to_string()));
        assert!(!filename_tags("café-menu").contains(&"café".to_string()));
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert_eq!(
            normalize(b"   \n\n\t \r\n  ", "anything"),
            Err(NormalizeError::EmptyContent)
        );
        assert_eq!(normalize(b"", "x"), Err(NormalizeError::EmptyContent));
    }

    #[test]
    fn lines_flatten_into_one_paragraph() {
        let n = normalize(b"  first line  \n\n\n second   line\r\nthird\n", "").unwrap();
        assert_eq!(n.body, "first line second line third");
    }

    #[test]
    fn multi_line_note_with_marker_flattens() {
        let n = normalize(b"Hello #Rust world\nSecond line", "").unwrap();
        assert_eq!(n.body, "Hello world Second line");
        assert_eq!(n.tags, vec!["rust"]);
    }

    #[test]
    fn marker_only_line_leaves_single_space() {
        let n = normalize(b"first\n#tagged #only\nsecond", "").unwrap();
        assert_eq!(n.body, "first second");
        assert_eq!(n.tags, vec!["only", "tagged"]);
    }

    #[test]
    fn marker_only_file_keeps_tags_with_empty_body() {
        let n = normalize(b"#solo", "").unwrap();
        assert_eq!(n.body, "");
        assert_eq!(n.tags, vec!["solo"]);
    }

    #[test]
    fn bare_hash_is_not_a_marker() {
        let n = normalize(b"C# and # alone", "").unwrap();
        assert_eq!(n.body, "C# and # alone");
        assert!(n.tags.is_empty());
    }

    #[test]
    fn underscores_and_digits_are_word_chars() {
        let n = normalize(b"see #rust_2024 today", "").unwrap();
        assert_eq!(n.tags, vec!["rust_2024"]);
        assert_eq!(n.body, "see today");
    }

    #[test]
    fn output_has_no_markers_or_blank_runs() {
        let inputs: [&[u8]; 4] = [
            b"#a\n\n#b\nx #c y\n#d",
            b"one\n #two \nthree #four\n\n\n#five",
            b"#x#y#z text",
            b"\tleading\n\n\ntrailing #t\n",
        ];
        for raw in inputs {
            let n = normalize(raw, "").unwrap();
            assert!(!TAG_RE.is_match(&n.body), "marker left in {:?}", n.body);
            assert!(!n.body.contains("\n\n\n"), "blank run in {:?}", n.body);
            assert!(!n.body.starts_with('\n') && !n.body.ends_with('\n'));
            for paragraph in n.body.split(PARAGRAPH_SEPARATOR) {
                if !n.body.is_empty() {
                    assert!(!paragraph.trim().is_empty());
                }
            }
        }
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let n = normalize(b"caf\xe9 #menu", "").unwrap();
        assert_eq!(n.tags, vec!["menu"]);
        assert!(n.body.starts_with("caf"));
    }
}
