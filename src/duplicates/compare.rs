//! Equivalence test between two leaves.
//!
//! Bookmarks are compared by URL after removing every case-insensitive
//! occurrence of `http`/`https`. Only the literal letters are removed, not a
//! `scheme://` prefix, so `http://a.com` and `https://a.com` both become
//! `://a.com`. The same substitution also applies to `http` appearing in a
//! path or query string; that looseness is kept for compatibility with
//! files cleaned by earlier releases.
//!
//! Notes are compared by their `content` field, exactly.

use std::borrow::Cow;
use std::sync::OnceLock;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tree::Node;

/// Kind of entries a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A `Bookmarks` file; entries are compared by URL.
    Bookmarks,
    /// A `Notes` file; entries are compared by text content.
    Notes,
}

impl EntryKind {
    /// File name browsers use for this kind of file.
    #[must_use]
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Bookmarks => "Bookmarks",
            Self::Notes => "Notes",
        }
    }

    /// Human-readable plural used in log messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Bookmarks => "bookmarks",
            Self::Notes => "notes",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn scheme_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)https?").expect("scheme pattern is valid"))
}

/// Remove every case-insensitive `http`/`https` occurrence from a URL.
///
/// # Example
///
/// ```
/// use markdupe::duplicates::strip_scheme;
///
/// assert_eq!(strip_scheme("HTTPS://a.com"), "://a.com");
/// assert_eq!(strip_scheme("http://a.com"), "://a.com");
/// ```
#[must_use]
pub fn strip_scheme(url: &str) -> Cow<'_, str> {
    scheme_pattern().replace_all(url, "")
}

/// Decides whether two leaves are duplicates of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Compare normalized `url` fields.
    Url,
    /// Compare `content` fields exactly.
    Content,
}

impl Comparator {
    /// Comparator for a kind of file.
    #[must_use]
    pub fn for_kind(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Bookmarks => Self::Url,
            EntryKind::Notes => Self::Content,
        }
    }

    /// The raw field this comparator looks at.
    ///
    /// Folders and entries with a missing or empty field have no payload.
    #[must_use]
    pub fn payload<'a>(&self, node: &'a Node) -> Option<&'a str> {
        if node.is_container() {
            return None;
        }
        let field = match self {
            Self::Url => node.url.as_deref(),
            Self::Content => node.content.as_deref(),
        };
        field.filter(|value| !value.is_empty())
    }

    /// The normalized comparison key of a node, if it has a payload.
    #[must_use]
    pub fn key<'a>(&self, node: &'a Node) -> Option<Cow<'a, str>> {
        let payload = self.payload(node)?;
        Some(match self {
            Self::Url => strip_scheme(payload),
            Self::Content => Cow::Borrowed(payload),
        })
    }

    /// Whether two nodes are duplicates.
    ///
    /// Always false for folders, for entries without a payload and for
    /// entries of different kinds.
    #[must_use]
    pub fn equivalent(&self, a: &Node, b: &Node) -> bool {
        if a.kind != b.kind {
            return false;
        }
        match (self.key(a), self.key(b)) {
            (Some(ka), Some(kb)) => ka == kb,
            _ => false,
        }
    }
}
