//! Serializable model of a bookmark document.
//!
//! The shape follows the JSON written by Chromium-family browsers:
//! a top-level document with a checksum, a version and a fixed set of
//! root containers, each of which is a folder node with nested children.
//!
//! Fields the deduplicator does not interpret (`date_modified`, `meta_info`,
//! `guid`, `sync_transaction_version`, ...) are kept in `extra` maps so that
//! a parse/serialize cycle writes them back unchanged.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root document of a bookmark file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    /// Checksum written by the browser. Passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    /// The named root containers.
    pub roots: Roots,
    /// File format version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Any other top-level keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tree {
    /// Get a root container by name.
    #[must_use]
    pub fn root(&self, name: RootName) -> Option<&Node> {
        self.roots.get(name)
    }

    /// Get a mutable root container by name.
    pub fn root_mut(&mut self, name: RootName) -> Option<&mut Node> {
        self.roots.get_mut(name)
    }
}

/// The named root containers of a bookmark file.
///
/// `bookmark_bar` is always present. The remaining roots are optional
/// because not every browser writes all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roots {
    /// The bookmark bar.
    pub bookmark_bar: Node,
    /// "Other bookmarks".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<Node>,
    /// Mobile / synced bookmarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced: Option<Node>,
    /// Deleted bookmarks (Opera).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trash: Option<Node>,
    /// Remaining keys such as `sync_transaction_version`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Roots {
    /// Get a root container by name.
    #[must_use]
    pub fn get(&self, name: RootName) -> Option<&Node> {
        match name {
            RootName::BookmarkBar => Some(&self.bookmark_bar),
            RootName::Other => self.other.as_ref(),
            RootName::Synced => self.synced.as_ref(),
            RootName::Trash => self.trash.as_ref(),
        }
    }

    /// Get a mutable root container by name.
    pub fn get_mut(&mut self, name: RootName) -> Option<&mut Node> {
        match name {
            RootName::BookmarkBar => Some(&mut self.bookmark_bar),
            RootName::Other => self.other.as_mut(),
            RootName::Synced => self.synced.as_mut(),
            RootName::Trash => self.trash.as_mut(),
        }
    }
}

/// Name of a root container.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RootName {
    /// `roots.bookmark_bar`
    #[value(name = "bookmark_bar")]
    BookmarkBar,
    /// `roots.other`
    #[value(name = "other")]
    Other,
    /// `roots.synced`
    #[value(name = "synced")]
    Synced,
    /// `roots.trash`
    #[value(name = "trash")]
    Trash,
}

impl RootName {
    /// Key of this root in the `roots` object.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BookmarkBar => "bookmark_bar",
            Self::Other => "other",
            Self::Synced => "synced",
            Self::Trash => "trash",
        }
    }
}

impl std::fmt::Display for RootName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type tag of a node.
///
/// Unknown tags are preserved verbatim in [`NodeKind::Other`] and treated as
/// opaque leaves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// A container with children.
    Folder,
    /// A bookmark.
    Url,
    /// A note.
    Note,
    /// Any other tag.
    Other(String),
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "folder" => Self::Folder,
            "url" => Self::Url,
            "note" => Self::Note,
            _ => Self::Other(tag),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Folder => "folder".to_string(),
            NodeKind::Url => "url".to_string(),
            NodeKind::Note => "note".to_string(),
            NodeKind::Other(tag) => tag,
        }
    }
}

/// A folder, bookmark or note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable unique identifier. All identity checks use this field.
    pub id: String,
    /// Type tag.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creation time as a WebKit timestamp (microseconds since 1601-01-01).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
    /// Target of a bookmark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Text of a note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Children of a folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    /// Opaque metadata.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Create a node with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: None,
            date_added: None,
            url: None,
            content: None,
            children: None,
            extra: Map::new(),
        }
    }

    /// Create an empty folder.
    #[must_use]
    pub fn folder(id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut node = Self::new(id, NodeKind::Folder);
        node.name = Some(name.into());
        node.children = Some(Vec::new());
        node
    }

    /// Create a bookmark.
    #[must_use]
    pub fn bookmark(id: impl Into<String>, url: impl Into<String>) -> Self {
        let mut node = Self::new(id, NodeKind::Url);
        node.url = Some(url.into());
        node
    }

    /// Create a note.
    #[must_use]
    pub fn note(id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut node = Self::new(id, NodeKind::Note);
        node.content = Some(content.into());
        node
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the creation timestamp.
    #[must_use]
    pub fn with_date_added(mut self, date_added: impl Into<String>) -> Self {
        self.date_added = Some(date_added.into());
        self
    }

    /// Append a child, turning the node's children into `Some` if needed.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Whether this node is a folder.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Direct children, empty when absent.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Name for display, falling back to the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}
