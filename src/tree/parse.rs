//! Parsing and validation of bookmark documents.

use std::collections::HashSet;

use serde_json::error::Category;
use thiserror::Error;

use super::model::{Node, RootName, Tree};
use super::walk::walk;

/// Error type for reading a bookmark document.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The bytes are not well-formed JSON.
    #[error("not a valid bookmark file: {0}")]
    Parse(#[source] serde_json::Error),

    /// The JSON is well-formed but does not have the expected shape.
    #[error("malformed bookmark tree: {0}")]
    Malformed(String),
}

impl TreeError {
    /// Whether the document was well-formed JSON with the wrong shape.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl From<serde_json::Error> for TreeError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::Malformed(err.to_string()),
            Category::Io | Category::Syntax | Category::Eof => Self::Parse(err),
        }
    }
}

/// Parse raw bytes into a [`Tree`].
///
/// A missing `roots.bookmark_bar`, or a node without `id` or `type`, is
/// reported as [`TreeError::Malformed`]. The bookmark bar must be a folder.
///
/// # Errors
///
/// Returns [`TreeError::Parse`] for invalid JSON and
/// [`TreeError::Malformed`] for valid JSON of the wrong shape.
pub fn parse_tree(bytes: &[u8]) -> Result<Tree, TreeError> {
    let tree: Tree = serde_json::from_slice(bytes)?;

    if !tree.roots.bookmark_bar.is_container() {
        return Err(TreeError::Malformed(
            "roots.bookmark_bar is not a folder".to_string(),
        ));
    }

    log::trace!(
        "Parsed bookmark tree (version {:?}, {} top-level entries in bookmark bar)",
        tree.version,
        tree.roots.bookmark_bar.children().len()
    );

    Ok(tree)
}

/// Check that every requested root exists, is a folder, and that node ids
/// are unique across the requested roots.
///
/// # Errors
///
/// Returns [`TreeError::Malformed`] describing the first problem found.
pub fn validate_roots(tree: &Tree, roots: &[RootName]) -> Result<(), TreeError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for &name in roots {
        let root = tree
            .root(name)
            .ok_or_else(|| TreeError::Malformed(format!("roots.{name} is missing")))?;

        if !root.is_container() {
            return Err(TreeError::Malformed(format!("roots.{name} is not a folder")));
        }

        for node in std::iter::once(root).chain(walk(root)) {
            check_unique(node, &mut seen)?;
        }
    }

    Ok(())
}

fn check_unique<'a>(node: &'a Node, seen: &mut HashSet<&'a str>) -> Result<(), TreeError> {
    if node.id.is_empty() {
        return Err(TreeError::Malformed("node with an empty id".to_string()));
    }
    if !seen.insert(node.id.as_str()) {
        return Err(TreeError::Malformed(format!(
            "node id {} appears more than once",
            node.id
        )));
    }
    Ok(())
}
