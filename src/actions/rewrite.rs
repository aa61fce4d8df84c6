//! Produce a cleaned copy of a bookmark tree.
//!
//! # Overview
//!
//! [`rewrite`] never touches its input. It returns a new [`Tree`] in which
//! every folder of the selected roots has its children filtered against a
//! removal set, plus the list of entries that were dropped. Folders and
//! everything outside the selected roots are carried over unchanged.
//!
//! # Example
//!
//! ```
//! use markdupe::actions::rewrite::rewrite;
//! use markdupe::duplicates::RemovalSet;
//! use markdupe::tree::{parse_tree, RootName};
//!
//! let json = br#"{"checksum":"","version":1,"roots":{"bookmark_bar":{
//!     "id":"1","type":"folder","name":"Bar","children":[
//!         {"id":"2","type":"url","url":"http://a.com"},
//!         {"id":"3","type":"url","url":"https://a.com"}
//!     ]}}}"#;
//! let tree = parse_tree(json).unwrap();
//!
//! let remove: RemovalSet = ["3".to_string()].into_iter().collect();
//! let outcome = rewrite(&tree, &remove, &[RootName::BookmarkBar]);
//!
//! assert_eq!(outcome.tree.roots.bookmark_bar.children().len(), 1);
//! assert_eq!(outcome.removed[0].id, "3");
//! assert_eq!(tree.roots.bookmark_bar.children().len(), 2); // input untouched
//! ```

use std::collections::HashSet;

use crate::duplicates::RemovalSet;
use crate::tree::{Node, RootName, Tree};

/// Result of a rewrite.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// The cleaned tree.
    pub tree: Tree,
    /// Entries dropped from the tree, folder by folder in pre-order.
    pub removed: Vec<Node>,
    /// Ids in the removal set that were not found in any selected root.
    pub unmatched: Vec<String>,
}

impl RewriteOutcome {
    /// Number of entries dropped.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Build a copy of `tree` without the entries listed in `remove`.
///
/// Only non-folder entries inside the selected `roots` are dropped; the
/// relative order of the remaining children is preserved. Ids that do not
/// match any entry are reported in [`RewriteOutcome::unmatched`] and
/// otherwise ignored.
#[must_use]
pub fn rewrite(tree: &Tree, remove: &RemovalSet, roots: &[RootName]) -> RewriteOutcome {
    let mut cleaned = tree.clone();
    let mut removed = Vec::new();

    if !remove.is_empty() {
        let mut processed: Vec<RootName> = Vec::with_capacity(roots.len());
        for &name in roots {
            if processed.contains(&name) {
                continue;
            }
            processed.push(name);
            if let Some(root) = cleaned.root_mut(name) {
                prune(root, remove, &mut removed);
            }
        }
    }

    let found: HashSet<&str> = removed.iter().map(|node| node.id.as_str()).collect();
    let unmatched: Vec<String> = remove
        .iter()
        .filter(|id| !found.contains(id.as_str()))
        .cloned()
        .collect();

    if !unmatched.is_empty() {
        log::warn!(
            "{} id(s) slated for removal were not found: {}",
            unmatched.len(),
            unmatched.join(", ")
        );
    }

    RewriteOutcome {
        tree: cleaned,
        removed,
        unmatched,
    }
}

fn prune(folder: &mut Node, remove: &RemovalSet, removed: &mut Vec<Node>) {
    let Some(children) = folder.children.as_mut() else {
        return;
    };

    let before = children.len();
    let (kept, dropped): (Vec<Node>, Vec<Node>) = std::mem::take(children)
        .into_iter()
        .partition(|child| child.is_container() || !remove.contains(&child.id));
    *children = kept;

    if !dropped.is_empty() {
        log::debug!(
            "Folder \"{}\": {} -> {} entries",
            folder.display_name(),
            before,
            before - dropped.len()
        );
        removed.extend(dropped);
    }

    for child in folder.children.iter_mut().flatten() {
        prune(child, remove, removed);
    }
}
