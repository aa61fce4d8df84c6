//! Duplicate finder for bookmark trees.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline for one tree:
//! 1. **Walk** - Enumerate every folder of each selected root
//! 2. **Find** - Inside each folder, collect the direct children that have a
//!    duplicate partner in the same folder ([`find_duplicates`])
//! 3. **Partition** - Split those children into sorted groups
//!    (see [`crate::duplicates::groups`])
//!
//! Folders are never compared with each other: an entry in a sub-folder is
//! only checked against its own siblings.
//!
//! # Example
//!
//! ```
//! use markdupe::duplicates::{DuplicateFinder, FinderConfig};
//! use markdupe::tree::parse_tree;
//!
//! let json = br#"{"checksum":"","version":1,"roots":{"bookmark_bar":{
//!     "id":"1","type":"folder","name":"Bar","children":[
//!         {"id":"2","type":"url","name":"A","url":"http://a.com"},
//!         {"id":"3","type":"url","name":"A","url":"https://a.com"}
//!     ]}}}"#;
//! let tree = parse_tree(json).unwrap();
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (groups, stats) = finder.find(&tree).unwrap();
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(stats.duplicate_entries, 1);
//! ```

use std::collections::HashSet;

use serde::Serialize;

use super::compare::{Comparator, EntryKind};
use super::groups::{partition, DuplicateGroup, SortKey};
use crate::tree::{folders, validate_roots, Node, RootName, Tree, TreeError};

/// Children of one folder that have at least one duplicate partner among
/// their siblings.
///
/// Every ordered pair of distinct children is tested. Folders and children
/// without a payload are skipped. When a pair matches, the second child of
/// the pair is recorded, once per id. The result is empty when the folder
/// has fewer than two children or no duplicates.
#[must_use]
pub fn find_duplicates(children: &[Node], comparator: Comparator) -> Vec<&Node> {
    let mut duplicates = Vec::new();
    if children.len() < 2 {
        return duplicates;
    }

    let keys: Vec<_> = children.iter().map(|child| comparator.key(child)).collect();
    let mut recorded: HashSet<&str> = HashSet::new();

    for (i, first) in children.iter().enumerate() {
        let Some(first_key) = &keys[i] else {
            continue;
        };
        for (j, second) in children.iter().enumerate() {
            if i == j || first.kind != second.kind {
                continue;
            }
            let Some(second_key) = &keys[j] else {
                continue;
            };
            if first_key == second_key && recorded.insert(second.id.as_str()) {
                duplicates.push(second);
            }
        }
    }

    duplicates
}

/// Configuration for the duplicate finder.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Kind of entries, which selects the comparator.
    pub kind: EntryKind,
    /// Key used to pick each group's survivor.
    pub sort_by: SortKey,
    /// Root containers to search.
    pub roots: Vec<RootName>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            kind: EntryKind::Bookmarks,
            sort_by: SortKey::Id,
            roots: vec![RootName::BookmarkBar],
        }
    }
}

impl FinderConfig {
    /// Set the kind of entries.
    #[must_use]
    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the sort key.
    #[must_use]
    pub fn with_sort_by(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Set the root containers to search.
    ///
    /// Repeated names are ignored; an empty list falls back to the bookmark bar.
    #[must_use]
    pub fn with_roots(mut self, roots: Vec<RootName>) -> Self {
        let mut unique = Vec::with_capacity(roots.len());
        for root in roots {
            if !unique.contains(&root) {
                unique.push(root);
            }
        }
        if unique.is_empty() {
            unique.push(RootName::BookmarkBar);
        }
        self.roots = unique;
        self
    }
}

/// Statistics from one run of the finder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FinderStats {
    /// Folders inspected (including the roots).
    pub folders_scanned: usize,
    /// Non-folder entries inspected.
    pub leaves_scanned: usize,
    /// Folders that contained at least one duplicate group.
    pub folders_with_duplicates: usize,
    /// Number of duplicate groups.
    pub duplicate_groups: usize,
    /// Entries that would be removed (group members minus survivors).
    pub duplicate_entries: usize,
}

impl FinderStats {
    /// Merge statistics from another run.
    pub fn merge(&mut self, other: &FinderStats) {
        self.folders_scanned += other.folders_scanned;
        self.leaves_scanned += other.leaves_scanned;
        self.folders_with_duplicates += other.folders_with_duplicates;
        self.duplicate_groups += other.duplicate_groups;
        self.duplicate_entries += other.duplicate_entries;
    }
}

/// Duplicate finder that runs the walk / find / partition pipeline over a
/// tree.
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new finder.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a finder for bookmarks in the bookmark bar, sorted by id.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// The finder's configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// The comparator used for this finder's entry kind.
    #[must_use]
    pub fn comparator(&self) -> Comparator {
        Comparator::for_kind(self.config.kind)
    }

    /// Find every duplicate group in the selected roots of `tree`.
    ///
    /// Groups are returned in folder pre-order, and within a folder in the
    /// order they were discovered.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Malformed`] if a selected root is missing or not
    /// a folder, or if node ids repeat.
    pub fn find(&self, tree: &Tree) -> Result<(Vec<DuplicateGroup>, FinderStats), TreeError> {
        validate_roots(tree, &self.config.roots)?;

        let comparator = self.comparator();
        let mut groups = Vec::new();
        let mut stats = FinderStats::default();

        for &name in &self.config.roots {
            let Some(root) = tree.root(name) else {
                continue;
            };
            log::debug!("Searching roots.{} for duplicate {}", name, self.config.kind);

            for folder in folders(root) {
                stats.folders_scanned += 1;
                stats.leaves_scanned += folder
                    .children()
                    .iter()
                    .filter(|child| !child.is_container())
                    .count();

                let found = self.find_in_folder(folder, comparator);
                if found.is_empty() {
                    continue;
                }

                stats.folders_with_duplicates += 1;
                for group in &found {
                    log::debug!(
                        "Folder \"{}\": {} copies of {}",
                        folder.display_name(),
                        group.len(),
                        group
                            .survivor()
                            .and_then(|node| comparator.payload(node))
                            .unwrap_or_default()
                    );
                }
                groups.extend(found);
            }
        }

        stats.duplicate_groups = groups.len();
        stats.duplicate_entries = groups.iter().map(DuplicateGroup::duplicate_count).sum();

        log::info!(
            "Scanned {} folders / {} entries: {} duplicate groups, {} removable entries",
            stats.folders_scanned,
            stats.leaves_scanned,
            stats.duplicate_groups,
            stats.duplicate_entries
        );

        Ok((groups, stats))
    }

    fn find_in_folder(&self, folder: &Node, comparator: Comparator) -> Vec<DuplicateGroup> {
        let duplicates = find_duplicates(folder.children(), comparator);
        if duplicates.is_empty() {
            return Vec::new();
        }

        partition(&duplicates, comparator, self.config.sort_by)
            .into_iter()
            .map(|members| {
                DuplicateGroup::new(folder, members.into_iter().cloned().collect())
            })
            .collect()
    }
}
