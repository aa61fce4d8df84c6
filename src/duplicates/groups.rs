//! Duplicate grouping and removal-set aggregation.
//!
//! # Overview
//!
//! The finder produces, per folder, a flat list of entries that have at
//! least one duplicate partner in that folder. This module:
//!
//! 1. Partitions that list into groups of mutually equivalent entries
//!    ([`partition`])
//! 2. Orders each group by a sort key so the first member is the survivor
//! 3. Collects every non-survivor id into one [`RemovalSet`]
//!    ([`aggregate_removal_ids`])
//!
//! # Example
//!
//! ```
//! use markdupe::duplicates::{partition, Comparator, SortKey};
//! use markdupe::tree::Node;
//!
//! let a1 = Node::bookmark("9", "http://a.com");
//! let a2 = Node::bookmark("4", "https://a.com");
//!
//! let groups = partition(&[&a1, &a2], Comparator::Url, SortKey::Id);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0][0].id, "4"); // lowest id survives
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::compare::Comparator;
use crate::tree::Node;

/// Ids of entries to drop from the rewritten tree.
pub type RemovalSet = BTreeSet<String>;

/// Field used to order a duplicate group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Node id (lowest survives).
    #[default]
    #[value(name = "id")]
    Id,
    /// Creation timestamp (oldest survives).
    #[value(name = "date_added")]
    DateAdded,
}

impl SortKey {
    /// Raw value of the key on a node.
    #[must_use]
    pub fn raw<'a>(self, node: &'a Node) -> Option<&'a str> {
        match self {
            Self::Id => Some(node.id.as_str()),
            Self::DateAdded => node.date_added.as_deref(),
        }
    }

    /// Numeric value of the key, `None` when missing or not an integer.
    ///
    /// The whole trimmed value must be an integer: `"12abc"` has no numeric
    /// value and sorts last, unlike a leading-digits parse that reads it as 12.
    #[must_use]
    pub fn numeric(self, node: &Node) -> Option<i128> {
        self.raw(node).and_then(|raw| raw.trim().parse().ok())
    }

    /// Order two nodes by this key.
    ///
    /// Numeric keys sort ascending; nodes without a numeric key sort after
    /// every node that has one and compare equal among themselves.
    #[must_use]
    pub fn compare(self, a: &Node, b: &Node) -> Ordering {
        match (self.numeric(a), self.numeric(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id => write!(f, "id"),
            Self::DateAdded => write!(f, "date_added"),
        }
    }
}

/// Confirmed group of duplicate entries inside one folder.
///
/// Members are sorted; the first one is the survivor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    /// Id of the folder holding the entries.
    pub folder_id: String,
    /// Name of that folder.
    pub folder_name: Option<String>,
    /// Sorted members, survivor first.
    pub members: Vec<Node>,
}

impl DuplicateGroup {
    /// Create a group from already sorted members.
    #[must_use]
    pub fn new(folder: &Node, members: Vec<Node>) -> Self {
        Self {
            folder_id: folder.id.clone(),
            folder_name: folder.name.clone(),
            members,
        }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The member that is kept.
    #[must_use]
    pub fn survivor(&self) -> Option<&Node> {
        self.members.first()
    }

    /// Members that are removed by default.
    #[must_use]
    pub fn removable(&self) -> &[Node] {
        self.members.get(1..).unwrap_or_default()
    }

    /// Number of duplicate copies (total - 1 survivor).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.members.len().saturating_sub(1)
    }
}

/// Split a folder's duplicate entries into equivalence groups.
///
/// Entries are scanned in order. An entry that was already placed in a
/// group, or that matches a member of the most recently built group, is
/// skipped. Otherwise it seeds a new group together with every other entry
/// equivalent to it, and the group is sorted by `sort_by`.
///
/// Members only need to be equivalent to the seed, not to each other. With
/// the built-in comparators equivalence is transitive, so this never matters.
///
/// Groups with fewer than two members are dropped.
#[must_use]
pub fn partition<'a>(
    duplicates: &[&'a Node],
    comparator: Comparator,
    sort_by: SortKey,
) -> Vec<Vec<&'a Node>> {
    let mut groups: Vec<Vec<&'a Node>> = Vec::new();
    let mut grouped: HashSet<&str> = HashSet::new();

    for (i, &seed) in duplicates.iter().enumerate() {
        if grouped.contains(seed.id.as_str()) {
            continue;
        }
        if groups
            .last()
            .is_some_and(|last| last.iter().any(|member| comparator.equivalent(member, seed)))
        {
            continue;
        }

        let mut group = vec![seed];
        for (j, &other) in duplicates.iter().enumerate() {
            if i != j
                && comparator.equivalent(seed, other)
                && !group.iter().any(|member| member.id == other.id)
            {
                group.push(other);
            }
        }

        if group.len() < 2 {
            log::trace!("Entry {} has no partner in this folder", seed.id);
            continue;
        }

        group.sort_by(|a, b| sort_by.compare(a, b));
        grouped.extend(group.iter().map(|&member| member.id.as_str()));
        groups.push(group);
    }

    groups
}

/// Ids of every group member except the survivor.
///
/// An id that is the survivor of any group is never included, and ids
/// appearing in several groups are collapsed.
#[must_use]
pub fn aggregate_removal_ids(groups: &[DuplicateGroup]) -> RemovalSet {
    let survivors: HashSet<&str> = groups
        .iter()
        .filter_map(DuplicateGroup::survivor)
        .map(|node| node.id.as_str())
        .collect();

    groups
        .iter()
        .flat_map(DuplicateGroup::removable)
        .map(|node| node.id.as_str())
        .filter(|id| !survivors.contains(id))
        .map(str::to_string)
        .collect()
}
