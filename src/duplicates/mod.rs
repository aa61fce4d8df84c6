//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Deciding whether two entries are duplicates (`compare`)
//! - Finding duplicate entries inside each folder (`finder`)
//! - Grouping duplicates and computing the removal set (`groups`)

pub mod compare;
pub mod finder;
pub mod groups;

pub use compare::{strip_scheme, Comparator, EntryKind};
pub use finder::{find_duplicates, DuplicateFinder, FinderConfig, FinderStats};
pub use groups::{aggregate_removal_ids, partition, DuplicateGroup, RemovalSet, SortKey};
