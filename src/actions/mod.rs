//! Actions on discovered duplicates.
//!
//! This module provides functionality for:
//! - Choosing which duplicates to remove (`select`)
//! - Building a cleaned copy of the tree (`rewrite`)
//! - Writing the cleaned file and a backup (`persist`)
//!
//! ```no_run
//! use markdupe::actions::persist::{persist, OutputPaths, PersistConfig};
//! use markdupe::duplicates::EntryKind;
//! use markdupe::tree::parse_tree;
//! use std::path::Path;
//!
//! let source = Path::new("Bookmarks");
//! let tree = parse_tree(&std::fs::read(source).unwrap()).unwrap();
//! let config = PersistConfig::default().with_output_dir("cleaned");
//! let paths = OutputPaths::derive(source, true, EntryKind::Bookmarks, &config);
//! persist(source, &paths, &tree, &config).unwrap();
//! ```

pub mod persist;
pub mod rewrite;
pub mod select;

pub use persist::{persist, read_source, sanitize_file_name, OutputPaths, PersistConfig, PersistError};
pub use rewrite::{rewrite, RewriteOutcome};
pub use select::{AutoSelect, PromptSelect, SelectionPolicy};
