//! Bookmark tree model.
//!
//! This module provides:
//! - The in-memory document model for Chromium-style `Bookmarks` / `Notes` files
//! - Parsing raw bytes into that model, with malformed-input detection
//! - Depth-first traversal used to enumerate folders
//!
//! # Example
//!
//! ```
//! use markdupe::tree::{parse_tree, folders};
//!
//! let json = br#"{
//!     "checksum": "abc",
//!     "version": 1,
//!     "roots": {
//!         "bookmark_bar": {
//!             "id": "1", "type": "folder", "name": "Bar",
//!             "children": [
//!                 { "id": "2", "type": "folder", "name": "Dev", "children": [] }
//!             ]
//!         }
//!     }
//! }"#;
//!
//! let tree = parse_tree(json).unwrap();
//! assert_eq!(folders(&tree.roots.bookmark_bar).len(), 2);
//! ```

pub mod model;
pub mod parse;
pub mod walk;

pub use model::{Node, NodeKind, RootName, Roots, Tree};
pub use parse::{parse_tree, validate_roots, TreeError};
pub use walk::{folders, leaf_ids, walk};
