//! markdupe - duplicate remover for browser bookmark files
//!
//! Reads Chromium-style `Bookmarks` (and Opera-style `Notes`) JSON files,
//! finds entries with the same URL or note text inside each folder, and
//! writes a cleaned copy next to a backup of the original.

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod tree;

pub use app::run_app;
