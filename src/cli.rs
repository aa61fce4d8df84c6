//! Command-line interface definitions for markdupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, color) and
//! subcommands for different operations.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates in a bookmarks file
//! markdupe scan ~/.config/chromium/Default/Bookmarks
//!
//! # Report as JSON for scripting
//! markdupe scan Bookmarks --output json
//!
//! # Write a cleaned copy (and a backup) into ./cleaned
//! markdupe clean Bookmarks --output-dir cleaned
//!
//! # Clean every root, keeping the oldest entry of each group
//! markdupe clean Bookmarks --root bookmark_bar --root other --sort-by date_added
//!
//! # Verbose mode for debugging
//! markdupe -v clean Bookmarks --dry-run
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::{EntryKind, SortKey};
use crate::tree::RootName;

/// Remove duplicate bookmarks and notes from browser bookmark files.
///
/// markdupe finds entries with the same URL (or the same note text) inside
/// each folder, keeps one of them, and writes a cleaned copy of the file next
/// to a backup of the original.
#[derive(Debug, Parser)]
#[command(name = "markdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for markdupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report duplicate entries without writing anything
    Scan(ScanArgs),
    /// Remove duplicate entries and write cleaned files
    Clean(CleanArgs),
}

impl Commands {
    /// Input selection shared by every subcommand.
    #[must_use]
    pub fn input(&self) -> &InputArgs {
        match self {
            Self::Scan(args) => &args.input,
            Self::Clean(args) => &args.input,
        }
    }
}

/// Which files to read and how to compare their entries.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Bookmark or notes files to process
    ///
    /// When omitted, the paths from the configuration file are used, and
    /// failing that `Bookmarks` (and `Notes` if enabled) in the current directory.
    #[arg(value_name = "FILE")]
    pub paths: Vec<PathBuf>,

    /// Kind of entries in the given files
    #[arg(short, long, value_enum)]
    pub kind: Option<EntryKind>,

    /// Field deciding which member of a group is kept (lowest value wins)
    #[arg(long, value_enum, value_name = "KEY")]
    pub sort_by: Option<SortKey>,

    /// Root containers to deduplicate (can be specified multiple times)
    #[arg(long = "root", value_enum, value_name = "ROOT")]
    pub roots: Vec<RootName>,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format (text for humans, json/csv for scripting)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the clean subcommand.
#[derive(Debug, Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Replace the input file, keeping a backup next to it
    #[arg(long, conflicts_with = "output_dir")]
    pub in_place: bool,

    /// Directory for cleaned files and backups (default: current directory)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report what would be removed without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Ask which duplicates to remove, group by group
    #[arg(short, long)]
    pub interactive: bool,

    /// Write indented JSON
    #[arg(long)]
    pub pretty: bool,

    /// Move a previous cleaned file to the system trash instead of deleting it
    #[arg(long)]
    pub trash: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Coloured, human-readable text
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
