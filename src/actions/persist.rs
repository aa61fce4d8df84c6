//! Reading bookmark files and writing cleaned copies.
//!
//! # Overview
//!
//! A cleaned file is written next to a backup of the original:
//! 1. The destination directory is created if needed
//! 2. The input file is copied to the backup path
//! 3. A stale file at the clean path is removed (permanently, or to trash)
//! 4. The serialized tree is written to the clean path
//!
//! # File names
//!
//! When input paths were given explicitly and files are not written in
//! place, both output names are derived from the sanitized input path
//! (`{sanitized}_clean`, `{sanitized}_original`) so that several inputs can
//! share one output directory. Otherwise the browser's own file name is
//! used (`Bookmarks`, `Bookmarks_original`).
//!
//! # Example
//!
//! ```
//! use markdupe::actions::persist::{OutputPaths, PersistConfig};
//! use markdupe::duplicates::EntryKind;
//! use std::path::Path;
//!
//! let config = PersistConfig::default();
//! let paths = OutputPaths::derive(Path::new("my profile/Bookmarks"), true, EntryKind::Bookmarks, &config);
//!
//! assert_eq!(paths.clean_name, "my_profile___Bookmarks_clean");
//! assert_eq!(paths.backup_name, "my_profile___Bookmarks_original");
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::duplicates::EntryKind;
use crate::tree::Tree;

/// Replacement for characters that cannot appear in a file name.
pub const SANITIZE_REPLACEMENT: &str = "___";

/// Longest file name, in bytes, produced by [`sanitize_file_name`].
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The input file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backup copy of the input failed.
    #[error("cannot copy {from} to {to}: {source}")]
    Backup {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backup path is the input file itself.
    #[error("backup path {0} is the input file")]
    BackupOverwritesInput(PathBuf),

    /// A stale output file could not be removed.
    #[error("cannot remove stale output {path}: {message}")]
    RemoveStale { path: PathBuf, message: String },

    /// The tree could not be serialized.
    #[error("cannot serialize bookmarks: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The cleaned file could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PersistError {
    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. }
            | Self::CreateDir { path, .. }
            | Self::RemoveStale { path, .. }
            | Self::Write { path, .. } => Some(path),
            Self::Backup { to, .. } => Some(to),
            Self::BackupOverwritesInput(path) => Some(path),
            Self::Serialize(_) => None,
        }
    }
}

/// Configuration for writing results.
#[derive(Debug, Clone)]
pub struct PersistConfig {
    /// Write next to the input instead of into `output_dir`.
    pub write_in_place: bool,
    /// Destination directory when not writing in place.
    pub output_dir: PathBuf,
    /// Indent the written JSON.
    pub pretty: bool,
    /// Move stale output to the system trash instead of deleting it.
    pub use_trash: bool,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            write_in_place: false,
            output_dir: PathBuf::from("."),
            pretty: false,
            use_trash: false,
        }
    }
}

impl PersistConfig {
    /// Enable/disable writing next to the input.
    #[must_use]
    pub fn with_write_in_place(mut self, in_place: bool) -> Self {
        self.write_in_place = in_place;
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Enable/disable indented output.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Enable/disable moving stale output to trash.
    #[must_use]
    pub fn with_trash(mut self, use_trash: bool) -> Self {
        self.use_trash = use_trash;
        self
    }
}

/// Where the cleaned file and the backup go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Directory holding both files.
    pub destination_dir: PathBuf,
    /// File name of the cleaned file.
    pub clean_name: String,
    /// File name of the backup.
    pub backup_name: String,
    /// Full path of the cleaned file.
    pub clean: PathBuf,
    /// Full path of the backup.
    pub backup: PathBuf,
}

impl OutputPaths {
    /// Derive output paths for an input file.
    ///
    /// `explicit` is true when the input came from the command line or the
    /// configured path list, false for the default-file fallback.
    #[must_use]
    pub fn derive(input: &Path, explicit: bool, kind: EntryKind, config: &PersistConfig) -> Self {
        let destination_dir = if config.write_in_place {
            match input.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }
        } else {
            config.output_dir.clone()
        };

        let (clean_name, backup_name) = if explicit && !config.write_in_place {
            let sanitized = sanitize_file_name(&input.to_string_lossy());
            (format!("{sanitized}_clean"), format!("{sanitized}_original"))
        } else {
            let default = kind.default_file_name();
            (default.to_string(), format!("{default}_original"))
        };

        Self {
            clean: destination_dir.join(&clean_name),
            backup: destination_dir.join(&backup_name),
            destination_dir,
            clean_name,
            backup_name,
        }
    }
}

fn illegal_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"[/\?<>\\:\*\|"\x00-\x1f\x{80}-\x{9f}]"#).expect("illegal character pattern is valid")
    })
}

fn windows_reserved() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(con|prn|aux|nul|com[0-9]|lpt[0-9])(\..*)?$")
            .expect("reserved name pattern is valid")
    })
}

fn trailing_dots() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\. ]+$").expect("trailing pattern is valid"))
}

fn whitespace() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Turn an arbitrary path string into a single portable file name.
///
/// Path separators and other characters that are illegal in file names are
/// replaced by `___`, as are reserved names (`.`, `..`, `CON`, `LPT1`, ...)
/// and trailing dots or spaces. The result is cut to 255 bytes and every
/// whitespace run becomes `_`.
///
/// # Example
///
/// ```
/// use markdupe::actions::persist::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("/home/me/Bookmarks"), "___home___me___Bookmarks");
/// assert_eq!(sanitize_file_name("C:\\My Files\\Bookmarks"), "C______My_Files___Bookmarks");
/// ```
#[must_use]
pub fn sanitize_file_name(input: &str) -> String {
    let mut name = illegal_chars()
        .replace_all(input, SANITIZE_REPLACEMENT)
        .into_owned();

    if !name.is_empty() && name.chars().all(|c| c == '.') {
        name = SANITIZE_REPLACEMENT.to_string();
    }
    if windows_reserved().is_match(&name) {
        name = SANITIZE_REPLACEMENT.to_string();
    }
    name = trailing_dots()
        .replace(&name, SANITIZE_REPLACEMENT)
        .into_owned();

    if name.len() > MAX_FILE_NAME_BYTES {
        let mut cut = MAX_FILE_NAME_BYTES;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        name.truncate(cut);
    }

    whitespace().replace_all(&name, "_").into_owned()
}

/// Read an input file.
///
/// # Errors
///
/// Returns [`PersistError::Read`] if the file cannot be read.
pub fn read_source(path: &Path) -> Result<Vec<u8>, PersistError> {
    fs::read(path).map_err(|source| PersistError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a tree the way it will be written to disk.
///
/// # Errors
///
/// Returns [`PersistError::Serialize`] if serialization fails.
pub fn serialize_tree(tree: &Tree, pretty: bool) -> Result<String, PersistError> {
    let json = if pretty {
        serde_json::to_string_pretty(tree)?
    } else {
        serde_json::to_string(tree)?
    };
    Ok(json)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn remove_stale(path: &Path, use_trash: bool) -> Result<(), PersistError> {
    if use_trash {
        trash::delete(path).map_err(|e| PersistError::RemoveStale {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::debug!("Moved stale output to trash: {}", path.display());
    } else {
        fs::remove_file(path).map_err(|e| PersistError::RemoveStale {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::debug!("Removed stale output: {}", path.display());
    }
    Ok(())
}

/// Write a cleaned tree and a backup of its source file.
///
/// # Errors
///
/// Returns the first [`PersistError`] encountered. The backup is written
/// before anything at the clean path is touched.
pub fn persist(
    source: &Path,
    paths: &OutputPaths,
    tree: &Tree,
    config: &PersistConfig,
) -> Result<(), PersistError> {
    let json = serialize_tree(tree, config.pretty)?;

    if !paths.destination_dir.as_os_str().is_empty() && !paths.destination_dir.exists() {
        fs::create_dir_all(&paths.destination_dir).map_err(|source| PersistError::CreateDir {
            path: paths.destination_dir.clone(),
            source,
        })?;
    }

    if same_file(source, &paths.backup) {
        return Err(PersistError::BackupOverwritesInput(paths.backup.clone()));
    }

    fs::copy(source, &paths.backup).map_err(|e| PersistError::Backup {
        from: source.to_path_buf(),
        to: paths.backup.clone(),
        source: e,
    })?;
    log::debug!("Copied {} to {}", source.display(), paths.backup.display());

    if paths.clean.exists() {
        remove_stale(&paths.clean, config.use_trash)?;
    }

    fs::write(&paths.clean, json).map_err(|source| PersistError::Write {
        path: paths.clean.clone(),
        source,
    })?;

    Ok(())
}
