//! Application configuration management.
//!
//! Settings are layered with `figment`, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, or `config.toml` in the platform config directory)
//! 3. Environment variables prefixed with `MARKDUPE_` (`__` separates nested keys)
//! 4. Command-line flags, applied by [`Config::apply_cli`]
//!
//! # Example
//!
//! ```toml
//! paths = ["/home/me/.config/chromium/Default/Bookmarks"]
//! output_dir = "cleaned"
//! sort_by = "date_added"
//! roots = ["bookmark_bar", "other"]
//! pretty = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::actions::PersistConfig;
use crate::cli::{Commands, InputArgs};
use crate::duplicates::{EntryKind, FinderConfig, SortKey};
use crate::tree::RootName;

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "MARKDUPE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Files to process when none are given on the command line.
    pub paths: Vec<PathBuf>,
    /// Replace input files instead of writing into `output_dir`.
    pub write_in_place: bool,
    /// Destination directory for cleaned files and backups.
    pub output_dir: PathBuf,
    /// Field deciding which group member survives.
    pub sort_by: SortKey,
    /// Roots to deduplicate.
    pub roots: Vec<RootName>,
    /// Process `Bookmarks` in the default-file fallback.
    pub process_bookmarks: bool,
    /// Process `Notes` in the default-file fallback.
    pub process_notes: bool,
    /// Kind forced for explicitly given paths.
    pub kind: Option<EntryKind>,
    /// Write indented JSON.
    pub pretty: bool,
    /// Move stale output files to the trash instead of deleting them.
    pub use_trash: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            write_in_place: false,
            output_dir: PathBuf::from("."),
            sort_by: SortKey::Id,
            roots: vec![RootName::BookmarkBar],
            process_bookmarks: true,
            process_notes: false,
            kind: None,
            pretty: false,
            use_trash: false,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment variable holds an
    /// invalid value.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load the configuration, reading `path` instead of the default file
    /// when given. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment variable holds an
    /// invalid value.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::config_path(),
        };

        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = &file {
            log::debug!("Reading configuration from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
            .extract()
            .context("Failed to load configuration")
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "markdupe", "markdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line flags on top of the loaded settings.
    pub fn apply_cli(&mut self, command: &Commands) {
        self.apply_input(command.input());

        if let Commands::Clean(args) = command {
            if args.in_place {
                self.write_in_place = true;
            }
            if let Some(dir) = &args.output_dir {
                self.output_dir = dir.clone();
                self.write_in_place = false;
            }
            if args.pretty {
                self.pretty = true;
            }
            if args.trash {
                self.use_trash = true;
            }
        }
    }

    fn apply_input(&mut self, input: &InputArgs) {
        if let Some(kind) = input.kind {
            self.kind = Some(kind);
        }
        if let Some(sort_by) = input.sort_by {
            self.sort_by = sort_by;
        }
        if !input.roots.is_empty() {
            self.roots = input.roots.clone();
        }
    }

    /// Finder settings for one kind of entry.
    #[must_use]
    pub fn finder_config(&self, kind: EntryKind) -> FinderConfig {
        FinderConfig::default()
            .with_kind(kind)
            .with_sort_by(self.sort_by)
            .with_roots(self.roots.clone())
    }

    /// Persistence settings.
    #[must_use]
    pub fn persist_config(&self) -> PersistConfig {
        PersistConfig::default()
            .with_write_in_place(self.write_in_place)
            .with_output_dir(self.output_dir.clone())
            .with_pretty(self.pretty)
            .with_trash(self.use_trash)
    }

    /// Kinds processed when no paths were given.
    #[must_use]
    pub fn fallback_kinds(&self) -> Vec<EntryKind> {
        let mut kinds = Vec::new();
        if self.process_bookmarks {
            kinds.push(EntryKind::Bookmarks);
        }
        if self.process_notes {
            kinds.push(EntryKind::Notes);
        }
        kinds
    }
}
