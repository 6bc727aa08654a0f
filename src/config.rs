//! Store configuration.

use std::env;
use std::path::{Path, PathBuf};

use crate::codec::Format;

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "books.json";

/// Environment variable overriding the data file path.
pub const DATA_FILE_ENV: &str = "BOOKSHELF_DATA_FILE";

/// Environment variable selecting single-line output (`1` or `true`).
pub const COMPACT_ENV: &str = "BOOKSHELF_COMPACT";

/// Where and how a [`BookStore`](crate::BookStore) persists its collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_file: PathBuf,
    pub format: Format,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}

impl StoreConfig {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            format: Format::default(),
        }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Build a config from `BOOKSHELF_DATA_FILE` and `BOOKSHELF_COMPACT`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = match lookup(DATA_FILE_ENV) {
            Some(path) if !path.trim().is_empty() => Self::new(path),
            _ => Self::default(),
        };
        if let Some(flag) = lookup(COMPACT_ENV) {
            if matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                config.format = Format::Compact;
            }
        }
        config
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}
