//! JsonFileStorage - a single JSON file replaced atomically on every save.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Storage;
use crate::book::Book;
use crate::codec::{self, Format};
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Book collection stored in one JSON file.
///
/// Saves go to a temporary file in the same directory, are synced to disk,
/// and then renamed over the data file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    format: Format,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: Format::default(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            path: config.data_file.clone(),
            format: config.format,
        }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Vec<Book>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No data file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::persistence(&self.path, e)),
        };

        let books = codec::decode(&bytes).map_err(|e| StoreError::corrupt(&self.path, e))?;
        debug!(path = %self.path.display(), books = books.len(), "Loaded book collection");
        Ok(books)
    }

    fn save(&self, books: &[Book]) -> Result<(), StoreError> {
        let bytes =
            codec::encode(books, self.format).map_err(|e| StoreError::persistence(&self.path, e))?;

        let dir = self.parent_dir();
        fs::create_dir_all(dir).map_err(|e| {
            StoreError::persistence(&self.path, format!("failed to create data directory: {}", e))
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            StoreError::persistence(&self.path, format!("failed to create temp file: {}", e))
        })?;
        tmp.write_all(&bytes).map_err(|e| {
            StoreError::persistence(&self.path, format!("failed to write temp file: {}", e))
        })?;
        tmp.as_file().sync_all().map_err(|e| {
            StoreError::persistence(&self.path, format!("failed to sync temp file: {}", e))
        })?;
        tmp.persist(&self.path).map_err(|e| {
            StoreError::persistence(&self.path, format!("failed to replace data file: {}", e.error))
        })?;

        // The new snapshot is already visible; a failed directory sync only
        // weakens crash durability of the rename, so it must not roll back.
        if let Err(e) = sync_dir(dir) {
            warn!(path = %self.path.display(), error = %e, "Failed to sync data directory");
        }

        debug!(path = %self.path.display(), books = books.len(), "Saved book collection");
        Ok(())
    }
}

/// Flush the directory entry so a completed rename survives power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
