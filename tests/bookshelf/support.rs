use std::path::PathBuf;

use bookshelf::{BookStore, JsonFileStorage, StoreConfig};
use tempfile::TempDir;

/// A store over `books.json` in a fresh temporary directory.
pub struct TempStore {
    pub dir: TempDir,
    pub store: BookStore<JsonFileStorage>,
}

impl TempStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = BookStore::open(StoreConfig::new(dir.path().join("books.json"))).unwrap();
        Self { dir, store }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("books.json")
    }

    /// Open a second, independent store over the same file.
    pub fn reopen(&self) -> BookStore<JsonFileStorage> {
        BookStore::open(StoreConfig::new(self.path())).unwrap()
    }
}
