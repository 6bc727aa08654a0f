//! InMemoryStorage - encoded snapshot held in memory for testing and ephemeral stores.

use std::sync::{Arc, RwLock};

use super::Storage;
use crate::book::Book;
use crate::codec::{self, Format};
use crate::error::StoreError;

const LOCATION: &str = "<memory>";

/// In-memory storage holding the last saved document.
///
/// Snapshots go through the JSON codec so loads get the same structural
/// checks as a file. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    document: Arc<RwLock<Option<Vec<u8>>>>,
}

impl InMemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that already holds `bytes`, as if read from a file.
    pub fn with_document(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            document: Arc::new(RwLock::new(Some(bytes.into()))),
        }
    }

    /// The last saved document, if any.
    pub fn document(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let document = self
            .document
            .read()
            .map_err(|_| StoreError::LockPoisoned("storage read"))?;
        Ok(document.clone())
    }
}

impl Storage for InMemoryStorage {
    fn load(&self) -> Result<Vec<Book>, StoreError> {
        let document = self
            .document
            .read()
            .map_err(|_| StoreError::LockPoisoned("storage read"))?;

        match document.as_deref() {
            Some(bytes) => codec::decode(bytes).map_err(|e| StoreError::corrupt(LOCATION, e)),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, books: &[Book]) -> Result<(), StoreError> {
        let bytes = codec::encode(books, Format::Compact)
            .map_err(|e| StoreError::persistence(LOCATION, e))?;

        let mut document = self
            .document
            .write()
            .map_err(|_| StoreError::LockPoisoned("storage write"))?;
        *document = Some(bytes);
        Ok(())
    }
}
