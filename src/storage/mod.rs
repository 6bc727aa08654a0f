//! Storage - durable load/save of the whole book collection.
//!
//! A [`Storage`] always reads and writes the complete collection. Writes must
//! be atomic: after `save` returns (successfully or not) a reader sees either
//! the previous snapshot or the new one, never a mix.
//!
//! ## Example
//!
//! ```ignore
//! use bookshelf::{BookStore, InMemoryStorage, NewBook};
//!
//! let store = BookStore::with_storage(InMemoryStorage::new())?;
//! let dune = store.create(NewBook::new("Dune", "Herbert", true))?;
//! assert_eq!(dune.id, 1);
//! ```

mod file;
mod in_memory;

use crate::book::Book;
use crate::error::StoreError;

/// Durable storage for a book collection.
pub trait Storage: Send + Sync {
    /// Load the collection. Missing storage is an empty collection;
    /// unparseable storage is [`StoreError::CorruptState`].
    fn load(&self) -> Result<Vec<Book>, StoreError>;

    /// Replace the stored collection with `books`.
    fn save(&self, books: &[Book]) -> Result<(), StoreError>;
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn load(&self) -> Result<Vec<Book>, StoreError> {
        (**self).load()
    }

    fn save(&self, books: &[Book]) -> Result<(), StoreError> {
        (**self).save(books)
    }
}

pub use file::JsonFileStorage;
pub use in_memory::InMemoryStorage;
