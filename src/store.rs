//! BookStore - the owned, thread-safe book collection.

use std::sync::{Mutex, RwLock};

use tracing::{info, warn};

use crate::book::{Book, BookPatch, NewBook};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::query;
use crate::storage::{JsonFileStorage, Storage};

#[derive(Clone)]
struct State {
    books: Vec<Book>,
    next_id: u64,
}

impl State {
    fn seeded(books: Vec<Book>) -> Result<Self, StoreError> {
        let next_id = books
            .iter()
            .map(|b| b.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted)?;
        Ok(State { books, next_id })
    }

    fn position(&self, id: u64) -> Result<usize, StoreError> {
        self.books
            .iter()
            .position(|b| b.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

/// The book collection and its durable copy.
///
/// Mutations are serialized by a write gate and applied to a working copy;
/// the copy replaces the live collection only after `Storage::save`
/// succeeds. Readers clone the live collection under a shared lock and never
/// wait on storage I/O.
///
/// Ids come from a counter seeded at load time to one past the highest
/// stored id, so a deleted id is never handed out again.
pub struct BookStore<S: Storage = JsonFileStorage> {
    storage: S,
    state: RwLock<State>,
    write_gate: Mutex<()>,
}

impl BookStore<JsonFileStorage> {
    /// Open the data file named by `config`, creating an empty collection
    /// if it does not exist yet.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        Self::with_storage(JsonFileStorage::from_config(&config))
    }
}

impl<S: Storage> BookStore<S> {
    /// Load the collection from `storage`.
    pub fn with_storage(storage: S) -> Result<Self, StoreError> {
        let books = storage.load()?;
        let state = State::seeded(books)?;
        info!(
            books = state.books.len(),
            next_id = state.next_id,
            "Book store opened"
        );
        Ok(Self {
            storage,
            state: RwLock::new(state),
            write_gate: Mutex::new(()),
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// All books, in insertion order.
    pub fn list(&self) -> Result<Vec<Book>, StoreError> {
        let state = self.read_state("list")?;
        Ok(state.books.clone())
    }

    /// Books with `available == true`, in insertion order.
    pub fn list_available(&self) -> Result<Vec<Book>, StoreError> {
        let state = self.read_state("list available")?;
        Ok(query::available(&state.books))
    }

    pub fn get(&self, id: u64) -> Result<Book, StoreError> {
        let state = self.read_state("get")?;
        let index = state.position(id)?;
        Ok(state.books[index].clone())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read_state("len")?.books.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// The id the next successful `create` will assign.
    pub fn next_id(&self) -> Result<u64, StoreError> {
        Ok(self.read_state("next id")?.next_id)
    }

    /// Validate, assign the next id, append and persist.
    pub fn create(&self, new_book: NewBook) -> Result<Book, StoreError> {
        new_book.validate()?;

        let book = self.mutate("create", |state| {
            let id = state.next_id;
            state.next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
            let book = new_book.into_book(id);
            state.books.push(book.clone());
            Ok(book)
        })?;

        info!(id = book.id, "Book created");
        Ok(book)
    }

    /// Replace the fields present in `patch` and persist.
    pub fn update(&self, id: u64, patch: BookPatch) -> Result<Book, StoreError> {
        let book = self.mutate("update", |state| {
            let index = state.position(id)?;
            patch.validate()?;
            let book = &mut state.books[index];
            patch.apply(book);
            Ok(book.clone())
        })?;

        info!(id, "Book updated");
        Ok(book)
    }

    /// Remove a book and persist.
    pub fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.mutate("delete", |state| {
            let index = state.position(id)?;
            state.books.remove(index);
            Ok(())
        })?;

        info!(id, "Book deleted");
        Ok(())
    }

    fn read_state(
        &self,
        operation: &'static str,
    ) -> Result<std::sync::RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    /// Run `apply` against a copy of the live state under the write gate,
    /// persist the copy, then install it. On any error the live state is
    /// left exactly as it was.
    fn mutate<T, F>(&self, operation: &'static str, apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut State) -> Result<T, StoreError>,
    {
        let _gate = self
            .write_gate
            .lock()
            .map_err(|_| StoreError::LockPoisoned(operation))?;

        let mut working = self.read_state(operation)?.clone();
        let output = apply(&mut working)?;

        if let Err(err) = self.storage.save(&working.books) {
            warn!(operation, error = %err, "Save failed, mutation rolled back");
            return Err(err);
        }

        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))?;
        *state = working;
        Ok(output)
    }
}
