mod book;
mod codec;
mod config;
mod error;
mod query;
mod storage;
mod store;

#[cfg(feature = "http")]
pub mod http;

pub use book::{Book, BookPatch, NewBook};
pub use codec::{decode, encode, CodecError, Format, CURRENT_VERSION};
pub use config::{StoreConfig, COMPACT_ENV, DATA_FILE_ENV, DEFAULT_DATA_FILE};
pub use error::{StoreError, ValidationError};
pub use query::{available, is_available};
pub use storage::{InMemoryStorage, JsonFileStorage, Storage};
pub use store::BookStore;
