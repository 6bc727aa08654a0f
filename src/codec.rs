//! JSON encoding of the book collection.
//!
//! The durable document is a bare JSON array of books, which is also the
//! layout of data files written before this crate existed. Decoding further
//! accepts a versioned envelope:
//!
//! ```json
//! { "version": 1, "books": [ { "id": 1, "title": "Dune", "author": "Herbert", "available": true } ] }
//! ```
//!
//! Decoding validates structure beyond what serde checks: ids are positive,
//! below `u64::MAX` and unique, and text fields are non-empty. A blank
//! document is rejected; a truncated write must not read as "no books".

use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::book::{require_text, Book};

/// Highest envelope version this crate understands.
pub const CURRENT_VERSION: u32 = 1;

/// Output layout for encoded collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Two-space indented, one field per line.
    #[default]
    Pretty,
    /// A single line.
    Compact,
}

/// The bytes did not describe a valid book collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecError(String);

impl CodecError {
    fn new(message: impl Into<String>) -> Self {
        CodecError(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for CodecError {}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    version: u32,
    books: Vec<Book>,
}

/// Encode the collection, preserving order.
pub fn encode(books: &[Book], format: Format) -> Result<Vec<u8>, CodecError> {
    let encoded = match format {
        Format::Pretty => serde_json::to_vec_pretty(books),
        Format::Compact => serde_json::to_vec(books),
    };
    encoded.map_err(|e| CodecError::new(e.to_string()))
}

/// Decode and validate a collection.
pub fn decode(bytes: &[u8]) -> Result<Vec<Book>, CodecError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(CodecError::new("empty document"));
    }

    let document: Value =
        serde_json::from_slice(bytes).map_err(|e| CodecError::new(format!("invalid JSON: {}", e)))?;

    let books = match document {
        Value::Array(_) => serde_json::from_value::<Vec<Book>>(document)
            .map_err(|e| CodecError::new(format!("invalid book record: {}", e)))?,
        Value::Object(_) => {
            let envelope: Envelope = serde_json::from_value(document)
                .map_err(|e| CodecError::new(format!("invalid document: {}", e)))?;
            if envelope.version == 0 || envelope.version > CURRENT_VERSION {
                return Err(CodecError::new(format!(
                    "unsupported document version {}",
                    envelope.version
                )));
            }
            envelope.books
        }
        other => {
            return Err(CodecError::new(format!(
                "expected an array of books, found {}",
                kind(&other)
            )))
        }
    };

    validate(&books)?;
    Ok(books)
}

fn validate(books: &[Book]) -> Result<(), CodecError> {
    let mut seen = HashSet::with_capacity(books.len());
    for (index, book) in books.iter().enumerate() {
        if book.id == 0 {
            return Err(CodecError::new(format!("record {} has id 0", index)));
        }
        if book.id == u64::MAX {
            return Err(CodecError::new(format!(
                "record {} has id {}, leaving no id to assign",
                index,
                book.id
            )));
        }
        if !seen.insert(book.id) {
            return Err(CodecError::new(format!("duplicate id {}", book.id)));
        }
        require_text("title", &book.title)
            .and_then(|_| require_text("author", &book.author))
            .map_err(|e| CodecError::new(format!("book {}: {}", book.id, e)))?;
    }
    Ok(())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
