//! Book records and the typed inputs used to create and update them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// A stored book. Ids are assigned by the store and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub available: bool,
}

/// Fields required to create a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub available: bool,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, available: bool) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            available,
        }
    }

    /// Parse a request body. `title` and `author` must be non-empty strings
    /// and `available` must be a JSON boolean.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let fields = as_object(value)?;
        let title = text_field(fields, "title")?.ok_or(ValidationError::MissingField("title"))?;
        let author =
            text_field(fields, "author")?.ok_or(ValidationError::MissingField("author"))?;
        let available =
            bool_field(fields, "available")?.ok_or(ValidationError::MissingField("available"))?;

        let book = Self {
            title,
            author,
            available,
        };
        book.validate()?;
        Ok(book)
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("author", &self.author)
    }

    pub(crate) fn into_book(self, id: u64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            available: self.available,
        }
    }
}

/// A partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub available: Option<bool>,
}

impl BookPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.available.is_none()
    }

    /// Parse a request body. Every field is optional, but a present field
    /// must have the right type. `null` is treated as absent.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let fields = as_object(value)?;
        let patch = Self {
            title: text_field(fields, "title")?,
            author: text_field(fields, "author")?,
            available: bool_field(fields, "available")?,
        };
        patch.validate()?;
        Ok(patch)
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(author) = &self.author {
            require_text("author", author)?;
        }
        Ok(())
    }

    pub(crate) fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(available) = self.available {
            book.available = available;
        }
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value.as_object().ok_or(ValidationError::NotAnObject)
}

fn text_field(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "string",
        }),
    }
}

fn bool_field(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<bool>, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "boolean",
        }),
    }
}
