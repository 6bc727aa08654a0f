use std::fmt;
use std::path::PathBuf;

/// Caller-supplied book data that violates a field invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The request body was not a JSON object.
    NotAnObject,
    /// A required field was absent (or `null`).
    MissingField(&'static str),
    /// A text field was empty or whitespace only.
    EmptyField(&'static str),
    /// A field was present with the wrong JSON type.
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotAnObject => write!(f, "book data must be a JSON object"),
            ValidationError::MissingField(field) => write!(f, "missing field: {}", field),
            ValidationError::EmptyField(field) => write!(f, "field must not be empty: {}", field),
            ValidationError::WrongType { field, expected } => {
                write!(f, "field {} must be a {}", field, expected)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Error type for every book store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Invalid input. Never changes state and never consumes an id.
    Validation(ValidationError),
    /// No book has the given id.
    NotFound(u64),
    /// Reading or writing durable storage failed at the I/O layer.
    Persistence { path: PathBuf, message: String },
    /// Durable storage exists but is not a valid book collection.
    CorruptState { path: PathBuf, message: String },
    /// A thread panicked while holding one of the store's locks.
    LockPoisoned(&'static str),
    /// Every representable id has been assigned.
    IdsExhausted,
}

impl StoreError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        StoreError::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        StoreError::CorruptState {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::Validation(_) => 400,
            StoreError::NotFound(_) => 404,
            StoreError::Persistence { .. } => 500,
            StoreError::CorruptState { .. } => 500,
            StoreError::LockPoisoned(_) => 500,
            StoreError::IdsExhausted => 500,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Validation(err) => write!(f, "invalid book data: {}", err),
            StoreError::NotFound(id) => write!(f, "book not found: {}", id),
            StoreError::Persistence { path, message } => {
                write!(f, "storage error at {}: {}", path.display(), message)
            }
            StoreError::CorruptState { path, message } => {
                write!(f, "corrupt book data at {}: {}", path.display(), message)
            }
            StoreError::LockPoisoned(operation) => {
                write!(f, "book store lock poisoned during {}", operation)
            }
            StoreError::IdsExhausted => write!(f, "no book ids left to assign"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err)
    }
}
