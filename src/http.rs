//! HTTP adapter — maps REST requests onto a [`BookStore`].
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /books` — all books.
//! - `GET /books/available` — books with `available == true`.
//! - `GET /books/:id` — one book.
//! - `POST /books` — create; body `{ "title", "author", "available" }`, responds 201.
//! - `PUT /books/:id` — partial update; any subset of the create fields.
//! - `DELETE /books/:id` — delete; responds `{ "message": "Book deleted successfully" }`.
//! - `GET /health` — `{ "ok": true, "books": <count> }`.
//!
//! Errors are `{ "error": "<message>" }` with status 400 (invalid input or
//! id), 404 (unknown id) or 500 (storage failures).
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bookshelf::{http, BookStore, StoreConfig};
//!
//! let store = Arc::new(BookStore::open(StoreConfig::from_env())?);
//!
//! // Nest under a prefix alongside other routes
//! let app = axum::Router::new().nest("/api", http::router(store.clone()));
//!
//! // Or serve directly
//! http::serve(store, "0.0.0.0:3000").await?;
//! ```

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::error;

use crate::book::{BookPatch, NewBook};
use crate::error::StoreError;
use crate::storage::Storage;
use crate::store::BookStore;

/// Build an axum `Router` serving the given store.
pub fn router<S: Storage + 'static>(store: Arc<BookStore<S>>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route("/books", get(list::<S>).post(create::<S>))
        .route("/books/available", get(list_available::<S>))
        .route(
            "/books/:id",
            get(get_one::<S>).put(update::<S>).delete(remove::<S>),
        )
        .with_state(store)
}

/// Serve the store over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S: Storage + 'static>(
    store: Arc<BookStore<S>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(store);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Serving books over HTTP");
    axum::serve(listener, app).await
}

/// Failure of a single request.
#[derive(Debug)]
enum ApiError {
    /// The request could not be parsed before reaching the store.
    BadRequest(String),
    Store(StoreError),
    /// The blocking store call panicked or was cancelled.
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Store(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, err.to_string())
            }
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "Book request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Run a store call off the async worker threads; store calls take locks
/// and do file I/O.
async fn blocking<S, T, F>(store: Arc<BookStore<S>>, call: F) -> Result<T, ApiError>
where
    S: Storage + 'static,
    T: Send + 'static,
    F: FnOnce(&BookStore<S>) -> Result<T, StoreError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || call(&store))
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {}", e)))?;
    Ok(result?)
}

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>()
        .map_err(|_| ApiError::BadRequest(format!("invalid book id: {}", raw)))
}

fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))
}

/// `GET /health`
async fn health<S: Storage + 'static>(
    State(store): State<Arc<BookStore<S>>>,
) -> Result<Response, ApiError> {
    let count = blocking(store, |s| s.len()).await?;
    Ok(Json(json!({ "ok": true, "books": count })).into_response())
}

/// `GET /books`
async fn list<S: Storage + 'static>(
    State(store): State<Arc<BookStore<S>>>,
) -> Result<Response, ApiError> {
    let books = blocking(store, |s| s.list()).await?;
    Ok(Json(books).into_response())
}

/// `GET /books/available`
async fn list_available<S: Storage + 'static>(
    State(store): State<Arc<BookStore<S>>>,
) -> Result<Response, ApiError> {
    let books = blocking(store, |s| s.list_available()).await?;
    Ok(Json(books).into_response())
}

/// `GET /books/:id`
async fn get_one<S: Storage + 'static>(
    State(store): State<Arc<BookStore<S>>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let book = blocking(store, move |s| s.get(id)).await?;
    Ok(Json(book).into_response())
}

/// `POST /books`
async fn create<S: Storage + 'static>(
    State(store): State<Arc<BookStore<S>>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let new_book = NewBook::from_json(&parse_body(&body)?).map_err(StoreError::from)?;
    let book = blocking(store, move |s| s.create(new_book)).await?;
    Ok((StatusCode::CREATED, Json(book)).into_response())
}

/// `PUT /books/:id`
async fn update<S: Storage + 'static>(
    State(store): State<Arc<BookStore<S>>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let patch = BookPatch::from_json(&parse_body(&body)?).map_err(StoreError::from)?;
    let book = blocking(store, move |s| s.update(id, patch)).await?;
    Ok(Json(book).into_response())
}

/// `DELETE /books/:id`
async fn remove<S: Storage + 'static>(
    State(store): State<Arc<BookStore<S>>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    blocking(store, move |s| s.delete(id)).await?;
    Ok(Json(json!({ "message": "Book deleted successfully" })).into_response())
}
