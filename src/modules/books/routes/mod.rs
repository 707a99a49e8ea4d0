//! HTTP handlers for the Books module.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use stacks_http::AppError;

use super::models::{Book, NewBook};
use super::store::{BookStore, StoreError};

const MISSING_QUERY: &str = "Query parameter 'q' is missing";

/// Routes are absolute; the module mounts them at the server root.
pub fn router(store: BookStore) -> Router {
    Router::new()
        .route("/books", get(list_books))
        .route("/book", post(create_book))
        .route("/book/{id}", get(get_book).delete(delete_book))
        .route("/genres", get(list_genres))
        .route("/books/genre/{genre}", get(list_books_by_genre))
        .route("/books/search", get(search_books))
        .with_state(store)
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found("Book not found"),
            StoreError::Storage(e) => AppError::Internal(e.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request("invalid book id"))
}

async fn list_books(State(store): State<BookStore>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(store.list_all().await?))
}

async fn create_book(
    State(store): State<BookStore>,
    body: Bytes,
) -> Result<Json<Book>, AppError> {
    let new_book: NewBook =
        serde_json::from_slice(&body).map_err(|e| AppError::bad_request(e.to_string()))?;

    let book = store.insert(new_book).await?;
    tracing::info!(book_id = book.id, "book created");
    Ok(Json(book))
}

async fn get_book(
    State(store): State<BookStore>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(store.get_by_id(id).await?))
}

async fn delete_book(
    State(store): State<BookStore>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    store.delete_by_id(id).await?;
    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::OK)
}

async fn list_genres(State(store): State<BookStore>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(store.list_genres().await?))
}

async fn list_books_by_genre(
    State(store): State<BookStore>,
    Path(genre): Path<String>,
) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(store.list_by_genre(&genre).await?))
}

async fn search_books(
    State(store): State<BookStore>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Book>>, AppError> {
    // An empty `q` would match every row; treat it like a missing one.
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::bad_request(MISSING_QUERY))?;

    Ok(Json(store.search(&query).await?))
}
