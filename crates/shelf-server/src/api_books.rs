//! Book routes: create, update, and filtered listing.

use crate::{catalog_err_to_status, AppState};
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use shelf_catalog::{create_book, list_books, update_book, Book, BookFilter, BookRow};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct BookRequest {
    pub title: String,
    pub author_ids: Vec<i64>,
}

#[derive(Deserialize)]
pub struct ListBooksParams {
    pub title_startswith: Option<String>,
    pub author_id: Option<i64>,
}

/// POST /books/
///
/// Inserts a book and one association row per author id, in a single
/// transaction. The author ids are not checked for existence.
pub async fn create_book_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<BookRequest>,
) -> Result<Json<Book>, StatusCode> {
    let pool = state.pool.clone();
    let book = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for create_book");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        create_book(&conn, &payload.title, &payload.author_ids).map_err(catalog_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "create_book task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(book))
}

/// PUT /books/{book_id}
///
/// Updates the title and replaces the author set in one transaction. A
/// nonexistent book id is not an error; the response echoes the submitted
/// payload either way.
pub async fn update_book_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(book_id): Path<i64>,
    Json(payload): Json<BookRequest>,
) -> Result<Json<Book>, StatusCode> {
    let pool = state.pool.clone();
    let book = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for update_book");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        update_book(&conn, book_id, &payload.title, &payload.author_ids)
            .map_err(catalog_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "update_book task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(book))
}

/// GET /books/?title_startswith=&author_id=
pub async fn list_books_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ListBooksParams>,
) -> Result<Json<Vec<BookRow>>, StatusCode> {
    let filter = BookFilter {
        title_startswith: params.title_startswith,
        author_id: params.author_id,
    };

    let pool = state.pool.clone();
    let books = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for list_books");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        list_books(&conn, &filter).map_err(catalog_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "list_books task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(books))
}
