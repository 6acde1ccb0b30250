//! Client routes: creation plus the client↔book association endpoints.

use crate::{catalog_err_to_status, AppState};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use shelf_catalog::{
    create_client, link_client_book, list_client_books, unlink_client_book, BookClientLink, Client,
};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
}

/// POST /clients/
pub async fn create_client_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateClientRequest>,
) -> Result<Json<Client>, StatusCode> {
    let pool = state.pool.clone();
    let client = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for create_client");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        create_client(&conn, &payload.name).map_err(catalog_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "create_client task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(client))
}

/// GET /clients/{client_id}/books/
///
/// Returns the raw association rows for the client, not hydrated books.
/// Unknown client ids yield an empty list.
pub async fn list_client_books_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<BookClientLink>>, StatusCode> {
    let pool = state.pool.clone();
    let links = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for list_client_books");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        list_client_books(&conn, client_id).map_err(catalog_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "list_client_books task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(links))
}

/// POST /clients/{client_id}/books/{book_id}/link/
///
/// Inserts one association row unconditionally; repeated links accumulate.
pub async fn link_client_book_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((client_id, book_id)): Path<(i64, i64)>,
) -> Result<Json<BookClientLink>, StatusCode> {
    let pool = state.pool.clone();
    let link = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for link_client_book");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        link_client_book(&conn, client_id, book_id).map_err(catalog_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "link_client_book task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(link))
}

/// POST /clients/{client_id}/books/{book_id}/unlink/
///
/// Deletes every association row matching the pair and echoes the pair
/// back, whether or not anything was deleted.
pub async fn unlink_client_book_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((client_id, book_id)): Path<(i64, i64)>,
) -> Result<Json<BookClientLink>, StatusCode> {
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for unlink_client_book");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        let removed =
            unlink_client_book(&conn, client_id, book_id).map_err(catalog_err_to_status)?;
        tracing::debug!(client_id, book_id, removed, "unlinked client/book pair");
        Ok::<_, StatusCode>(())
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "unlink_client_book task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(BookClientLink { book_id, client_id }))
}
