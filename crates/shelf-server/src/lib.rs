//! Shelf server library logic.
//!
//! Wires the HTTP surface (axum handlers) to the catalog layer. Every route
//! checks out a pooled SQLite connection on a blocking thread; all catalog
//! failures surface as `500 Internal Server Error` with the cause logged.

pub mod api_authors;
pub mod api_books;
pub mod api_clients;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use shelf_db::DbPool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Maximum request body size (1 MiB). Protects against OOM from oversized payloads.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Maps a [`CatalogError`] to an HTTP status code, logging the cause.
///
/// The catalog exposes no richer failure taxonomy, so everything becomes
/// a 500.
///
/// [`CatalogError`]: shelf_catalog::CatalogError
pub(crate) fn catalog_err_to_status(e: shelf_catalog::CatalogError) -> axum::http::StatusCode {
    tracing::error!(error = %e, "catalog operation failed");
    axum::http::StatusCode::INTERNAL_SERVER_ERROR
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/books/",
            post(api_books::create_book_handler).get(api_books::list_books_handler),
        )
        .route("/books/{book_id}", put(api_books::update_book_handler))
        .route("/authors/", post(api_authors::create_author_handler))
        .route("/clients/", post(api_clients::create_client_handler))
        .route(
            "/clients/{client_id}/books/",
            get(api_clients::list_client_books_handler),
        )
        .route(
            "/clients/{client_id}/books/{book_id}/link/",
            post(api_clients::link_client_book_handler),
        )
        .route(
            "/clients/{client_id}/books/{book_id}/unlink/",
            post(api_clients::unlink_client_book_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
