//! Author routes.

use crate::{catalog_err_to_status, AppState};
use axum::{extract::Extension, http::StatusCode, response::Json};
use serde::Deserialize;
use shelf_catalog::{create_author, Author};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct CreateAuthorRequest {
    pub name: String,
}

/// POST /authors/
pub async fn create_author_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateAuthorRequest>,
) -> Result<Json<Author>, StatusCode> {
    let pool = state.pool.clone();
    let author = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for create_author");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        create_author(&conn, &payload.name).map_err(catalog_err_to_status)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "create_author task join error");
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok(Json(author))
}
