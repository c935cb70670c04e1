use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::catalog::{CatalogAuthor, CatalogBook, EditionDetails};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[tracing::instrument(skip(state))]
pub(crate) async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CatalogBook>>, ApiError> {
    let books = state
        .catalog
        .search_books(&query.q)
        .await
        .map_err(AppError::from)?;
    Ok(Json(books))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn edition_details(
    State(state): State<AppState>,
    Path(work_id): Path<String>,
) -> Result<Json<EditionDetails>, ApiError> {
    let details = state
        .catalog
        .edition_details(&work_id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(details))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn search_authors(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CatalogAuthor>>, ApiError> {
    let authors = state
        .catalog
        .search_authors(&query.q)
        .await
        .map_err(AppError::from)?;
    Ok(Json(authors))
}
