use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::ids::ShelfEntryId;
use crate::domain::shelf::{
    CatalogShelfSubmission, NewShelfEntry, ReadingStatus, ShelfEntry, ShelfFilter,
    UpdateShelfEntry,
};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ShelfQuery {
    #[serde(default)]
    status: Option<String>,
}

impl ShelfQuery {
    fn into_filter(self) -> Result<ShelfFilter, AppError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<ReadingStatus>()
                    .map_err(|()| AppError::validation(format!("unknown status '{raw}'")))?,
            ),
        };
        Ok(ShelfFilter { status })
    }
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn list_shelf(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ShelfQuery>,
) -> Result<Json<Vec<ShelfEntry>>, ApiError> {
    let filter = query.into_filter()?;
    let entries = state
        .shelf_service
        .list(auth_user.user.id, filter)
        .await?;
    Ok(Json(entries))
}

#[tracing::instrument(skip(state, auth_user, submission))]
pub(crate) async fn create_shelf_entry(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(submission): Json<NewShelfEntry>,
) -> Result<(StatusCode, Json<ShelfEntry>), ApiError> {
    let entry = state
        .shelf_service
        .add(auth_user.user.id, submission)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[tracing::instrument(skip(state, auth_user, submission))]
pub(crate) async fn create_from_catalog(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(submission): Json<CatalogShelfSubmission>,
) -> Result<(StatusCode, Json<ShelfEntry>), ApiError> {
    let entry = state
        .shelf_service
        .add_from_catalog(auth_user.user.id, submission)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn get_shelf_entry(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<ShelfEntryId>,
) -> Result<Json<ShelfEntry>, ApiError> {
    let entry = state
        .shelf_service
        .get_owned(auth_user.user.id, id)
        .await?;
    Ok(Json(entry))
}

#[tracing::instrument(skip(state, auth_user, submission))]
pub(crate) async fn update_shelf_entry(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<ShelfEntryId>,
    Json(submission): Json<UpdateShelfEntry>,
) -> Result<Json<ShelfEntry>, ApiError> {
    let entry = state
        .shelf_service
        .update(auth_user.user.id, id, submission)
        .await?;
    Ok(Json(entry))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn delete_shelf_entry(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<ShelfEntryId>,
) -> Result<StatusCode, ApiError> {
    state.shelf_service.delete(auth_user.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
