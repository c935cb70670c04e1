use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::genres::{Genre, NewGenre, UpdateGenre};
use crate::domain::ids::GenreId;

#[tracing::instrument(skip(state))]
pub(crate) async fn list_genres(
    State(state): State<AppState>,
) -> Result<Json<Vec<Genre>>, ApiError> {
    let genres = state.genre_repo.list().await.map_err(AppError::from)?;
    Ok(Json(genres))
}

#[tracing::instrument(skip(state))]
pub(crate) async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<GenreId>,
) -> Result<Json<Genre>, ApiError> {
    let genre = state.genre_repo.get(id).await.map_err(AppError::from)?;
    Ok(Json(genre))
}

#[tracing::instrument(skip(state, _auth_user))]
pub(crate) async fn create_genre(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Json(submission): Json<NewGenre>,
) -> Result<(StatusCode, Json<Genre>), ApiError> {
    let new_genre = submission.normalize();
    if new_genre.name.is_empty() {
        return Err(AppError::validation("genre name must not be empty").into());
    }

    let genre = state
        .genre_repo
        .insert(new_genre)
        .await
        .map_err(AppError::from)?;

    info!(genre_id = %genre.id, name = %genre.name, fiction = genre.fiction, "genre created");
    Ok((StatusCode::CREATED, Json(genre)))
}

#[tracing::instrument(skip(state, _auth_user))]
pub(crate) async fn update_genre(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<GenreId>,
    Json(submission): Json<UpdateGenre>,
) -> Result<Json<Genre>, ApiError> {
    let update = submission.normalize();
    if !update.has_changes() {
        return Err(AppError::validation("no changes provided").into());
    }
    if update.name.as_deref().is_some_and(str::is_empty) {
        return Err(AppError::validation("genre name must not be empty").into());
    }

    let genre = state
        .genre_repo
        .update(id, update)
        .await
        .map_err(AppError::from)?;
    info!(%id, "genre updated");
    Ok(Json(genre))
}

#[tracing::instrument(skip(state, _auth_user))]
pub(crate) async fn delete_genre(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<GenreId>,
) -> Result<StatusCode, ApiError> {
    state.genre_repo.delete(id).await.map_err(AppError::from)?;
    info!(%id, "genre deleted");
    Ok(StatusCode::NO_CONTENT)
}
