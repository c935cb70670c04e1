use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::ApiError;
use crate::application::state::AppState;
use crate::domain::authors::{NewTrackedAuthor, TrackedAuthor, UpcomingRelease};
use crate::domain::ids::TrackedAuthorId;

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn list_tracked_authors(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<Json<Vec<TrackedAuthor>>, ApiError> {
    let authors = state.author_service.list(auth_user.user.id).await?;
    Ok(Json(authors))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn track_author(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(submission): Json<NewTrackedAuthor>,
) -> Result<(StatusCode, Json<TrackedAuthor>), ApiError> {
    let tracked = state
        .author_service
        .track(auth_user.user.id, submission)
        .await?;
    Ok((StatusCode::CREATED, Json(tracked)))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn untrack_author(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<TrackedAuthorId>,
) -> Result<StatusCode, ApiError> {
    state.author_service.untrack(auth_user.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn upcoming_releases(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<Json<Vec<UpcomingRelease>>, ApiError> {
    let releases = state.author_service.upcoming(auth_user.user.id).await?;
    Ok(Json(releases))
}
