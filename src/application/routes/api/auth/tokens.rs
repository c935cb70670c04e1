use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::info;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::ids::TokenId;
use crate::domain::tokens::{IssuedToken, Token};

#[derive(Debug, Deserialize)]
pub(crate) struct NewTokenSubmission {
    name: String,
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn create_token(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(submission): Json<NewTokenSubmission>,
) -> Result<(StatusCode, Json<IssuedToken>), ApiError> {
    let name = submission.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("token name must not be empty").into());
    }

    let issued = state
        .token_service
        .issue(auth_user.user.id, name)
        .await
        .map_err(AppError::from)?;
    Ok((StatusCode::CREATED, Json(issued)))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn list_tokens(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Token>>, ApiError> {
    let tokens = state
        .token_repo
        .list_by_user(auth_user.user.id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(tokens))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn revoke_token(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<TokenId>,
) -> Result<StatusCode, ApiError> {
    let token = state.token_repo.get(id).await.map_err(AppError::from)?;
    if token.user_id != auth_user.user.id {
        return Err(AppError::NotFound.into());
    }

    state.token_repo.revoke(id).await.map_err(AppError::from)?;
    info!(token_id = %id, "api token revoked");
    Ok(StatusCode::NO_CONTENT)
}
