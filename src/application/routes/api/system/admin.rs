use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::tokens::ProvisionedUser;
use crate::domain::users::NewUser;

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(submission): Json<NewUser>,
) -> Result<(StatusCode, Json<ProvisionedUser>), ApiError> {
    auth_user.require_admin()?;

    let new_user = submission.normalize();
    if new_user.username.is_empty() {
        return Err(AppError::validation("username must not be empty").into());
    }

    let provisioned = state
        .token_service
        .provision(new_user)
        .await
        .map_err(AppError::from)?;

    info!(user_id = %provisioned.user.id, username = %provisioned.user.username, "user created");
    Ok((StatusCode::CREATED, Json(provisioned)))
}
