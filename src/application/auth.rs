use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use tracing::{Span, warn};

use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::users::User;
use crate::infrastructure::auth::hash_token;

/// The user behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.user.is_admin {
            Ok(())
        } else {
            warn!(user_id = %self.user.id, "non-admin attempted an admin action");
            Err(AppError::Unauthorized)
        }
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            Span::current().record("user.id", tracing::field::display(&user.user.id));
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header.to_str().map_err(|err| {
            warn!(error = %err, "authorization header contains invalid characters");
            AppError::Unauthorized
        })?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let token_record = state
            .token_repo
            .get_by_token_hash(&hash_token(token))
            .await
            .map_err(|err| {
                warn!(error = %err, "bearer token lookup failed");
                AppError::Unauthorized
            })?;

        if token_record.is_revoked() {
            return Err(AppError::Unauthorized.into());
        }

        // Fire and forget
        let token_repo = state.token_repo.clone();
        let token_id = token_record.id;
        tokio::spawn(async move {
            if let Err(err) = token_repo.update_last_used(token_id).await {
                warn!(error = %err, %token_id, "failed to update token last_used");
            }
        });

        let user = state
            .user_repo
            .get(token_record.user_id)
            .await
            .map_err(|err| {
                warn!(error = %err, user_id = %token_record.user_id, "user lookup failed for valid token");
                AppError::Unauthorized
            })?;

        let auth = AuthenticatedUser { user };
        parts.extensions.insert(auth.clone());
        Span::current().record("user.id", tracing::field::display(&auth.user.id));
        Ok(auth)
    }
}
