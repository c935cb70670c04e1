use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::reviews::PublicReview;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReviewQuery {
    #[serde(default)]
    q: Option<String>,
}

#[tracing::instrument(skip(state))]
pub(crate) async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<Vec<PublicReview>>, ApiError> {
    let reviews = state
        .shelf_repo
        .list_public_reviews(query.q.as_deref())
        .await
        .map_err(AppError::from)?;
    Ok(Json(reviews))
}
