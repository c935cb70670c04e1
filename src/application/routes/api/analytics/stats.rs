use axum::Json;
use axum::extract::{Query, State};

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::stats::{ChartData, FilterCriteria, Metric, StatsError};

/// Reads `metric`, `fiction`, `start`, `end` and any number of `genre`
/// parameters. Unknown keys are ignored; blank bounds mean unbounded. Genre
/// names match ignoring ASCII case.
fn parse_monthly_query(
    pairs: Vec<(String, String)>,
) -> Result<(FilterCriteria, Metric), StatsError> {
    let mut criteria = FilterCriteria::default();
    let mut metric = Metric::default();

    for (key, value) in pairs {
        let value = value.trim();
        match key.as_str() {
            "metric" if !value.is_empty() => metric = value.parse()?,
            "fiction" => criteria.fiction = value.parse()?,
            "genre" if !value.is_empty() => {
                criteria.genres.insert(value.to_string());
            }
            "start" if !value.is_empty() => criteria.start = Some(value.parse()?),
            "end" if !value.is_empty() => criteria.end = Some(value.parse()?),
            _ => {}
        }
    }

    Ok((criteria, metric))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn monthly_stats(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ChartData>, ApiError> {
    let (criteria, metric) = parse_monthly_query(pairs).map_err(AppError::from)?;
    let chart = state
        .stats_service
        .monthly_chart(auth_user.user.id, &criteria, metric)
        .await
        .map_err(AppError::from)?;
    Ok(Json(chart))
}
