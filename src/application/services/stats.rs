use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::domain::errors::RepositoryError;
use crate::domain::ids::UserId;
use crate::domain::repositories::StatsRepository;
use crate::domain::stats::{ChartData, FilterCriteria, Metric, monthly_chart};

/// Loads a user's completed books and runs the monthly statistics pipeline.
/// Every call recomputes from fresh data.
#[derive(Clone)]
pub struct StatsService {
    stats: Arc<dyn StatsRepository>,
}

impl StatsService {
    pub fn new(stats: Arc<dyn StatsRepository>) -> Self {
        Self { stats }
    }

    pub async fn monthly_chart(
        &self,
        user_id: UserId,
        criteria: &FilterCriteria,
        metric: Metric,
    ) -> Result<ChartData, RepositoryError> {
        let started = Instant::now();
        let records = self.stats.completed_records(user_id).await?;
        let chart = monthly_chart(&records, criteria, metric);

        info!(
            %user_id,
            records = records.len(),
            months = chart.series.len(),
            metric = metric.as_str(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "monthly chart computed"
        );
        Ok(chart)
    }
}
