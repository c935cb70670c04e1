use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::query_as;

use crate::domain::RepositoryError;
use crate::domain::ids::{ShelfEntryId, UserId};
use crate::domain::repositories::StatsRepository;
use crate::domain::stats::CompletedBookRecord;
use crate::infrastructure::database::DatabasePool;
use crate::infrastructure::repositories::books::genre_links::load_genre_tags;

#[derive(sqlx::FromRow)]
struct CompletedRecord {
    id: i64,
    date_finished: NaiveDate,
    pages: Option<i64>,
    rating: Option<f64>,
}

#[derive(Clone)]
pub struct SqlStatsRepository {
    pool: DatabasePool,
}

impl SqlStatsRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for SqlStatsRepository {
    async fn completed_records(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CompletedBookRecord>, RepositoryError> {
        let records = query_as::<_, CompletedRecord>(
            "SELECT id, date_finished, pages, rating FROM shelf_entries \
             WHERE user_id = ? AND date_finished IS NOT NULL \
             ORDER BY date_finished ASC, id ASC",
        )
        .bind(i64::from(user_id))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        let ids: Vec<i64> = records.iter().map(|record| record.id).collect();
        let mut tags = load_genre_tags(&self.pool, &ids).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let id = ShelfEntryId::new(record.id);
                CompletedBookRecord {
                    id,
                    finished_on: record.date_finished,
                    pages: record.pages.map(|pages| pages as u32),
                    rating: record.rating,
                    genres: tags.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }
}
