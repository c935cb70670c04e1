use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as};

use crate::domain::RepositoryError;
use crate::domain::authors::{NewTrackedAuthor, TrackedAuthor};
use crate::domain::ids::{TrackedAuthorId, UserId};
use crate::domain::repositories::TrackedAuthorRepository;
use crate::infrastructure::database::DatabasePool;

#[derive(Clone)]
pub struct SqlTrackedAuthorRepository {
    pool: DatabasePool,
}

impl SqlTrackedAuthorRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_domain(record: TrackedAuthorRecord) -> TrackedAuthor {
        TrackedAuthor {
            id: TrackedAuthorId::new(record.id),
            user_id: UserId::new(record.user_id),
            author_key: record.author_key,
            name: record.name,
            work_count: record.work_count.max(0) as u32,
            created_at: record.created_at,
        }
    }
}

#[async_trait]
impl TrackedAuthorRepository for SqlTrackedAuthorRepository {
    async fn insert(
        &self,
        user_id: UserId,
        author: NewTrackedAuthor,
    ) -> Result<TrackedAuthor, RepositoryError> {
        let author = author.normalize();

        let record = query_as::<_, TrackedAuthorRecord>(
            "INSERT INTO tracked_authors (user_id, author_key, name, work_count, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, user_id, author_key, name, work_count, created_at",
        )
        .bind(i64::from(user_id))
        .bind(&author.author_key)
        .bind(&author.name)
        .bind(i64::from(author.work_count))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err
                && db_err.is_unique_violation()
            {
                return RepositoryError::conflict("You are already tracking this author");
            }
            RepositoryError::unexpected(err.to_string())
        })?;

        Ok(Self::into_domain(record))
    }

    async fn get(&self, id: TrackedAuthorId) -> Result<TrackedAuthor, RepositoryError> {
        let record = query_as::<_, TrackedAuthorRecord>(
            "SELECT id, user_id, author_key, name, work_count, created_at \
             FROM tracked_authors WHERE id = ?",
        )
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        record.map(Self::into_domain).ok_or(RepositoryError::NotFound)
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<TrackedAuthor>, RepositoryError> {
        let records = query_as::<_, TrackedAuthorRecord>(
            "SELECT id, user_id, author_key, name, work_count, created_at \
             FROM tracked_authors WHERE user_id = ? ORDER BY LOWER(name) ASC",
        )
        .bind(i64::from(user_id))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(records.into_iter().map(Self::into_domain).collect())
    }

    async fn delete(&self, id: TrackedAuthorId) -> Result<(), RepositoryError> {
        let result = query("DELETE FROM tracked_authors WHERE id = ?")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TrackedAuthorRecord {
    id: i64,
    user_id: i64,
    author_key: String,
    name: String,
    work_count: i64,
    created_at: DateTime<Utc>,
}
