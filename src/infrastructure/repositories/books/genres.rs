use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, query, query_as};

use crate::domain::RepositoryError;
use crate::domain::genres::{Genre, NewGenre, UpdateGenre};
use crate::domain::ids::GenreId;
use crate::domain::repositories::GenreRepository;
use crate::infrastructure::database::{DatabaseDriver, DatabasePool};
use crate::infrastructure::repositories::macros::push_update_field;

const DUPLICATE_NAME: &str = "A genre with this name already exists";

#[derive(Clone)]
pub struct SqlGenreRepository {
    pool: DatabasePool,
}

impl SqlGenreRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_domain(record: GenreRecord) -> Genre {
        Genre {
            id: GenreId::from(record.id),
            name: record.name,
            fiction: record.fiction,
            created_at: record.created_at,
        }
    }

    fn map_write_error(err: sqlx::Error) -> RepositoryError {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepositoryError::conflict(DUPLICATE_NAME);
        }
        RepositoryError::unexpected(err.to_string())
    }
}

#[async_trait]
impl GenreRepository for SqlGenreRepository {
    async fn insert(&self, new_genre: NewGenre) -> Result<Genre, RepositoryError> {
        let new_genre = new_genre.normalize();

        let record = query_as::<_, GenreRecord>(
            "INSERT INTO genres (name, fiction, created_at) VALUES (?, ?, ?) \
             RETURNING id, name, fiction, created_at",
        )
        .bind(&new_genre.name)
        .bind(new_genre.fiction)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_write_error)?;

        Ok(Self::into_domain(record))
    }

    async fn get(&self, id: GenreId) -> Result<Genre, RepositoryError> {
        let record = query_as::<_, GenreRecord>(
            "SELECT id, name, fiction, created_at FROM genres WHERE id = ?",
        )
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        match record {
            Some(record) => Ok(Self::into_domain(record)),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn get_by_name(&self, name: &str) -> Result<Genre, RepositoryError> {
        let record = query_as::<_, GenreRecord>(
            "SELECT id, name, fiction, created_at FROM genres \
             WHERE LOWER(TRIM(name)) = LOWER(TRIM(?))",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        match record {
            Some(record) => Ok(Self::into_domain(record)),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn list(&self) -> Result<Vec<Genre>, RepositoryError> {
        let records = query_as::<_, GenreRecord>(
            "SELECT id, name, fiction, created_at FROM genres ORDER BY LOWER(name) ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(records.into_iter().map(Self::into_domain).collect())
    }

    async fn update(&self, id: GenreId, changes: UpdateGenre) -> Result<Genre, RepositoryError> {
        let changes = changes.normalize();
        let mut builder = QueryBuilder::<DatabaseDriver>::new("UPDATE genres SET ");
        let mut sep = false;

        push_update_field!(builder, sep, "name", changes.name);
        push_update_field!(builder, sep, "fiction", changes.fiction);

        if !sep {
            return Err(RepositoryError::unexpected(
                "No fields provided for update".to_string(),
            ));
        }

        builder.push(" WHERE id = ");
        builder.push_bind(i64::from(id));

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(Self::map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await
    }

    async fn delete(&self, id: GenreId) -> Result<(), RepositoryError> {
        let result = query("DELETE FROM genres WHERE id = ?")
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
struct GenreRecord {
    id: i64,
    name: String,
    fiction: bool,
    created_at: DateTime<Utc>,
}
