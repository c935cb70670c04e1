use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query_as, query_scalar};

use crate::domain::RepositoryError;
use crate::domain::ids::UserId;
use crate::domain::repositories::UserRepository;
use crate::domain::users::{NewUser, User};
use crate::infrastructure::database::DatabasePool;

#[derive(Clone)]
pub struct SqlUserRepository {
    pool: DatabasePool,
}

impl SqlUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_domain(record: UserRecord) -> User {
        User {
            id: UserId::new(record.id),
            username: record.username,
            is_admin: record.is_admin,
            created_at: record.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let user = user.normalize();

        let record = query_as::<_, UserRecord>(
            "INSERT INTO users (username, is_admin, created_at) VALUES (?, ?, ?) \
             RETURNING id, username, is_admin, created_at",
        )
        .bind(&user.username)
        .bind(user.is_admin)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err
                && db_err.is_unique_violation()
            {
                return RepositoryError::conflict("A user with this username already exists");
            }
            RepositoryError::unexpected(err.to_string())
        })?;

        Ok(Self::into_domain(record))
    }

    async fn get(&self, id: UserId) -> Result<User, RepositoryError> {
        let record = query_as::<_, UserRecord>(
            "SELECT id, username, is_admin, created_at FROM users WHERE id = ?",
        )
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        record.map(Self::into_domain).ok_or(RepositoryError::NotFound)
    }

    async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError> {
        let record = query_as::<_, UserRecord>(
            "SELECT id, username, is_admin, created_at FROM users WHERE username = ?",
        )
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        record.map(Self::into_domain).ok_or(RepositoryError::NotFound)
    }

    async fn exists(&self) -> Result<bool, RepositoryError> {
        let count: i64 = query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;
        Ok(count > 0)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRecord {
    id: i64,
    username: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}
