use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{QueryBuilder, query, query_as};

use crate::domain::RepositoryError;
use crate::domain::ids::{ShelfEntryId, UserId};
use crate::domain::repositories::ShelfRepository;
use crate::domain::reviews::PublicReview;
use crate::domain::shelf::{
    NewShelfEntry, ReadingStatus, ShelfEntry, ShelfFilter, UpdateShelfEntry,
};
use crate::infrastructure::database::{DatabaseDriver, DatabasePool};
use crate::infrastructure::repositories::books::genre_links::{
    load_genre_tags, replace_genre_links,
};
use crate::infrastructure::repositories::macros::push_update_field;

const SELECT_ENTRY: &str = "SELECT id, user_id, work_key, title, authors, cover_url, language, \
     isbn, pages, status, rating, notes, date_started, date_finished, is_private, created_at, \
     updated_at FROM shelf_entries";

#[derive(Clone)]
pub struct SqlShelfRepository {
    pool: DatabasePool,
}

impl SqlShelfRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn encode_authors(authors: &[String]) -> Result<String, RepositoryError> {
        serde_json::to_string(authors).map_err(|err| RepositoryError::unexpected(err.to_string()))
    }

    fn decode_authors(raw: &str) -> Vec<String> {
        serde_json::from_str(raw).unwrap_or_default()
    }

    fn to_domain(record: ShelfEntryRecord) -> Result<ShelfEntry, RepositoryError> {
        let status = ReadingStatus::from_str(&record.status).map_err(|()| {
            RepositoryError::unexpected(format!("invalid reading status: {}", record.status))
        })?;

        Ok(ShelfEntry {
            id: ShelfEntryId::new(record.id),
            user_id: UserId::new(record.user_id),
            work_key: record.work_key,
            title: record.title,
            authors: Self::decode_authors(&record.authors),
            cover_url: record.cover_url,
            language: record.language,
            isbn: record.isbn,
            pages: record.pages.map(|pages| pages as u32),
            status,
            rating: record.rating,
            notes: record.notes,
            date_started: record.date_started,
            date_finished: record.date_finished,
            is_private: record.is_private,
            genres: Vec::new(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    async fn with_genres(
        &self,
        records: Vec<ShelfEntryRecord>,
    ) -> Result<Vec<ShelfEntry>, RepositoryError> {
        let ids: Vec<i64> = records.iter().map(|record| record.id).collect();
        let mut tags = load_genre_tags(&self.pool, &ids).await?;

        records
            .into_iter()
            .map(|record| {
                let mut entry = Self::to_domain(record)?;
                entry.genres = tags.remove(&entry.id).unwrap_or_default();
                Ok(entry)
            })
            .collect()
    }
}

#[async_trait]
impl ShelfRepository for SqlShelfRepository {
    async fn insert(
        &self,
        user_id: UserId,
        entry: NewShelfEntry,
    ) -> Result<ShelfEntry, RepositoryError> {
        let authors = Self::encode_authors(&entry.authors)?;
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        let (id,) = query_as::<_, (i64,)>(
            "INSERT INTO shelf_entries (user_id, work_key, title, authors, cover_url, language, \
             isbn, pages, status, rating, notes, date_started, date_finished, is_private, \
             created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(i64::from(user_id))
        .bind(&entry.work_key)
        .bind(&entry.title)
        .bind(&authors)
        .bind(&entry.cover_url)
        .bind(&entry.language)
        .bind(&entry.isbn)
        .bind(entry.pages.map(i64::from))
        .bind(entry.status.as_str())
        .bind(entry.rating)
        .bind(&entry.notes)
        .bind(entry.date_started)
        .bind(entry.date_finished)
        .bind(entry.is_private)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        let id = ShelfEntryId::new(id);
        replace_genre_links(&mut tx, id, &entry.genre_ids).await?;

        tx.commit()
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        self.get(id).await
    }

    async fn get(&self, id: ShelfEntryId) -> Result<ShelfEntry, RepositoryError> {
        let sql = format!("{SELECT_ENTRY} WHERE id = ?");
        let record = query_as::<_, ShelfEntryRecord>(&sql)
            .bind(i64::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        let Some(record) = record else {
            return Err(RepositoryError::NotFound);
        };

        self.with_genres(vec![record])
            .await?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        filter: ShelfFilter,
    ) -> Result<Vec<ShelfEntry>, RepositoryError> {
        let mut builder = QueryBuilder::<DatabaseDriver>::new(SELECT_ENTRY);
        builder.push(" WHERE user_id = ");
        builder.push_bind(i64::from(user_id));
        if let Some(status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        let records = builder
            .build_query_as::<ShelfEntryRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        self.with_genres(records).await
    }

    async fn update(
        &self,
        id: ShelfEntryId,
        changes: UpdateShelfEntry,
    ) -> Result<ShelfEntry, RepositoryError> {
        let rating = changes.stored_rating();
        let notes = changes.stored_notes();
        let authors = changes
            .authors
            .as_deref()
            .map(Self::encode_authors)
            .transpose()?;
        let UpdateShelfEntry {
            title,
            cover_url,
            isbn,
            pages,
            status,
            date_started,
            date_finished,
            is_private,
            genre_ids,
            ..
        } = changes;

        let mut builder = QueryBuilder::<DatabaseDriver>::new("UPDATE shelf_entries SET ");
        let mut sep = false;

        push_update_field!(builder, sep, "title", title.map(|t| t.trim().to_string()));
        push_update_field!(builder, sep, "authors", authors);
        push_update_field!(builder, sep, "cover_url", cover_url);
        push_update_field!(builder, sep, "isbn", isbn);
        push_update_field!(builder, sep, "pages", pages.map(|pages| pages.map(i64::from)));
        push_update_field!(builder, sep, "status", status.map(|s| s.as_str()));
        push_update_field!(builder, sep, "rating", rating);
        push_update_field!(builder, sep, "notes", notes);
        push_update_field!(builder, sep, "date_started", date_started);
        push_update_field!(builder, sep, "date_finished", date_finished);
        push_update_field!(builder, sep, "is_private", is_private);

        if sep {
            builder.push(", ");
        }
        builder.push("updated_at = ");
        builder.push_bind(Utc::now());
        builder.push(" WHERE id = ");
        builder.push_bind(i64::from(id));

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        let result = builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        if let Some(genre_ids) = genre_ids {
            replace_genre_links(&mut tx, id, &genre_ids).await?;
        }

        tx.commit()
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        self.get(id).await
    }

    async fn delete(&self, id: ShelfEntryId) -> Result<(), RepositoryError> {
        let result = query("DELETE FROM shelf_entries WHERE id = ?")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_public_reviews(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<PublicReview>, RepositoryError> {
        let mut builder = QueryBuilder::<DatabaseDriver>::new(
            "SELECT e.id, e.title, e.authors, e.cover_url, e.rating, e.notes, e.created_at, \
             u.username AS reviewer \
             FROM shelf_entries e \
             JOIN users u ON u.id = e.user_id \
             WHERE e.is_private = 0 AND (e.notes IS NOT NULL OR e.rating IS NOT NULL)",
        );

        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term.to_lowercase());
            builder.push(" AND (LOWER(e.title) LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR LOWER(e.authors) LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR LOWER(u.username) LIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
        builder.push(" ORDER BY e.created_at DESC, e.id DESC");

        let records = builder
            .build_query_as::<ReviewRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(records
            .into_iter()
            .map(|record| PublicReview {
                entry_id: ShelfEntryId::new(record.id),
                title: record.title,
                authors: Self::decode_authors(&record.authors),
                cover_url: record.cover_url,
                rating: record.rating,
                notes: record.notes,
                reviewer: record.reviewer,
                created_at: record.created_at,
            })
            .collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ShelfEntryRecord {
    id: i64,
    user_id: i64,
    work_key: Option<String>,
    title: String,
    authors: String,
    cover_url: Option<String>,
    language: Option<String>,
    isbn: Option<String>,
    pages: Option<i64>,
    status: String,
    rating: Option<f64>,
    notes: Option<String>,
    date_started: Option<NaiveDate>,
    date_finished: Option<NaiveDate>,
    is_private: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRecord {
    id: i64,
    title: String,
    authors: String,
    cover_url: Option<String>,
    rating: Option<f64>,
    notes: Option<String>,
    reviewer: String,
    created_at: DateTime<Utc>,
}
