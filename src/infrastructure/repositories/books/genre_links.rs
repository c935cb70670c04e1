//! Shared loading and replacement of `shelf_entry_genres` links.

use std::collections::HashMap;

use sqlx::{QueryBuilder, SqliteConnection, query};

use crate::domain::RepositoryError;
use crate::domain::genres::GenreTag;
use crate::domain::ids::{GenreId, ShelfEntryId};
use crate::infrastructure::database::{DatabaseDriver, DatabasePool};

#[derive(Debug, sqlx::FromRow)]
struct GenreLinkRecord {
    shelf_entry_id: i64,
    genre_id: i64,
    name: String,
    fiction: bool,
}

/// Genre tags for each of `entry_ids`, ordered by genre name.
pub(crate) async fn load_genre_tags(
    pool: &DatabasePool,
    entry_ids: &[i64],
) -> Result<HashMap<ShelfEntryId, Vec<GenreTag>>, RepositoryError> {
    let mut tags: HashMap<ShelfEntryId, Vec<GenreTag>> = HashMap::new();
    if entry_ids.is_empty() {
        return Ok(tags);
    }

    let mut builder = QueryBuilder::<DatabaseDriver>::new(
        "SELECT seg.shelf_entry_id, g.id AS genre_id, g.name, g.fiction \
         FROM shelf_entry_genres seg \
         JOIN genres g ON g.id = seg.genre_id \
         WHERE seg.shelf_entry_id IN (",
    );
    let mut separated = builder.separated(", ");
    for id in entry_ids {
        separated.push_bind(*id);
    }
    builder.push(") ORDER BY LOWER(g.name)");

    let records = builder
        .build_query_as::<GenreLinkRecord>()
        .fetch_all(pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

    for record in records {
        tags.entry(ShelfEntryId::new(record.shelf_entry_id))
            .or_default()
            .push(GenreTag {
                id: GenreId::new(record.genre_id),
                name: record.name,
                fiction: record.fiction,
            });
    }
    Ok(tags)
}

/// Replaces every genre link of `entry_id` with `genre_ids`.
pub(crate) async fn replace_genre_links(
    conn: &mut SqliteConnection,
    entry_id: ShelfEntryId,
    genre_ids: &[GenreId],
) -> Result<(), RepositoryError> {
    query("DELETE FROM shelf_entry_genres WHERE shelf_entry_id = ?")
        .bind(i64::from(entry_id))
        .execute(&mut *conn)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

    for genre_id in genre_ids {
        query("INSERT OR IGNORE INTO shelf_entry_genres (shelf_entry_id, genre_id) VALUES (?, ?)")
            .bind(i64::from(entry_id))
            .bind(i64::from(*genre_id))
            .execute(&mut *conn)
            .await
            .map_err(|err| {
                if let sqlx::Error::Database(db_err) = &err
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::NotFound;
                }
                RepositoryError::unexpected(err.to_string())
            })?;
    }
    Ok(())
}
