use std::sync::Arc;

use tracing::{info, warn};

use crate::application::errors::AppError;
use crate::domain::RepositoryError;
use crate::domain::catalog::CatalogProvider;
use crate::domain::ids::{GenreId, ShelfEntryId, UserId};
use crate::domain::repositories::{GenreRepository, ShelfRepository};
use crate::domain::shelf::{
    CatalogShelfSubmission, NewShelfEntry, ShelfEntry, ShelfFilter, UpdateShelfEntry,
};

/// Shelf workflow: validation, catalog enrichment, genre linking and
/// ownership checks around the shelf repository.
#[derive(Clone)]
pub struct ShelfService {
    shelf: Arc<dyn ShelfRepository>,
    genres: Arc<dyn GenreRepository>,
    catalog: Arc<dyn CatalogProvider>,
}

impl ShelfService {
    pub fn new(
        shelf: Arc<dyn ShelfRepository>,
        genres: Arc<dyn GenreRepository>,
        catalog: Arc<dyn CatalogProvider>,
    ) -> Self {
        Self {
            shelf,
            genres,
            catalog,
        }
    }

    pub async fn add(&self, user_id: UserId, entry: NewShelfEntry) -> Result<ShelfEntry, AppError> {
        let entry = entry.normalize();
        entry.validate()?;
        self.ensure_genres_exist(&entry.genre_ids).await?;

        let created = self.shelf.insert(user_id, entry).await?;
        info!(entry_id = %created.id, %user_id, title = %created.title, "shelf entry created");
        Ok(created)
    }

    /// Looks up edition details for the submitted work before adding it. A
    /// failed lookup only costs the enrichment.
    pub async fn add_from_catalog(
        &self,
        user_id: UserId,
        submission: CatalogShelfSubmission,
    ) -> Result<ShelfEntry, AppError> {
        let work_key = submission.book.key.trim().to_string();
        let edition = if work_key.is_empty() {
            None
        } else {
            match self.catalog.edition_details(&work_key).await {
                Ok(details) => Some(details),
                Err(err) => {
                    warn!(error = %err, %work_key, "edition enrichment failed, using search result");
                    None
                }
            }
        };

        self.add(user_id, submission.into_new_entry(edition.as_ref()))
            .await
    }

    pub async fn list(
        &self,
        user_id: UserId,
        filter: ShelfFilter,
    ) -> Result<Vec<ShelfEntry>, AppError> {
        Ok(self.shelf.list_by_user(user_id, filter).await?)
    }

    /// Entries of other users are reported as missing.
    pub async fn get_owned(
        &self,
        user_id: UserId,
        id: ShelfEntryId,
    ) -> Result<ShelfEntry, AppError> {
        let entry = self.shelf.get(id).await?;
        if entry.user_id != user_id {
            return Err(AppError::NotFound);
        }
        Ok(entry)
    }

    pub async fn update(
        &self,
        user_id: UserId,
        id: ShelfEntryId,
        changes: UpdateShelfEntry,
    ) -> Result<ShelfEntry, AppError> {
        if !changes.has_changes() {
            return Err(AppError::validation("no changes provided"));
        }
        let changes = changes.normalize();

        let current = self.get_owned(user_id, id).await?;
        changes.validate_against(&current)?;
        if let Some(genre_ids) = &changes.genre_ids {
            self.ensure_genres_exist(genre_ids).await?;
        }

        let updated = self.shelf.update(id, changes).await?;
        info!(entry_id = %id, "shelf entry updated");
        Ok(updated)
    }

    pub async fn delete(&self, user_id: UserId, id: ShelfEntryId) -> Result<(), AppError> {
        self.get_owned(user_id, id).await?;
        self.shelf.delete(id).await?;
        info!(entry_id = %id, "shelf entry deleted");
        Ok(())
    }

    async fn ensure_genres_exist(&self, genre_ids: &[GenreId]) -> Result<(), AppError> {
        for genre_id in genre_ids {
            match self.genres.get(*genre_id).await {
                Ok(_) => {}
                Err(RepositoryError::NotFound) => {
                    return Err(AppError::validation(format!("unknown genre id {genre_id}")));
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
