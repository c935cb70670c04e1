use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::application::errors::AppError;
use crate::domain::authors::{NewTrackedAuthor, TrackedAuthor, UpcomingRelease};
use crate::domain::catalog::ReleaseFeed;
use crate::domain::ids::{TrackedAuthorId, UserId};
use crate::domain::repositories::TrackedAuthorRepository;

#[derive(Clone)]
pub struct AuthorTrackingService {
    authors: Arc<dyn TrackedAuthorRepository>,
    feed: Arc<dyn ReleaseFeed>,
}

impl AuthorTrackingService {
    pub fn new(authors: Arc<dyn TrackedAuthorRepository>, feed: Arc<dyn ReleaseFeed>) -> Self {
        Self { authors, feed }
    }

    pub async fn track(
        &self,
        user_id: UserId,
        author: NewTrackedAuthor,
    ) -> Result<TrackedAuthor, AppError> {
        let author = author.normalize();
        if author.author_key.is_empty() || author.name.is_empty() {
            return Err(AppError::validation("author key and name are required"));
        }

        let tracked = self.authors.insert(user_id, author).await?;
        info!(tracked_author_id = %tracked.id, author_key = %tracked.author_key, "author tracked");
        Ok(tracked)
    }

    pub async fn list(&self, user_id: UserId) -> Result<Vec<TrackedAuthor>, AppError> {
        Ok(self.authors.list_by_user(user_id).await?)
    }

    pub async fn untrack(&self, user_id: UserId, id: TrackedAuthorId) -> Result<(), AppError> {
        let tracked = self.authors.get(id).await?;
        if tracked.user_id != user_id {
            return Err(AppError::NotFound);
        }
        self.authors.delete(id).await?;
        info!(tracked_author_id = %id, "author untracked");
        Ok(())
    }

    /// Queries the release feed for every tracked author at once. Authors
    /// whose lookup fails are left out.
    pub async fn upcoming(&self, user_id: UserId) -> Result<Vec<UpcomingRelease>, AppError> {
        let authors = self.authors.list_by_user(user_id).await?;

        let lookups = authors.iter().map(|author| async move {
            (author, self.feed.upcoming_for(author).await)
        });

        let mut releases = Vec::new();
        for (author, result) in join_all(lookups).await {
            match result {
                Ok(mut found) => releases.append(&mut found),
                Err(err) => {
                    warn!(error = %err, author_key = %author.author_key, "release lookup failed");
                }
            }
        }

        releases.sort_by(UpcomingRelease::chronological);
        Ok(releases)
    }
}
