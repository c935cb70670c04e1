use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::authors::{NewTrackedAuthor, TrackedAuthor};
use crate::domain::genres::{Genre, NewGenre, UpdateGenre};
use crate::domain::ids::{GenreId, ShelfEntryId, TokenId, TrackedAuthorId, UserId};
use crate::domain::reviews::PublicReview;
use crate::domain::shelf::{NewShelfEntry, ShelfEntry, ShelfFilter, UpdateShelfEntry};
use crate::domain::stats::CompletedBookRecord;
use crate::domain::tokens::{NewToken, Token};
use crate::domain::users::{NewUser, User};

#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn insert(&self, genre: NewGenre) -> Result<Genre, RepositoryError>;
    async fn get(&self, id: GenreId) -> Result<Genre, RepositoryError>;
    async fn get_by_name(&self, name: &str) -> Result<Genre, RepositoryError>;
    /// All genres ordered by name.
    async fn list(&self) -> Result<Vec<Genre>, RepositoryError>;
    async fn update(&self, id: GenreId, changes: UpdateGenre) -> Result<Genre, RepositoryError>;
    async fn delete(&self, id: GenreId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ShelfRepository: Send + Sync {
    /// Inserts the entry and links `entry.genre_ids` in one transaction.
    async fn insert(
        &self,
        user_id: UserId,
        entry: NewShelfEntry,
    ) -> Result<ShelfEntry, RepositoryError>;
    async fn get(&self, id: ShelfEntryId) -> Result<ShelfEntry, RepositoryError>;
    /// Entries owned by `user_id`, newest first.
    async fn list_by_user(
        &self,
        user_id: UserId,
        filter: ShelfFilter,
    ) -> Result<Vec<ShelfEntry>, RepositoryError>;
    /// Applies field changes and, when `changes.genre_ids` is set, replaces
    /// the entry's genre links.
    async fn update(
        &self,
        id: ShelfEntryId,
        changes: UpdateShelfEntry,
    ) -> Result<ShelfEntry, RepositoryError>;
    async fn delete(&self, id: ShelfEntryId) -> Result<(), RepositoryError>;
    /// Non-private entries with notes or a rating, newest first.
    async fn list_public_reviews(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<PublicReview>, RepositoryError>;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Entries of `user_id` that have a completion date, with their genres.
    async fn completed_records(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CompletedBookRecord>, RepositoryError>;
}

#[async_trait]
pub trait TrackedAuthorRepository: Send + Sync {
    async fn insert(
        &self,
        user_id: UserId,
        author: NewTrackedAuthor,
    ) -> Result<TrackedAuthor, RepositoryError>;
    async fn get(&self, id: TrackedAuthorId) -> Result<TrackedAuthor, RepositoryError>;
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<TrackedAuthor>, RepositoryError>;
    async fn delete(&self, id: TrackedAuthorId) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn get(&self, id: UserId) -> Result<User, RepositoryError>;
    async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError>;
    async fn exists(&self) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn insert(&self, token: NewToken) -> Result<Token, RepositoryError>;
    async fn get(&self, id: TokenId) -> Result<Token, RepositoryError>;
    async fn get_by_token_hash(&self, token_hash: &str) -> Result<Token, RepositoryError>;
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Token>, RepositoryError>;
    async fn update_last_used(&self, id: TokenId) -> Result<(), RepositoryError>;
    async fn revoke(&self, id: TokenId) -> Result<(), RepositoryError>;
}
