pub mod analytics;
pub mod auth;
pub mod books;
pub mod catalog;
pub mod errors;
pub mod ids;
pub mod repositories;

// Re-exports
pub use analytics::stats;
pub use auth::{tokens, users};
pub use books::{authors, genres, reviews, shelf};
pub use errors::RepositoryError;
