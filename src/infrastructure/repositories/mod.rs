pub mod analytics;
pub mod auth;
pub mod books;
pub(crate) mod macros;

// Re-exports
pub use analytics::stats;
pub use auth::{tokens, users};
pub use books::{genres, shelf, tracked_authors};
