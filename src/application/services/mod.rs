mod authors;
mod shelf;
mod stats;
mod tokens;

pub use authors::AuthorTrackingService;
pub use shelf::ShelfService;
pub use stats::StatsService;
pub use tokens::TokenService;
