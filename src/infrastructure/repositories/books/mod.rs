pub(crate) mod genre_links;
pub mod genres;
pub mod shelf;
pub mod tracked_authors;
