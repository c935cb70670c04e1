pub mod authors;
pub mod genres;
pub mod reviews;
pub mod shelf;
