pub(crate) mod authors;
pub(crate) mod genres;
pub(crate) mod reviews;
pub(crate) mod shelf;
