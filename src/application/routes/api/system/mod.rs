pub(crate) mod admin;
pub(crate) mod health;
