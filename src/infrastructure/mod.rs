pub mod auth;
pub mod catalog;
pub mod client;
pub mod database;
pub mod releases;
pub mod repositories;
