use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::books::authors::{TrackedAuthor, UpcomingRelease};

/// Failure talking to an external book service.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request to {service} failed: {message}")]
    Request {
        service: &'static str,
        message: String,
    },
    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },
    #[error("could not decode {service} response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

/// A work returned by a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogBook {
    /// Work key, e.g. `/works/OL45883W`.
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub isbn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionDetails {
    pub pages: Option<u32>,
    pub isbn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAuthor {
    /// Author key without the `/authors/` prefix, e.g. `OL2658716A`.
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub work_count: u32,
    #[serde(default)]
    pub top_work: Option<String>,
    #[serde(default)]
    pub top_subjects: Vec<String>,
}

/// Strips the leading `/works/` from a work key, leaving the bare identifier.
pub fn work_id(key: &str) -> &str {
    key.trim().trim_start_matches("/works/").trim_matches('/')
}

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn search_books(&self, query: &str) -> Result<Vec<CatalogBook>, CatalogError>;
    async fn edition_details(&self, work_key: &str) -> Result<EditionDetails, CatalogError>;
    async fn search_authors(&self, query: &str) -> Result<Vec<CatalogAuthor>, CatalogError>;
}

/// Source of upcoming releases for tracked authors.
#[async_trait]
pub trait ReleaseFeed: Send + Sync {
    async fn upcoming_for(
        &self,
        author: &TrackedAuthor,
    ) -> Result<Vec<UpcomingRelease>, CatalogError>;
}
