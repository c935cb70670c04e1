use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::ShelfEntryId;

/// A non-private shelf entry with notes or a rating, shown on the public
/// review feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicReview {
    pub entry_id: ShelfEntryId,
    pub title: String,
    pub authors: Vec<String>,
    pub cover_url: Option<String>,
    pub rating: Option<f64>,
    pub notes: Option<String>,
    pub reviewer: String,
    pub created_at: DateTime<Utc>,
}
