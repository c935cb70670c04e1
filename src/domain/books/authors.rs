use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::ids::{TrackedAuthorId, UserId};

/// An author a user follows for release notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedAuthor {
    pub id: TrackedAuthorId,
    pub user_id: UserId,
    pub author_key: String,
    pub name: String,
    pub work_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrackedAuthor {
    pub author_key: String,
    pub name: String,
    #[serde(default)]
    pub work_count: u32,
}

impl NewTrackedAuthor {
    pub fn normalize(mut self) -> Self {
        self.author_key = self
            .author_key
            .trim()
            .trim_start_matches("/authors/")
            .to_string();
        self.name = self.name.trim().to_string();
        self
    }
}

/// Serialized in snake_case; feeds may send any casing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    Announced,
    Confirmed,
    Available,
}

impl FromStr for ReleaseStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "announced" => Ok(ReleaseStatus::Announced),
            "confirmed" => Ok(ReleaseStatus::Confirmed),
            "available" => Ok(ReleaseStatus::Available),
            _ => Err(()),
        }
    }
}

impl<'de> Deserialize<'de> for ReleaseStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.trim().parse().map_err(|()| {
            serde::de::Error::unknown_variant(&value, &["announced", "confirmed", "available"])
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingRelease {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub status: ReleaseStatus,
}

impl UpcomingRelease {
    /// Orders by year, then title.
    pub fn chronological(a: &Self, b: &Self) -> Ordering {
        a.year.cmp(&b.year).then_with(|| a.title.cmp(&b.title))
    }
}
