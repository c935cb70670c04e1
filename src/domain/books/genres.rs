use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::GenreId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    pub fiction: bool,
    pub created_at: DateTime<Utc>,
}

impl Genre {
    pub fn tag(&self) -> GenreTag {
        GenreTag {
            id: self.id,
            name: self.name.clone(),
            fiction: self.fiction,
        }
    }
}

/// Compact genre reference carried by shelf entries and statistics records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreTag {
    pub id: GenreId,
    pub name: String,
    pub fiction: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGenre {
    pub name: String,
    #[serde(default)]
    pub fiction: bool,
}

impl NewGenre {
    pub fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGenre {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiction: Option<bool>,
}

impl UpdateGenre {
    pub fn normalize(mut self) -> Self {
        self.name = self.name.map(|name| name.trim().to_string());
        self
    }

    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.fiction.is_some()
    }
}
