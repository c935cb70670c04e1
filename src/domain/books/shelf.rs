use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::domain::books::genres::GenreTag;
use crate::domain::catalog::{CatalogBook, EditionDetails};
use crate::domain::ids::{GenreId, ShelfEntryId, UserId};

pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    #[default]
    WantToRead,
    Reading,
    Read,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "want_to_read",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Read => "read",
        }
    }
}

impl FromStr for ReadingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "want_to_read" => Ok(ReadingStatus::WantToRead),
            "reading" => Ok(ReadingStatus::Reading),
            "read" => Ok(ReadingStatus::Read),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShelfEntryError {
    #[error("title must not be empty")]
    BlankTitle,
    #[error("rating must be between 0 and 5, got {0}")]
    RatingOutOfRange(f64),
    #[error("date finished ({finished}) is before date started ({started})")]
    FinishedBeforeStarted {
        started: NaiveDate,
        finished: NaiveDate,
    },
}

fn check_rating(rating: Option<f64>) -> Result<(), ShelfEntryError> {
    match rating {
        Some(value) if !(0.0..=MAX_RATING).contains(&value) => {
            Err(ShelfEntryError::RatingOutOfRange(value))
        }
        _ => Ok(()),
    }
}

fn check_dates(
    started: Option<NaiveDate>,
    finished: Option<NaiveDate>,
) -> Result<(), ShelfEntryError> {
    match (started, finished) {
        (Some(started), Some(finished)) if finished < started => {
            Err(ShelfEntryError::FinishedBeforeStarted { started, finished })
        }
        _ => Ok(()),
    }
}

/// A book on a user's shelf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfEntry {
    pub id: ShelfEntryId,
    pub user_id: UserId,
    pub work_key: Option<String>,
    pub title: String,
    pub authors: Vec<String>,
    pub cover_url: Option<String>,
    pub language: Option<String>,
    pub isbn: Option<String>,
    pub pages: Option<u32>,
    pub status: ReadingStatus,
    pub rating: Option<f64>,
    pub notes: Option<String>,
    pub date_started: Option<NaiveDate>,
    pub date_finished: Option<NaiveDate>,
    pub is_private: bool,
    pub genres: Vec<GenreTag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewShelfEntry {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub work_key: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub status: ReadingStatus,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub date_started: Option<NaiveDate>,
    #[serde(default)]
    pub date_finished: Option<NaiveDate>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
}

impl NewShelfEntry {
    /// Trims text fields and drops empty optional strings.
    pub fn normalize(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.authors = self
            .authors
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        self.work_key = non_blank(self.work_key);
        self.cover_url = non_blank(self.cover_url);
        self.language = non_blank(self.language);
        self.isbn = non_blank(self.isbn);
        self.notes = non_blank(self.notes);
        self.genre_ids.sort_unstable();
        self.genre_ids.dedup();
        self
    }

    pub fn validate(&self) -> Result<(), ShelfEntryError> {
        if self.title.trim().is_empty() {
            return Err(ShelfEntryError::BlankTitle);
        }
        check_rating(self.rating)?;
        check_dates(self.date_started, self.date_finished)
    }
}

/// Partial update of a shelf entry. For the clearable columns `None` leaves
/// the value alone and `Some(None)`, sent as an explicit JSON `null`, clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateShelfEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub isbn: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub pages: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReadingStatus>,
    /// `0` clears the rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// An empty string clears the notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_started: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_finished: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    /// When present, replaces every genre link of the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_ids: Option<Vec<GenreId>>,
}

/// A present field, `null` included, becomes `Some`. Absent fields fall back
/// to `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateShelfEntry {
    /// Blank strings and a zero page count clear their column.
    pub fn normalize(mut self) -> Self {
        self.cover_url = self.cover_url.map(non_blank);
        self.isbn = self.isbn.map(non_blank);
        self.pages = self.pages.map(|pages| pages.filter(|&p| p > 0));
        if let Some(genre_ids) = self.genre_ids.as_mut() {
            genre_ids.sort_unstable();
            genre_ids.dedup();
        }
        self
    }

    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.authors.is_some()
            || self.cover_url.is_some()
            || self.isbn.is_some()
            || self.pages.is_some()
            || self.status.is_some()
            || self.rating.is_some()
            || self.notes.is_some()
            || self.date_started.is_some()
            || self.date_finished.is_some()
            || self.is_private.is_some()
            || self.genre_ids.is_some()
    }

    /// Validates the changes as they would apply on top of `current`.
    pub fn validate_against(&self, current: &ShelfEntry) -> Result<(), ShelfEntryError> {
        if self.title.as_ref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ShelfEntryError::BlankTitle);
        }
        check_rating(self.rating)?;
        check_dates(
            self.date_started.unwrap_or(current.date_started),
            self.date_finished.unwrap_or(current.date_finished),
        )
    }

    /// The rating to store: `Some(None)` clears it.
    pub fn stored_rating(&self) -> Option<Option<f64>> {
        self.rating.map(|rating| (rating.abs() > 0.0).then_some(rating))
    }

    /// The notes to store: `Some(None)` clears them.
    pub fn stored_notes(&self) -> Option<Option<String>> {
        self.notes.clone().map(|notes| non_blank(Some(notes)))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ShelfFilter {
    #[serde(default)]
    pub status: Option<ReadingStatus>,
}

/// Adds a catalog search result to the shelf, with the shelf metadata the
/// user picked in the add form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogShelfSubmission {
    pub book: CatalogBook,
    #[serde(default)]
    pub status: ReadingStatus,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub date_started: Option<NaiveDate>,
    #[serde(default)]
    pub date_finished: Option<NaiveDate>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
}

impl CatalogShelfSubmission {
    /// Builds the entry to insert. Pages and ISBN come from the submission
    /// first, then the edition details, then the search result.
    pub fn into_new_entry(self, edition: Option<&EditionDetails>) -> NewShelfEntry {
        let edition_pages = edition.and_then(|e| e.pages);
        let edition_isbn = edition.and_then(|e| e.isbn.clone());

        NewShelfEntry {
            title: self.book.title,
            authors: self.book.authors,
            work_key: Some(self.book.key),
            cover_url: self.book.cover_url,
            language: non_blank(Some(self.book.language)),
            isbn: non_blank(self.isbn)
                .or(edition_isbn)
                .or_else(|| non_blank(Some(self.book.isbn))),
            pages: self.pages.or(edition_pages),
            status: self.status,
            rating: self.rating,
            notes: self.notes,
            date_started: self.date_started,
            date_finished: self.date_finished,
            is_private: self.is_private,
            genre_ids: self.genre_ids,
        }
        .normalize()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
