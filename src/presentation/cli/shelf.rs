use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::macros::{define_delete_command, define_get_command};
use super::{parse_date, parse_status, print_json};
use crate::domain::ids::{GenreId, ShelfEntryId};
use crate::domain::shelf::{CatalogShelfSubmission, NewShelfEntry, UpdateShelfEntry};
use crate::infrastructure::client::ReadlogClient;

#[derive(Debug, Subcommand)]
pub enum ShelfCommands {
    /// Add a book to the shelf
    Add(AddShelfCommand),
    /// List shelf entries
    List(ListShelfCommand),
    /// Get a shelf entry by ID
    Get(GetShelfCommand),
    /// Update a shelf entry
    Update(UpdateShelfCommand),
    /// Delete a shelf entry
    Delete(DeleteShelfCommand),
}

pub async fn run(client: &ReadlogClient, cmd: ShelfCommands) -> Result<()> {
    match cmd {
        ShelfCommands::Add(c) => add_entry(client, c).await,
        ShelfCommands::List(c) => list_entries(client, c).await,
        ShelfCommands::Get(c) => get_entry(client, c).await,
        ShelfCommands::Update(c) => update_entry(client, c).await,
        ShelfCommands::Delete(c) => delete_entry(client, c).await,
    }
}

#[derive(Debug, Args)]
pub struct AddShelfCommand {
    /// Open Library work key; the book is looked up and enriched from the catalog
    #[arg(long, conflicts_with_all = ["title", "author"])]
    pub work: Option<String>,
    #[arg(long, required_unless_present = "work")]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Vec<String>,
    #[arg(long, default_value = "want_to_read")]
    pub status: String,
    #[arg(long)]
    pub rating: Option<f64>,
    #[arg(long)]
    pub pages: Option<u32>,
    #[arg(long)]
    pub isbn: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Date started (YYYY-MM-DD)
    #[arg(long)]
    pub started: Option<String>,
    /// Date finished (YYYY-MM-DD)
    #[arg(long)]
    pub finished: Option<String>,
    #[arg(long)]
    pub private: bool,
    #[arg(long = "genre-id")]
    pub genre_ids: Vec<i64>,
}

pub async fn add_entry(client: &ReadlogClient, command: AddShelfCommand) -> Result<()> {
    let status = parse_status(&command.status)?;
    let date_started = command.started.as_deref().map(parse_date).transpose()?;
    let date_finished = command.finished.as_deref().map(parse_date).transpose()?;
    let genre_ids: Vec<GenreId> = command.genre_ids.into_iter().map(GenreId::new).collect();

    let entry = if let Some(work) = command.work {
        let book = client
            .catalog()
            .search_books(&work)
            .await?
            .into_iter()
            .find(|book| book.key.ends_with(work.trim()))
            .ok_or_else(|| anyhow::anyhow!("work '{work}' not found in the catalog"))?;

        let submission = CatalogShelfSubmission {
            book,
            status,
            rating: command.rating,
            notes: command.notes,
            pages: command.pages,
            isbn: command.isbn,
            date_started,
            date_finished,
            is_private: command.private,
            genre_ids,
        };
        client.shelf().create_from_catalog(&submission).await?
    } else {
        let payload = NewShelfEntry {
            title: command.title.unwrap_or_default(),
            authors: command.author,
            status,
            rating: command.rating,
            notes: command.notes,
            pages: command.pages,
            isbn: command.isbn,
            date_started,
            date_finished,
            is_private: command.private,
            genre_ids,
            ..NewShelfEntry::default()
        };
        client.shelf().create(&payload).await?
    };

    print_json(&entry)
}

#[derive(Debug, Args)]
pub struct ListShelfCommand {
    /// Only entries with this status
    #[arg(long)]
    pub status: Option<String>,
}

pub async fn list_entries(client: &ReadlogClient, command: ListShelfCommand) -> Result<()> {
    let status = command.status.as_deref().map(parse_status).transpose()?;
    let entries = client.shelf().list(status).await?;
    print_json(&entries)
}

define_get_command!(GetShelfCommand, get_entry, ShelfEntryId, shelf);

#[derive(Debug, Args)]
pub struct UpdateShelfCommand {
    #[arg(long)]
    pub id: i64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    /// 0 clears the rating
    #[arg(long)]
    pub rating: Option<f64>,
    #[arg(long)]
    pub pages: Option<u32>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, conflicts_with = "clear_started")]
    pub started: Option<String>,
    #[arg(long, conflicts_with = "clear_finished")]
    pub finished: Option<String>,
    /// Removes the start date
    #[arg(long)]
    pub clear_started: bool,
    /// Removes the finish date, taking the entry out of statistics
    #[arg(long)]
    pub clear_finished: bool,
    #[arg(long)]
    pub private: Option<bool>,
    /// Replaces all genres of the entry
    #[arg(long = "genre-id")]
    pub genre_ids: Option<Vec<i64>>,
}

fn date_change(value: Option<&str>, clear: bool) -> Result<Option<Option<NaiveDate>>> {
    if clear {
        return Ok(Some(None));
    }
    value.map(|value| parse_date(value).map(Some)).transpose()
}

pub async fn update_entry(client: &ReadlogClient, command: UpdateShelfCommand) -> Result<()> {
    let payload = UpdateShelfEntry {
        title: command.title,
        status: command.status.as_deref().map(parse_status).transpose()?,
        rating: command.rating,
        pages: command.pages.map(Some),
        notes: command.notes,
        date_started: date_change(command.started.as_deref(), command.clear_started)?,
        date_finished: date_change(command.finished.as_deref(), command.clear_finished)?,
        is_private: command.private,
        genre_ids: command
            .genre_ids
            .map(|ids| ids.into_iter().map(GenreId::new).collect()),
        ..UpdateShelfEntry::default()
    };

    let entry = client
        .shelf()
        .update(ShelfEntryId::new(command.id), &payload)
        .await?;
    print_json(&entry)
}

define_delete_command!(DeleteShelfCommand, delete_entry, ShelfEntryId, shelf, "shelf entry");
