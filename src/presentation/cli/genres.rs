use anyhow::Result;
use clap::{Args, Subcommand};

use super::macros::define_delete_command;
use super::print_json;
use crate::domain::genres::{NewGenre, UpdateGenre};
use crate::domain::ids::GenreId;
use crate::infrastructure::client::ReadlogClient;

#[derive(Debug, Subcommand)]
pub enum GenreCommands {
    /// Add a new genre
    Add(AddGenreCommand),
    /// List all genres
    List,
    /// Update a genre
    Update(UpdateGenreCommand),
    /// Delete a genre
    Delete(DeleteGenreCommand),
}

pub async fn run(client: &ReadlogClient, cmd: GenreCommands) -> Result<()> {
    match cmd {
        GenreCommands::Add(c) => add_genre(client, c).await,
        GenreCommands::List => list_genres(client).await,
        GenreCommands::Update(c) => update_genre(client, c).await,
        GenreCommands::Delete(c) => delete_genre(client, c).await,
    }
}

#[derive(Debug, Args)]
pub struct AddGenreCommand {
    #[arg(long)]
    pub name: String,
    /// Mark the genre as fiction
    #[arg(long)]
    pub fiction: bool,
}

pub async fn add_genre(client: &ReadlogClient, command: AddGenreCommand) -> Result<()> {
    let payload = NewGenre {
        name: command.name,
        fiction: command.fiction,
    };

    let genre = client.genres().create(&payload).await?;
    print_json(&genre)
}

pub async fn list_genres(client: &ReadlogClient) -> Result<()> {
    let genres = client.genres().list().await?;
    print_json(&genres)
}

#[derive(Debug, Args)]
pub struct UpdateGenreCommand {
    #[arg(long)]
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub fiction: Option<bool>,
}

pub async fn update_genre(client: &ReadlogClient, command: UpdateGenreCommand) -> Result<()> {
    let payload = UpdateGenre {
        name: command.name,
        fiction: command.fiction,
    };

    let genre = client
        .genres()
        .update(GenreId::new(command.id), &payload)
        .await?;
    print_json(&genre)
}

define_delete_command!(DeleteGenreCommand, delete_genre, GenreId, genres, "genre");
