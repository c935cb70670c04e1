use anyhow::Result;
use clap::{Args, Subcommand};

use super::print_json;
use crate::domain::authors::NewTrackedAuthor;
use crate::domain::ids::TrackedAuthorId;
use crate::infrastructure::client::ReadlogClient;

#[derive(Debug, Subcommand)]
pub enum AuthorCommands {
    /// Start tracking an author
    Track(TrackAuthorCommand),
    /// List tracked authors
    List,
    /// Stop tracking an author
    Untrack(UntrackAuthorCommand),
    /// Upcoming releases from tracked authors
    Upcoming,
}

pub async fn run(client: &ReadlogClient, cmd: AuthorCommands) -> Result<()> {
    match cmd {
        AuthorCommands::Track(c) => track_author(client, c).await,
        AuthorCommands::List => print_json(&client.authors().list().await?),
        AuthorCommands::Untrack(c) => untrack_author(client, c).await,
        AuthorCommands::Upcoming => print_json(&client.authors().upcoming().await?),
    }
}

#[derive(Debug, Args)]
pub struct TrackAuthorCommand {
    /// Open Library author key, e.g. OL2658716A
    #[arg(long)]
    pub key: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value_t = 0)]
    pub work_count: u32,
}

pub async fn track_author(client: &ReadlogClient, command: TrackAuthorCommand) -> Result<()> {
    let payload = NewTrackedAuthor {
        author_key: command.key,
        name: command.name,
        work_count: command.work_count,
    };
    let tracked = client.authors().track(&payload).await?;
    print_json(&tracked)
}

#[derive(Debug, Args)]
pub struct UntrackAuthorCommand {
    #[arg(long)]
    pub id: i64,
}

pub async fn untrack_author(client: &ReadlogClient, command: UntrackAuthorCommand) -> Result<()> {
    client
        .authors()
        .untrack(TrackedAuthorId::new(command.id))
        .await?;
    eprintln!("Stopped tracking author {}.", command.id);
    Ok(())
}
