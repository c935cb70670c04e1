use anyhow::Result;
use clap::{Args, Subcommand};

use super::print_json;
use crate::infrastructure::client::ReadlogClient;

#[derive(Debug, Subcommand)]
pub enum SearchCommands {
    /// Search books by title, author or ISBN
    Books(SearchQueryCommand),
    /// Search authors by name
    Authors(SearchQueryCommand),
}

#[derive(Debug, Args)]
pub struct SearchQueryCommand {
    pub query: String,
}

pub async fn run(client: &ReadlogClient, cmd: SearchCommands) -> Result<()> {
    match cmd {
        SearchCommands::Books(c) => print_json(&client.catalog().search_books(&c.query).await?),
        SearchCommands::Authors(c) => {
            print_json(&client.catalog().search_authors(&c.query).await?)
        }
    }
}
