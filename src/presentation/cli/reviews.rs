use anyhow::Result;
use clap::{Args, Subcommand};

use super::print_json;
use crate::infrastructure::client::ReadlogClient;

#[derive(Debug, Subcommand)]
pub enum ReviewCommands {
    /// List public reviews
    List(ListReviewsCommand),
}

#[derive(Debug, Args)]
pub struct ListReviewsCommand {
    /// Match title, author or reviewer
    #[arg(long)]
    pub search: Option<String>,
}

pub async fn run(client: &ReadlogClient, cmd: ReviewCommands) -> Result<()> {
    match cmd {
        ReviewCommands::List(c) => {
            let reviews = client.reviews().list(c.search.as_deref()).await?;
            print_json(&reviews)
        }
    }
}
