pub mod authors;
pub mod genres;
mod macros;
pub mod reviews;
pub mod search;
pub mod shelf;
pub mod stats;
pub mod tokens;

use std::net::SocketAddr;

use chrono::NaiveDate;

use authors::AuthorCommands;
use clap::{Args, Parser, Subcommand};
use genres::GenreCommands;
use reviews::ReviewCommands;
use search::SearchCommands;
use shelf::ShelfCommands;
use stats::StatsCommands;
use tokens::{TokenCommands, UserCommands};

use crate::domain::shelf::ReadingStatus;
use crate::infrastructure::catalog::OPEN_LIBRARY_URL;

#[derive(Debug, Parser)]
#[command(author, version, about = "Track your reading and chart it month by month", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "READLOG_URL",
        default_value = "http://localhost:3000"
    )]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Manage your shelf
    Shelf {
        #[command(subcommand)]
        command: ShelfCommands,
    },

    /// Manage genres
    Genre {
        #[command(subcommand)]
        command: GenreCommands,
    },

    /// Search the book catalog
    Search {
        #[command(subcommand)]
        command: SearchCommands,
    },

    /// Reading statistics
    Stats {
        #[command(subcommand)]
        command: StatsCommands,
    },

    /// Track authors and their upcoming releases
    Author {
        #[command(subcommand)]
        command: AuthorCommands,
    },

    /// Browse public reviews
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Manage users (admin)
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    #[arg(
        long,
        env = "READLOG_DATABASE_URL",
        default_value = "sqlite://readlog.db"
    )]
    pub database_url: String,

    #[arg(long, env = "READLOG_BIND_ADDRESS", default_value = "127.0.0.1:3000")]
    pub bind_address: SocketAddr,

    #[arg(long, env = "READLOG_CATALOG_URL", default_value = OPEN_LIBRARY_URL)]
    pub catalog_url: String,

    /// Base URL of the release notification service
    #[arg(long, env = "READLOG_RELEASES_URL")]
    pub releases_url: Option<String>,
}

pub fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date '{value}': expected YYYY-MM-DD"))
}

pub fn parse_status(value: &str) -> anyhow::Result<ReadingStatus> {
    value.parse::<ReadingStatus>().map_err(|()| {
        anyhow::anyhow!("invalid status '{value}': expected want_to_read, reading or read")
    })
}

pub(crate) fn print_json<T>(value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
