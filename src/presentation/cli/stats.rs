use anyhow::Result;
use clap::{Args, Subcommand};

use super::print_json;
use crate::domain::stats::{FilterCriteria, MonthKey};
use crate::infrastructure::client::ReadlogClient;

#[derive(Debug, Subcommand)]
pub enum StatsCommands {
    /// Month-by-month chart data for finished books
    Monthly(MonthlyStatsCommand),
}

pub async fn run(client: &ReadlogClient, cmd: StatsCommands) -> Result<()> {
    match cmd {
        StatsCommands::Monthly(c) => monthly(client, c).await,
    }
}

#[derive(Debug, Args)]
pub struct MonthlyStatsCommand {
    /// count, pages or rating
    #[arg(long, default_value = "count")]
    pub metric: String,
    /// Keep books tagged with any of these genres
    #[arg(long)]
    pub genre: Vec<String>,
    /// all, fiction or nonfiction
    #[arg(long, default_value = "all")]
    pub fiction: String,
    /// First month (YYYY-MM)
    #[arg(long)]
    pub start: Option<String>,
    /// Last month (YYYY-MM)
    #[arg(long)]
    pub end: Option<String>,
}

pub async fn monthly(client: &ReadlogClient, command: MonthlyStatsCommand) -> Result<()> {
    let parse_month = |raw: &String| raw.parse::<MonthKey>();
    let criteria = FilterCriteria {
        genres: command.genre.into_iter().collect(),
        fiction: command.fiction.parse()?,
        start: command.start.as_ref().map(parse_month).transpose()?,
        end: command.end.as_ref().map(parse_month).transpose()?,
    };

    let chart = client
        .stats()
        .monthly(&criteria, command.metric.parse()?)
        .await?;
    print_json(&chart)
}
