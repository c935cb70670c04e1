use anyhow::Result;
use clap::Parser;
use readlog::application::{ServerConfig, serve};
use readlog::infrastructure::client::ReadlogClient;
use readlog::presentation::cli::{
    Cli, Commands, ServeCommand, authors, genres, reviews, search, shelf, stats, tokens,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    let client = || ReadlogClient::from_base_url(&cli.api_url);

    match cli.command {
        Commands::Serve(cmd) => run_server(cmd).await,
        Commands::Shelf { command } => shelf::run(&client()?, command).await,
        Commands::Genre { command } => genres::run(&client()?, command).await,
        Commands::Search { command } => search::run(&client()?, command).await,
        Commands::Stats { command } => stats::run(&client()?, command).await,
        Commands::Author { command } => authors::run(&client()?, command).await,
        Commands::Review { command } => reviews::run(&client()?, command).await,
        Commands::Token { command } => tokens::run(&client()?, command).await,
        Commands::User { command } => tokens::run_users(&client()?, command).await,
    }
}

async fn run_server(command: ServeCommand) -> Result<()> {
    let config = ServerConfig {
        bind_address: command.bind_address,
        database_url: command.database_url,
        catalog_url: command.catalog_url,
        releases_url: command.releases_url.filter(|url| !url.trim().is_empty()),
    };

    serve(config).await
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if logging cannot be initialized
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}
