use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::application::services::{
    AuthorTrackingService, ShelfService, StatsService, TokenService,
};
use crate::domain::catalog::{CatalogProvider, ReleaseFeed};
use crate::domain::repositories::{
    GenreRepository, ShelfRepository, StatsRepository, TokenRepository, TrackedAuthorRepository,
    UserRepository,
};
use crate::infrastructure::catalog::OpenLibraryCatalog;
use crate::infrastructure::database::Database;
use crate::infrastructure::releases::{HttpReleaseFeed, NoopReleaseFeed};
use crate::infrastructure::repositories::genres::SqlGenreRepository;
use crate::infrastructure::repositories::shelf::SqlShelfRepository;
use crate::infrastructure::repositories::stats::SqlStatsRepository;
use crate::infrastructure::repositories::tokens::SqlTokenRepository;
use crate::infrastructure::repositories::tracked_authors::SqlTrackedAuthorRepository;
use crate::infrastructure::repositories::users::SqlUserRepository;

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// External services that vary between production and tests. Repositories
/// and services are built from the database pool.
pub struct AppStateConfig {
    pub catalog: Arc<dyn CatalogProvider>,
    pub release_feed: Arc<dyn ReleaseFeed>,
}

impl AppStateConfig {
    /// Open Library at `catalog_url`; the HTTP release feed when
    /// `releases_url` is set, otherwise a feed that returns nothing.
    pub fn from_urls(catalog_url: &str, releases_url: Option<&str>) -> anyhow::Result<Self> {
        let http = reqwest::ClientBuilder::new()
            .user_agent(concat!("readlog/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        let catalog = OpenLibraryCatalog::new(http.clone(), catalog_url)
            .with_context(|| format!("invalid catalog URL: {catalog_url}"))?;

        let release_feed: Arc<dyn ReleaseFeed> = match releases_url {
            Some(url) => Arc::new(
                HttpReleaseFeed::new(http, url)
                    .with_context(|| format!("invalid release feed URL: {url}"))?,
            ),
            None => Arc::new(NoopReleaseFeed),
        };

        Ok(Self {
            catalog: Arc::new(catalog),
            release_feed,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub genre_repo: Arc<dyn GenreRepository>,
    pub shelf_repo: Arc<dyn ShelfRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub token_repo: Arc<dyn TokenRepository>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub shelf_service: ShelfService,
    pub stats_service: StatsService,
    pub author_service: AuthorTrackingService,
    pub token_service: TokenService,
}

impl AppState {
    /// Build the full application state from a database connection and config.
    pub fn from_database(database: &Database, config: AppStateConfig) -> Self {
        let pool = database.clone_pool();

        let genre_repo: Arc<dyn GenreRepository> = Arc::new(SqlGenreRepository::new(pool.clone()));
        let shelf_repo: Arc<dyn ShelfRepository> = Arc::new(SqlShelfRepository::new(pool.clone()));
        let stats_repo: Arc<dyn StatsRepository> = Arc::new(SqlStatsRepository::new(pool.clone()));
        let tracked_author_repo: Arc<dyn TrackedAuthorRepository> =
            Arc::new(SqlTrackedAuthorRepository::new(pool.clone()));
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqlUserRepository::new(pool.clone()));
        let token_repo: Arc<dyn TokenRepository> = Arc::new(SqlTokenRepository::new(pool));

        let shelf_service = ShelfService::new(
            Arc::clone(&shelf_repo),
            Arc::clone(&genre_repo),
            Arc::clone(&config.catalog),
        );
        let stats_service = StatsService::new(stats_repo);
        let author_service =
            AuthorTrackingService::new(tracked_author_repo, config.release_feed);
        let token_service = TokenService::new(Arc::clone(&token_repo), Arc::clone(&user_repo));

        Self {
            genre_repo,
            shelf_repo,
            user_repo,
            token_repo,
            catalog: config.catalog,
            shelf_service,
            stats_service,
            author_service,
            token_service,
        }
    }
}
