pub(crate) mod analytics;
pub(crate) mod auth;
pub(crate) mod books;
pub(crate) mod catalog;
pub(crate) mod system;

// Re-exports
pub(crate) use analytics::stats;
pub(crate) use auth::tokens;
pub(crate) use books::{authors, genres, reviews, shelf};
pub(crate) use system::{admin, health};

use axum::routing::{get, post};

use crate::application::state::AppState;

pub(super) fn router() -> axum::Router<AppState> {
    entity_routes()
        .merge(catalog_routes())
        .merge(auth_admin_routes())
}

fn entity_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/shelf", get(shelf::list_shelf).post(shelf::create_shelf_entry))
        .route("/shelf/from-catalog", post(shelf::create_from_catalog))
        .route(
            "/shelf/{id}",
            get(shelf::get_shelf_entry)
                .put(shelf::update_shelf_entry)
                .delete(shelf::delete_shelf_entry),
        )
        .route(
            "/genres",
            get(genres::list_genres).post(genres::create_genre),
        )
        .route(
            "/genres/{id}",
            get(genres::get_genre)
                .put(genres::update_genre)
                .delete(genres::delete_genre),
        )
        .route("/reviews", get(reviews::list_reviews))
        .route("/stats/monthly", get(stats::monthly_stats))
        .route(
            "/tracked-authors",
            get(authors::list_tracked_authors).post(authors::track_author),
        )
        .route("/tracked-authors/upcoming", get(authors::upcoming_releases))
        .route(
            "/tracked-authors/{id}",
            axum::routing::delete(authors::untrack_author),
        )
}

fn catalog_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/catalog/books", get(catalog::search_books))
        .route("/catalog/works/{id}/edition", get(catalog::edition_details))
        .route("/catalog/authors", get(catalog::search_authors))
}

fn auth_admin_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/health", get(health::health))
        .route(
            "/tokens",
            post(tokens::create_token).get(tokens::list_tokens),
        )
        .route("/tokens/{id}/revoke", post(tokens::revoke_token))
        .route("/admin/users", post(admin::create_user))
}
