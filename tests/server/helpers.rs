use std::sync::Arc;

use readlog::application::routes::app_router;
use readlog::application::state::{AppState, AppStateConfig};
use readlog::domain::genres::{Genre, NewGenre};
use readlog::domain::repositories::{TokenRepository, UserRepository};
use readlog::domain::shelf::{NewShelfEntry, ShelfEntry};
use readlog::domain::tokens::NewToken;
use readlog::domain::users::{NewUser, User};
use readlog::infrastructure::auth::{generate_token, hash_token};
use readlog::infrastructure::database::{Database, DatabasePool};
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tokio::net::TcpListener;
use tokio::task::AbortHandle;
use wiremock::MockServer;

pub struct TestApp {
    pub address: String,
    #[allow(dead_code)]
    pub pool: DatabasePool,
    pub user_repo: Arc<dyn UserRepository>,
    pub token_repo: Arc<dyn TokenRepository>,
    pub auth_token: Option<String>,
    /// Serves both the Open Library API and the release feed.
    pub mock_server: MockServer,
    server_handle: AbortHandle,
}

impl TestApp {
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }

    pub fn token(&self) -> &str {
        self.auth_token.as_deref().expect("app spawned without auth")
    }

    /// GET with the app's bearer token attached.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        let mut request = Client::new().get(self.api_url(path));
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        request
            .send()
            .await
            .unwrap_or_else(|e| panic!("GET {path} failed: {e}"))
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> R {
        let response = self.get(path).await;
        assert!(
            response.status().is_success(),
            "GET {path} returned {}",
            response.status()
        );
        response
            .json()
            .await
            .unwrap_or_else(|e| panic!("failed to deserialize {path}: {e}"))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub async fn spawn_app() -> TestApp {
    let mock_server = MockServer::start().await;

    let database = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    let config = AppStateConfig::from_urls(&mock_server.uri(), Some(&mock_server.uri()))
        .expect("Failed to build state config");

    let pool = database.clone_pool();
    let state = AppState::from_database(&database, config);

    // Clone repos we need for TestApp before consuming state in the router
    let user_repo = state.user_repo.clone();
    let token_repo = state.token_repo.clone();

    let app = app_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");

    let local_addr = listener.local_addr().expect("Failed to get local address");
    let address = format!("http://{local_addr}");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Server failed to start");
    })
    .abort_handle();

    TestApp {
        address,
        pool,
        user_repo,
        token_repo,
        auth_token: None,
        mock_server,
        server_handle,
    }
}

pub async fn spawn_app_with_auth() -> TestApp {
    let mut app = spawn_app().await;
    let (_, token) = create_user_with_token(&app, NewUser::admin("admin")).await;
    app.auth_token = Some(token);
    app
}

/// Inserts a user directly and returns it with a fresh bearer token.
pub async fn create_user_with_token(app: &TestApp, new_user: NewUser) -> (User, String) {
    let user = app
        .user_repo
        .insert(new_user)
        .await
        .expect("Failed to create user");

    let token_value = generate_token();
    let token = NewToken::new(user.id, hash_token(&token_value), "test-token".to_string());
    app.token_repo
        .insert(token)
        .await
        .expect("Failed to insert token");

    (user, token_value)
}

/// Generic helper: POST a JSON payload with the given token and return the
/// raw response.
pub async fn post_json<P: Serialize>(
    app: &TestApp,
    path: &str,
    token: Option<&str>,
    payload: &P,
) -> reqwest::Response {
    let mut request = Client::new().post(app.api_url(path)).json(payload);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    request
        .send()
        .await
        .unwrap_or_else(|e| panic!("POST {path} failed: {e}"))
}

/// Generic helper: POST a JSON payload and deserialize the response.
/// Automatically attaches the auth token if the test app has one.
pub async fn create_entity<P: Serialize, R: DeserializeOwned>(
    app: &TestApp,
    path: &str,
    payload: &P,
) -> R {
    let response = post_json(app, path, app.auth_token.as_deref(), payload).await;
    assert!(
        response.status().is_success(),
        "POST {path} returned {}",
        response.status()
    );
    response
        .json()
        .await
        .unwrap_or_else(|e| panic!("failed to deserialize entity from {path}: {e}"))
}

pub async fn create_genre(app: &TestApp, name: &str, fiction: bool) -> Genre {
    create_entity(
        app,
        "/genres",
        &NewGenre {
            name: name.to_string(),
            fiction,
        },
    )
    .await
}

pub fn shelf_entry(title: &str) -> NewShelfEntry {
    NewShelfEntry {
        title: title.to_string(),
        authors: vec!["Test Author".to_string()],
        ..NewShelfEntry::default()
    }
}

pub async fn create_shelf_entry(app: &TestApp, entry: NewShelfEntry) -> ShelfEntry {
    create_entity(app, "/shelf", &entry).await
}
