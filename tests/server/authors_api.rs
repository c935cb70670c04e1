use readlog::domain::authors::{NewTrackedAuthor, ReleaseStatus, TrackedAuthor, UpcomingRelease};
use readlog::domain::users::NewUser;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{
    TestApp, create_entity, create_user_with_token, post_json, spawn_app, spawn_app_with_auth,
};

fn author(key: &str, name: &str) -> NewTrackedAuthor {
    NewTrackedAuthor {
        author_key: key.to_string(),
        name: name.to_string(),
        work_count: 12,
    }
}

async fn track(app: &TestApp, key: &str, name: &str) -> TrackedAuthor {
    create_entity(app, "/tracked-authors", &author(key, name)).await
}

#[tokio::test]
async fn tracking_requires_authentication() {
    let app = spawn_app().await;
    let response = post_json(&app, "/tracked-authors", None, &author("OL1A", "Anon")).await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn tracking_an_author_normalizes_the_key() {
    let app = spawn_app_with_auth().await;

    let response = post_json(
        &app,
        "/tracked-authors",
        Some(app.token()),
        &author("/authors/OL2658716A", "N. K. Jemisin"),
    )
    .await;
    assert_eq!(response.status(), 201);

    let tracked: TrackedAuthor = response.json().await.unwrap();
    assert_eq!(tracked.author_key, "OL2658716A");
    assert_eq!(tracked.work_count, 12);

    let listed: Vec<TrackedAuthor> = app.get_json("/tracked-authors").await;
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn tracking_the_same_author_twice_returns_409() {
    let app = spawn_app_with_auth().await;
    track(&app, "OL2658716A", "N. K. Jemisin").await;

    let response = post_json(
        &app,
        "/tracked-authors",
        Some(app.token()),
        &author("OL2658716A", "N. K. Jemisin"),
    )
    .await;
    assert_eq!(response.status(), 409);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "You are already tracking this author");
}

#[tokio::test]
async fn different_users_may_track_the_same_author() {
    let app = spawn_app_with_auth().await;
    track(&app, "OL2658716A", "N. K. Jemisin").await;
    let (_, other_token) = create_user_with_token(&app, NewUser::new("reader")).await;

    let response = post_json(
        &app,
        "/tracked-authors",
        Some(&other_token),
        &author("OL2658716A", "N. K. Jemisin"),
    )
    .await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn untracking_checks_ownership() {
    let app = spawn_app_with_auth().await;
    let tracked = track(&app, "OL1A", "First").await;
    let (_, other_token) = create_user_with_token(&app, NewUser::new("reader")).await;
    let client = reqwest::Client::new();

    let response = client
        .delete(app.api_url(&format!("/tracked-authors/{}", tracked.id)))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = client
        .delete(app.api_url(&format!("/tracked-authors/{}", tracked.id)))
        .bearer_auth(app.token())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let listed: Vec<TrackedAuthor> = app.get_json("/tracked-authors").await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn upcoming_releases_merge_feeds_and_skip_failures() {
    let app = spawn_app_with_auth().await;
    track(&app, "OL1A", "Ann Leckie").await;
    track(&app, "OL2A", "Broken Feed").await;
    track(&app, "OL3A", "Ted Chiang").await;

    Mock::given(method("GET"))
        .and(path("/authors/OL1A/upcoming"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "title": "Translation State II", "author": "Ann Leckie", "year": 2027, "status": "announced" }
        ])))
        .mount(&app.mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/authors/OL2A/upcoming"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/authors/OL3A/upcoming"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "title": "Stories III", "author": "Ted Chiang", "year": 2026, "status": "Confirmed" },
            { "title": "Exhalation II", "author": "Ted Chiang", "year": 2026, "status": "available" }
        ])))
        .mount(&app.mock_server)
        .await;

    let releases: Vec<UpcomingRelease> = app.get_json("/tracked-authors/upcoming").await;

    let titles: Vec<&str> = releases.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Exhalation II", "Stories III", "Translation State II"]
    );
    assert_eq!(releases[1].status, ReleaseStatus::Confirmed);
    assert_eq!(releases[2].status, ReleaseStatus::Announced);
}
