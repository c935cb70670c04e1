use readlog::domain::genres::{Genre, NewGenre, UpdateGenre};
use serde_json::json;

use crate::helpers::{create_genre, post_json, spawn_app, spawn_app_with_auth};

#[tokio::test]
async fn creating_a_genre_returns_a_201_for_valid_data() {
    let app = spawn_app_with_auth().await;

    let response = post_json(
        &app,
        "/genres",
        Some(app.token()),
        &NewGenre {
            name: " Science Fiction ".to_string(),
            fiction: true,
        },
    )
    .await;
    assert_eq!(response.status(), 201);

    let genre: Genre = response.json().await.expect("Failed to parse response");
    assert_eq!(genre.name, "Science Fiction");
    assert!(genre.fiction);
}

#[tokio::test]
async fn creating_a_genre_requires_authentication() {
    let app = spawn_app().await;

    let response = post_json(&app, "/genres", None, &json!({ "name": "Poetry" })).await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn the_fiction_flag_defaults_to_false() {
    let app = spawn_app_with_auth().await;

    let genre: Genre = post_json(&app, "/genres", Some(app.token()), &json!({ "name": "Essays" }))
        .await
        .json()
        .await
        .unwrap();
    assert!(!genre.fiction);
}

#[tokio::test]
async fn duplicate_genre_names_return_409_regardless_of_case() {
    let app = spawn_app_with_auth().await;
    create_genre(&app, "Fantasy", true).await;

    let response = post_json(
        &app,
        "/genres",
        Some(app.token()),
        &json!({ "name": "fantasy", "fiction": true }),
    )
    .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn blank_genre_names_return_400() {
    let app = spawn_app_with_auth().await;

    let response = post_json(&app, "/genres", Some(app.token()), &json!({ "name": "  " })).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn listing_genres_is_public() {
    let app = spawn_app_with_auth().await;
    create_genre(&app, "Horror", true).await;
    create_genre(&app, "Biography", false).await;

    let response = reqwest::Client::new()
        .get(app.api_url("/genres"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let genres: Vec<Genre> = response.json().await.unwrap();
    assert_eq!(genres.len(), 2);
}

#[tokio::test]
async fn updating_a_genre_changes_only_the_given_fields() {
    let app = spawn_app_with_auth().await;
    let genre = create_genre(&app, "Sci-Fi", false).await;

    let updated: Genre = reqwest::Client::new()
        .put(app.api_url(&format!("/genres/{}", genre.id)))
        .bearer_auth(app.token())
        .json(&UpdateGenre {
            fiction: Some(true),
            ..UpdateGenre::default()
        })
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(updated.name, "Sci-Fi");
    assert!(updated.fiction);
}

#[tokio::test]
async fn an_empty_update_returns_400() {
    let app = spawn_app_with_auth().await;
    let genre = create_genre(&app, "Drama", true).await;

    let response = reqwest::Client::new()
        .put(app.api_url(&format!("/genres/{}", genre.id)))
        .bearer_auth(app.token())
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn deleting_a_genre_returns_204_then_404() {
    let app = spawn_app_with_auth().await;
    let genre = create_genre(&app, "Westerns", true).await;
    let client = reqwest::Client::new();

    let response = client
        .delete(app.api_url(&format!("/genres/{}", genre.id)))
        .bearer_auth(app.token())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = app.get(&format!("/genres/{}", genre.id)).await;
    assert_eq!(response.status(), 404);
}
