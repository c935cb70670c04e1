use readlog::domain::reviews::PublicReview;
use readlog::domain::shelf::NewShelfEntry;
use readlog::domain::users::NewUser;

use crate::helpers::{create_shelf_entry, create_user_with_token, post_json, shelf_entry, spawn_app_with_auth};

#[tokio::test]
async fn reviews_list_public_rated_or_annotated_entries() {
    let app = spawn_app_with_auth().await;

    create_shelf_entry(
        &app,
        NewShelfEntry {
            rating: Some(5.0),
            notes: Some("A masterpiece".to_string()),
            authors: vec!["Hilary Mantel".to_string()],
            ..shelf_entry("Wolf Hall")
        },
    )
    .await;
    create_shelf_entry(
        &app,
        NewShelfEntry {
            rating: Some(4.0),
            is_private: true,
            ..shelf_entry("Secret Diary")
        },
    )
    .await;
    // Neither rated nor annotated
    create_shelf_entry(&app, shelf_entry("Unread Tome")).await;

    let response = reqwest::Client::new()
        .get(app.api_url("/reviews"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let reviews: Vec<PublicReview> = response.json().await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].title, "Wolf Hall");
    assert_eq!(reviews[0].reviewer, "admin");
    assert_eq!(reviews[0].notes.as_deref(), Some("A masterpiece"));
}

#[tokio::test]
async fn review_search_matches_title_author_and_reviewer() {
    let app = spawn_app_with_auth().await;
    let (_, other_token) = create_user_with_token(&app, NewUser::new("bookworm")).await;

    create_shelf_entry(
        &app,
        NewShelfEntry {
            rating: Some(4.0),
            authors: vec!["Ursula K. Le Guin".to_string()],
            ..shelf_entry("The Dispossessed")
        },
    )
    .await;
    post_json(
        &app,
        "/shelf",
        Some(&other_token),
        &NewShelfEntry {
            notes: Some("Slow start".to_string()),
            ..shelf_entry("Middlemarch")
        },
    )
    .await;

    let by_title: Vec<PublicReview> = app.get_json("/reviews?q=dispossessed").await;
    assert_eq!(by_title.len(), 1);

    let by_author: Vec<PublicReview> = app.get_json("/reviews?q=le%20guin").await;
    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].title, "The Dispossessed");

    let by_reviewer: Vec<PublicReview> = app.get_json("/reviews?q=BOOKWORM").await;
    assert_eq!(by_reviewer.len(), 1);
    assert_eq!(by_reviewer[0].title, "Middlemarch");

    let nothing: Vec<PublicReview> = app.get_json("/reviews?q=zzz").await;
    assert!(nothing.is_empty());
}
