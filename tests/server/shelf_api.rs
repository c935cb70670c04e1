use chrono::NaiveDate;
use readlog::domain::shelf::{NewShelfEntry, ReadingStatus, ShelfEntry, UpdateShelfEntry};
use readlog::domain::stats::ChartData;
use readlog::domain::users::NewUser;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{
    create_genre, create_shelf_entry, create_user_with_token, post_json, shelf_entry,
    spawn_app, spawn_app_with_auth,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn shelf_requires_a_bearer_token() {
    let app = spawn_app().await;

    let response = app.get("/shelf").await;
    assert_eq!(response.status(), 401);

    let response = post_json(&app, "/shelf", None, &shelf_entry("Dune")).await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn revoked_or_unknown_tokens_are_rejected() {
    let app = spawn_app().await;

    let response = post_json(&app, "/shelf", Some("not-a-token"), &shelf_entry("Dune")).await;
    assert_eq!(response.status(), 401);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "authentication required");
}

#[tokio::test]
async fn adding_a_book_returns_201_and_defaults_to_want_to_read() {
    let app = spawn_app_with_auth().await;

    let response = post_json(&app, "/shelf", Some(app.token()), &shelf_entry("  Dune  ")).await;
    assert_eq!(response.status(), 201);

    let entry: ShelfEntry = response.json().await.unwrap();
    assert_eq!(entry.title, "Dune");
    assert_eq!(entry.status, ReadingStatus::WantToRead);
    assert_eq!(entry.authors, vec!["Test Author".to_string()]);
    assert!(entry.genres.is_empty());
    assert!(!entry.is_private);
}

#[tokio::test]
async fn adding_a_book_with_a_blank_title_returns_400() {
    let app = spawn_app_with_auth().await;

    let response = post_json(&app, "/shelf", Some(app.token()), &shelf_entry("   ")).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn out_of_range_ratings_and_inverted_dates_are_rejected() {
    let app = spawn_app_with_auth().await;

    let mut entry = shelf_entry("Too Good");
    entry.rating = Some(6.0);
    let response = post_json(&app, "/shelf", Some(app.token()), &entry).await;
    assert_eq!(response.status(), 400);

    let mut entry = shelf_entry("Time Travel");
    entry.date_started = Some(date(2024, 5, 10));
    entry.date_finished = Some(date(2024, 5, 1));
    let response = post_json(&app, "/shelf", Some(app.token()), &entry).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn listing_filters_by_status() {
    let app = spawn_app_with_auth().await;

    create_shelf_entry(&app, shelf_entry("Unread")).await;
    create_shelf_entry(
        &app,
        NewShelfEntry {
            status: ReadingStatus::Read,
            date_finished: Some(date(2024, 1, 5)),
            ..shelf_entry("Finished")
        },
    )
    .await;

    let all: Vec<ShelfEntry> = app.get_json("/shelf").await;
    assert_eq!(all.len(), 2);

    let read: Vec<ShelfEntry> = app.get_json("/shelf?status=read").await;
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].title, "Finished");

    let response = app.get("/shelf?status=shelved").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn updating_an_entry_applies_partial_changes() {
    let app = spawn_app_with_auth().await;
    let entry = create_shelf_entry(
        &app,
        NewShelfEntry {
            rating: Some(3.0),
            notes: Some("first pass".to_string()),
            ..shelf_entry("Piranesi")
        },
    )
    .await;

    let changes = UpdateShelfEntry {
        status: Some(ReadingStatus::Read),
        date_finished: Some(Some(date(2024, 3, 2))),
        ..UpdateShelfEntry::default()
    };
    let updated: ShelfEntry = reqwest::Client::new()
        .put(app.api_url(&format!("/shelf/{}", entry.id)))
        .bearer_auth(app.token())
        .json(&changes)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(updated.status, ReadingStatus::Read);
    assert_eq!(updated.date_finished, Some(date(2024, 3, 2)));
    assert_eq!(updated.rating, Some(3.0));
    assert_eq!(updated.notes.as_deref(), Some("first pass"));
    assert!(updated.updated_at >= entry.updated_at);
}

#[tokio::test]
async fn a_zero_rating_and_empty_notes_clear_the_fields() {
    let app = spawn_app_with_auth().await;
    let entry = create_shelf_entry(
        &app,
        NewShelfEntry {
            rating: Some(4.5),
            notes: Some("loved it".to_string()),
            ..shelf_entry("Circe")
        },
    )
    .await;

    let updated: ShelfEntry = reqwest::Client::new()
        .put(app.api_url(&format!("/shelf/{}", entry.id)))
        .bearer_auth(app.token())
        .json(&json!({ "rating": 0, "notes": "" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(updated.rating, None);
    assert_eq!(updated.notes, None);
}

#[tokio::test]
async fn clearing_the_finish_date_removes_the_book_from_stats() {
    let app = spawn_app_with_auth().await;
    let entry = create_shelf_entry(
        &app,
        NewShelfEntry {
            status: ReadingStatus::Read,
            pages: Some(320),
            isbn: Some("9780141439518".to_string()),
            date_started: Some(date(2024, 2, 20)),
            date_finished: Some(date(2024, 3, 2)),
            ..shelf_entry("Middlemarch")
        },
    )
    .await;

    let chart: ChartData = app.get_json("/stats/monthly").await;
    assert_eq!(chart.series.len(), 1);

    let response = reqwest::Client::new()
        .put(app.api_url(&format!("/shelf/{}", entry.id)))
        .bearer_auth(app.token())
        .json(&json!({ "status": "reading", "date_finished": null, "isbn": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let updated: ShelfEntry = response.json().await.unwrap();
    assert_eq!(updated.status, ReadingStatus::Reading);
    assert_eq!(updated.date_finished, None);
    assert_eq!(updated.isbn, None);
    assert_eq!(updated.date_started, Some(date(2024, 2, 20)));
    assert_eq!(updated.pages, Some(320));

    let chart: ChartData = app.get_json("/stats/monthly").await;
    assert!(chart.series.is_empty());
}

#[tokio::test]
async fn clearing_the_start_date_allows_an_earlier_finish() {
    let app = spawn_app_with_auth().await;
    let entry = create_shelf_entry(
        &app,
        NewShelfEntry {
            date_started: Some(date(2024, 5, 10)),
            ..shelf_entry("Kindred")
        },
    )
    .await;

    let changes = UpdateShelfEntry {
        date_started: Some(None),
        date_finished: Some(Some(date(2024, 5, 1))),
        ..UpdateShelfEntry::default()
    };
    let updated: ShelfEntry = reqwest::Client::new()
        .put(app.api_url(&format!("/shelf/{}", entry.id)))
        .bearer_auth(app.token())
        .json(&changes)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(updated.date_started, None);
    assert_eq!(updated.date_finished, Some(date(2024, 5, 1)));
}

#[tokio::test]
async fn genres_are_linked_and_replaced_on_update() {
    let app = spawn_app_with_auth().await;
    let fantasy = create_genre(&app, "Fantasy", true).await;
    let history = create_genre(&app, "History", false).await;
    let memoir = create_genre(&app, "Memoir", false).await;

    let entry = create_shelf_entry(
        &app,
        NewShelfEntry {
            genre_ids: vec![fantasy.id, history.id],
            ..shelf_entry("Wolf Hall")
        },
    )
    .await;
    let mut names: Vec<_> = entry.genres.iter().map(|g| g.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["Fantasy", "History"]);

    let updated: ShelfEntry = reqwest::Client::new()
        .put(app.api_url(&format!("/shelf/{}", entry.id)))
        .bearer_auth(app.token())
        .json(&UpdateShelfEntry {
            genre_ids: Some(vec![memoir.id]),
            ..UpdateShelfEntry::default()
        })
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(updated.genres.len(), 1);
    assert_eq!(updated.genres[0].name, "Memoir");
    assert!(!updated.genres[0].fiction);
}

#[tokio::test]
async fn unknown_genre_ids_are_rejected() {
    let app = spawn_app_with_auth().await;

    let response = post_json(
        &app,
        "/shelf",
        Some(app.token()),
        &json!({ "title": "Orphan", "genre_ids": [999] }),
    )
    .await;
    assert_eq!(response.status(), 400);

    let shelf: Vec<ShelfEntry> = app.get_json("/shelf").await;
    assert!(shelf.is_empty());
}

#[tokio::test]
async fn entries_are_invisible_to_other_users() {
    let app = spawn_app_with_auth().await;
    let entry = create_shelf_entry(&app, shelf_entry("Mine")).await;
    let (_, other_token) = create_user_with_token(&app, NewUser::new("reader")).await;
    let client = reqwest::Client::new();

    let response = client
        .get(app.api_url(&format!("/shelf/{}", entry.id)))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = client
        .delete(app.api_url(&format!("/shelf/{}", entry.id)))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let theirs: Vec<ShelfEntry> = client
        .get(app.api_url("/shelf"))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(theirs.is_empty());
}

#[tokio::test]
async fn deleting_an_entry_returns_204_then_404() {
    let app = spawn_app_with_auth().await;
    let entry = create_shelf_entry(&app, shelf_entry("Ephemeral")).await;
    let client = reqwest::Client::new();

    let response = client
        .delete(app.api_url(&format!("/shelf/{}", entry.id)))
        .bearer_auth(app.token())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = app.get(&format!("/shelf/{}", entry.id)).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn adding_from_the_catalog_uses_edition_details() {
    let app = spawn_app_with_auth().await;

    Mock::given(method("GET"))
        .and(path("/works/OL45883W/editions.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                { "number_of_pages": 304, "isbn_13": ["9780441478125"] }
            ]
        })))
        .expect(1)
        .mount(&app.mock_server)
        .await;

    let response = post_json(
        &app,
        "/shelf/from-catalog",
        Some(app.token()),
        &json!({
            "book": {
                "key": "/works/OL45883W",
                "title": "The Left Hand of Darkness",
                "authors": ["Ursula K. Le Guin"],
                "cover_url": null,
                "language": "eng",
                "isbn": ""
            },
            "status": "read",
            "rating": 5,
            "date_finished": "2024-02-11"
        }),
    )
    .await;
    assert_eq!(response.status(), 201);

    let entry: ShelfEntry = response.json().await.unwrap();
    assert_eq!(entry.work_key.as_deref(), Some("/works/OL45883W"));
    assert_eq!(entry.pages, Some(304));
    assert_eq!(entry.isbn.as_deref(), Some("9780441478125"));
    assert_eq!(entry.language.as_deref(), Some("eng"));
    assert_eq!(entry.status, ReadingStatus::Read);
}

#[tokio::test]
async fn catalog_add_survives_an_enrichment_failure() {
    let app = spawn_app_with_auth().await;

    Mock::given(method("GET"))
        .and(path("/works/OL1W/editions.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.mock_server)
        .await;

    let response = post_json(
        &app,
        "/shelf/from-catalog",
        Some(app.token()),
        &json!({
            "book": {
                "key": "/works/OL1W",
                "title": "Obscure",
                "authors": [],
                "cover_url": null,
                "language": "",
                "isbn": "0000000000"
            },
            "pages": 120
        }),
    )
    .await;
    assert_eq!(response.status(), 201);

    let entry: ShelfEntry = response.json().await.unwrap();
    assert_eq!(entry.pages, Some(120));
    assert_eq!(entry.isbn.as_deref(), Some("0000000000"));
    assert_eq!(entry.language, None);
}
