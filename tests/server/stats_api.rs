use chrono::NaiveDate;
use readlog::domain::ids::GenreId;
use readlog::domain::shelf::{NewShelfEntry, ReadingStatus};
use readlog::domain::stats::{ChartData, Metric};
use readlog::domain::users::NewUser;

use crate::helpers::{
    TestApp, create_genre, create_shelf_entry, create_user_with_token, shelf_entry, spawn_app,
    spawn_app_with_auth,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn finished_book(
    app: &TestApp,
    title: &str,
    finished: NaiveDate,
    pages: Option<u32>,
    rating: Option<f64>,
    genre_ids: Vec<GenreId>,
) {
    create_shelf_entry(
        app,
        NewShelfEntry {
            status: ReadingStatus::Read,
            date_finished: Some(finished),
            pages,
            rating,
            genre_ids,
            ..shelf_entry(title)
        },
    )
    .await;
}

/// Fantasy (fiction) in Jan and Mar 2024, History (non-fiction) in Mar 2024.
async fn seeded_app() -> TestApp {
    let app = spawn_app_with_auth().await;
    let fantasy = create_genre(&app, "Fantasy", true).await;
    let history = create_genre(&app, "History", false).await;

    finished_book(&app, "A", date(2024, 1, 10), Some(300), Some(4.0), vec![fantasy.id]).await;
    finished_book(&app, "B", date(2024, 3, 2), Some(200), Some(2.0), vec![fantasy.id]).await;
    finished_book(&app, "C", date(2024, 3, 28), Some(100), None, vec![history.id]).await;

    // Not finished: never counted
    create_shelf_entry(&app, shelf_entry("On the pile")).await;
    app
}

#[tokio::test]
async fn monthly_stats_require_authentication() {
    let app = spawn_app().await;
    let response = app.get("/stats/monthly").await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn an_empty_shelf_yields_an_empty_series() {
    let app = spawn_app_with_auth().await;

    let chart: ChartData = app.get_json("/stats/monthly").await;
    assert!(chart.series.is_empty());
    assert_eq!(chart.reference_value, 0.0);
    assert_eq!(chart.metric_key, Metric::Count);
}

#[tokio::test]
async fn count_series_is_gap_filled_and_averaged() {
    let app = seeded_app().await;

    let chart: ChartData = app.get_json("/stats/monthly?metric=count").await;

    let months: Vec<String> = chart.series.iter().map(|r| r.month.to_string()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
    let books: Vec<u32> = chart.series.iter().map(|r| r.books).collect();
    assert_eq!(books, vec![1, 0, 2]);
    assert_eq!(chart.series[1].label, "Feb 2024");
    assert!((chart.reference_value - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn pages_and_rating_metrics_use_their_own_columns() {
    let app = seeded_app().await;

    let pages: ChartData = app.get_json("/stats/monthly?metric=pagesRead").await;
    assert_eq!(pages.metric_key, Metric::Pages);
    assert_eq!(pages.series[2].pages, 300);
    assert!((pages.reference_value - 200.0).abs() < 1e-9);

    let rating: ChartData = app.get_json("/stats/monthly?metric=rating").await;
    assert_eq!(rating.metric_key, Metric::Rating);
    // March: only the 2.0 is rated
    assert!((rating.series[2].rating - 2.0).abs() < 1e-9);
    assert!((rating.series[1].rating).abs() < 1e-9);
}

#[tokio::test]
async fn genre_and_fiction_filters_narrow_the_series() {
    let app = seeded_app().await;

    let history: ChartData = app.get_json("/stats/monthly?genre=History").await;
    assert_eq!(history.series.len(), 1);
    assert_eq!(history.series[0].month.to_string(), "2024-03");

    let lowercase: ChartData = app.get_json("/stats/monthly?genre=history").await;
    assert_eq!(lowercase.series, history.series);

    let either: ChartData = app
        .get_json("/stats/monthly?genre=History&genre=Fantasy")
        .await;
    assert_eq!(either.series.iter().map(|r| r.books).sum::<u32>(), 3);

    let fiction: ChartData = app.get_json("/stats/monthly?fiction=fiction").await;
    assert_eq!(fiction.series.iter().map(|r| r.books).sum::<u32>(), 2);

    let nonfiction: ChartData = app.get_json("/stats/monthly?fiction=non-fiction").await;
    assert_eq!(nonfiction.series.iter().map(|r| r.books).sum::<u32>(), 1);
}

#[tokio::test]
async fn month_range_is_inclusive() {
    let app = seeded_app().await;

    let chart: ChartData = app
        .get_json("/stats/monthly?start=2024-02&end=2024-03")
        .await;
    assert_eq!(chart.series.len(), 1);
    assert_eq!(chart.series[0].books, 2);

    let chart: ChartData = app.get_json("/stats/monthly?end=2024-01").await;
    assert_eq!(chart.series.len(), 1);
    assert_eq!(chart.series[0].books, 1);
}

#[tokio::test]
async fn unknown_metric_returns_400() {
    let app = seeded_app().await;

    let response = app.get("/stats/monthly?metric=velocity").await;
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("velocity"));
}

#[tokio::test]
async fn malformed_months_and_fiction_filters_return_400() {
    let app = seeded_app().await;

    assert_eq!(app.get("/stats/monthly?start=2024-13").await.status(), 400);
    assert_eq!(app.get("/stats/monthly?end=March").await.status(), 400);
    assert_eq!(app.get("/stats/monthly?fiction=poetry").await.status(), 400);
}

#[tokio::test]
async fn stats_only_cover_the_callers_books() {
    let app = seeded_app().await;
    let (_, other_token) = create_user_with_token(&app, NewUser::new("reader")).await;

    let chart: ChartData = reqwest::Client::new()
        .get(app.api_url("/stats/monthly"))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(chart.series.is_empty());
}
