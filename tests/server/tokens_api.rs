use readlog::domain::repositories::TokenRepository;
use readlog::domain::tokens::{IssuedToken, ProvisionedUser, Token};
use readlog::domain::users::NewUser;
use serde_json::json;

use crate::helpers::{create_user_with_token, post_json, spawn_app, spawn_app_with_auth};

#[tokio::test]
async fn health_is_public() {
    let app = spawn_app().await;

    let body: serde_json::Value = app.get_json("/health").await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn responses_carry_nosniff_header() {
    let app = spawn_app().await;

    let response = app.get("/health").await;
    assert_eq!(
        response
            .headers()
            .get("x-content-type-options")
            .and_then(|v| v.to_str().ok()),
        Some("nosniff")
    );
}

#[tokio::test]
async fn issued_tokens_authenticate_and_hide_their_hash() {
    let app = spawn_app_with_auth().await;

    let response = post_json(&app, "/tokens", Some(app.token()), &json!({ "name": "laptop" })).await;
    assert_eq!(response.status(), 201);
    let issued: IssuedToken = response.json().await.unwrap();
    assert_eq!(issued.secret.len(), 43);
    assert_eq!(issued.token.name, "laptop");

    let response = reqwest::Client::new()
        .get(app.api_url("/tokens"))
        .bearer_auth(&issued.secret)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    let tokens = body.as_array().unwrap();
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(|t| t.get("token_hash").is_none()));
}

#[tokio::test]
async fn blank_token_names_are_rejected() {
    let app = spawn_app_with_auth().await;

    let response = post_json(&app, "/tokens", Some(app.token()), &json!({ "name": " " })).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn revoked_tokens_stop_working() {
    let app = spawn_app_with_auth().await;
    let issued: IssuedToken = post_json(&app, "/tokens", Some(app.token()), &json!({ "name": "ci" }))
        .await
        .json()
        .await
        .unwrap();

    let response = post_json(
        &app,
        &format!("/tokens/{}/revoke", issued.token.id),
        Some(app.token()),
        &json!({}),
    )
    .await;
    assert_eq!(response.status(), 204);

    let response = reqwest::Client::new()
        .get(app.api_url("/shelf"))
        .bearer_auth(&issued.secret)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let listed: Vec<Token> = app.get_json("/tokens").await;
    let revoked = listed.iter().find(|t| t.id == issued.token.id).unwrap();
    assert!(revoked.is_revoked());
}

#[tokio::test]
async fn other_users_tokens_cannot_be_revoked() {
    let app = spawn_app_with_auth().await;
    let (other, other_token) = create_user_with_token(&app, NewUser::new("reader")).await;
    let theirs = app.token_repo.list_by_user(other.id).await.unwrap();

    let response = post_json(
        &app,
        &format!("/tokens/{}/revoke", theirs[0].id),
        Some(app.token()),
        &json!({}),
    )
    .await;
    assert_eq!(response.status(), 404);

    let response = reqwest::Client::new()
        .get(app.api_url("/shelf"))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn admins_provision_users_with_a_first_token() {
    let app = spawn_app_with_auth().await;

    let response = post_json(
        &app,
        "/admin/users",
        Some(app.token()),
        &json!({ "username": "newcomer" }),
    )
    .await;
    assert_eq!(response.status(), 201);

    let provisioned: ProvisionedUser = response.json().await.unwrap();
    assert_eq!(provisioned.user.username, "newcomer");
    assert!(!provisioned.user.is_admin);

    let response = reqwest::Client::new()
        .get(app.api_url("/shelf"))
        .bearer_auth(&provisioned.token.secret)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn duplicate_usernames_return_409() {
    let app = spawn_app_with_auth().await;

    let response = post_json(
        &app,
        "/admin/users",
        Some(app.token()),
        &json!({ "username": "admin" }),
    )
    .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn non_admins_cannot_provision_users() {
    let app = spawn_app_with_auth().await;
    let (_, reader_token) = create_user_with_token(&app, NewUser::new("reader")).await;

    let response = post_json(
        &app,
        "/admin/users",
        Some(&reader_token),
        &json!({ "username": "sneaky" }),
    )
    .await;
    assert_eq!(response.status(), 401);
}
