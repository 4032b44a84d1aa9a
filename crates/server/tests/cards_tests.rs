//! Card feed endpoint tests, plus access-guard behaviour shared by all
//! protected routes.

use axum_test::TestServer;
use macromind_backend::{
    AppResources, api,
    config::{AppConfig, AuthConfig},
    db,
};
use sea_orm::Database;
use serde_json::json;
use std::sync::Arc;

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        auth: AuthConfig {
            access_token_secret: "test-access-secret-0123456789abcdef".into(),
            refresh_token_secret: "test-refresh-secret-0123456789abcdef".into(),
            access_token_lifetime: 60,
            refresh_token_lifetime: 86400 * 7,
        },
    }
}

async fn create_test_server(config: AppConfig) -> (TestServer, AppResources) {
    let db = Database::connect("sqlite::memory:").await.expect("connect");
    db::create_tables(&db).await.expect("create tables");

    let resources = AppResources {
        db: Arc::new(db),
        config: Arc::new(config),
    };
    let server =
        TestServer::new(api::build_router(resources.clone())).expect("create test server");
    (server, resources)
}

async fn register(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": email,
            "password": "p1",
            "name": "A",
            "phone_number": "1",
            "preferences": ["sports"],
            "location": "NY"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    body["access_token"].as_str().expect("access token").to_string()
}

#[tokio::test]
async fn test_healthz() {
    let (server, _resources) = create_test_server(test_config()).await;

    let response = server.get("/healthz").await;
    response.assert_status_ok();
    response.assert_text("ok");
}

#[tokio::test]
async fn test_cards_require_auth() {
    let (server, _resources) = create_test_server(test_config()).await;

    server.get("/api/cards").await.assert_status_unauthorized();
    server
        .post("/api/cards")
        .json(&json!({}))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_guard_rejects_non_bearer_scheme() {
    let (server, _resources) = create_test_server(test_config()).await;

    let response = server
        .get("/api/cards")
        .add_header(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        )
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_guard_rejects_refresh_token_as_access_token() {
    let (server, _resources) = create_test_server(test_config()).await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "a@x.com",
            "password": "p1",
            "name": "A",
            "phone_number": "1",
            "preferences": ["sports"],
            "location": "NY"
        }))
        .await;
    let body: serde_json::Value = response.json();
    let refresh = body["refresh_token"].as_str().expect("refresh token");

    server
        .get("/api/cards")
        .authorization_bearer(refresh)
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_guard_rejects_expired_access_token() {
    // Tokens from this server are already expired when minted
    let mut config = test_config();
    config.auth.access_token_lifetime = -60;
    let (server, _resources) = create_test_server(config).await;

    let access = register(&server, "a@x.com").await;

    server
        .get("/api/cards")
        .authorization_bearer(&access)
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_create_and_list_cards() {
    let (server, _resources) = create_test_server(test_config()).await;
    let access = register(&server, "a@x.com").await;

    let response = server
        .post("/api/cards")
        .authorization_bearer(&access)
        .json(&json!({
            "image": "https://example.org/chart.jpg",
            "data": "US CPI beats expectations",
            "is_liked": "Invest",
            "is_skipped": "Pass"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["data"], "US CPI beats expectations");
    assert!(created["id"].is_string());

    let response = server
        .get("/api/cards")
        .authorization_bearer(&access)
        .await;
    response.assert_status_ok();
    let cards: serde_json::Value = response.json();
    let cards = cards.as_array().expect("card list");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["is_liked"], "Invest");
    assert_eq!(cards[0]["is_skipped"], "Pass");
}

#[tokio::test]
async fn test_create_card_missing_fields() {
    let (server, _resources) = create_test_server(test_config()).await;
    let access = register(&server, "a@x.com").await;

    let response = server
        .post("/api/cards")
        .authorization_bearer(&access)
        .json(&json!({"image": "https://example.org/chart.jpg"}))
        .await;
    response.assert_status_bad_request();
}
