use goose::prelude::*;
use serde_json::json;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Monotonic counter so every registration in a run gets a unique email.
static REGISTRATIONS: AtomicUsize = AtomicUsize::new(0);

/// Access token stored per simulated user after its on-start registration.
struct AccessToken(String);

const PASSWORD: &str = "loadtest-password-123";

fn unique_email(user: &GooseUser) -> String {
    let n = REGISTRATIONS.fetch_add(1, Ordering::Relaxed);
    let run = env::var("RUN_ID").unwrap_or_else(|_| "local".to_string());
    format!("loadtest-{run}-{}-{n}@example.org", user.weighted_users_index)
}

fn register_body(email: &str) -> serde_json::Value {
    json!({
        "email": email,
        "password": PASSWORD,
        "name": "Load Tester",
        "phone_number": "555-0100",
        "preferences": ["economics", "trading"],
        "location": "Testville"
    })
}

async fn health_check(user: &mut GooseUser) -> TransactionResult {
    let _goose_metrics = user.get("/healthz").await?;
    Ok(())
}

/// One-shot register + login round trip.
async fn register_and_login(user: &mut GooseUser) -> TransactionResult {
    let email = unique_email(user);
    let _goose_metrics = user
        .post_json("/api/auth/register", &register_body(&email))
        .await?;
    let _goose_metrics = user
        .post_json(
            "/api/auth/login",
            &json!({"email": email, "password": PASSWORD}),
        )
        .await?;
    Ok(())
}

/// On-start transaction: register once and keep the access token around.
async fn start_session(user: &mut GooseUser) -> TransactionResult {
    let email = unique_email(user);
    let goose_metrics = user
        .post_json("/api/auth/register", &register_body(&email))
        .await?;

    if let Ok(response) = goose_metrics.response {
        if let Ok(body) = response.json::<serde_json::Value>().await {
            if let Some(token) = body["access_token"].as_str() {
                user.set_session_data(AccessToken(token.to_string()));
            }
        }
    }
    Ok(())
}

/// Fetch the card feed with the stored bearer token.
async fn list_cards(user: &mut GooseUser) -> TransactionResult {
    let token = user
        .get_session_data::<AccessToken>()
        .map(|t| t.0.clone())
        .unwrap_or_default();

    let request_builder = user
        .get_request_builder(&GooseMethod::Get, "/api/cards")?
        .bearer_auth(token);
    let goose_request = GooseRequest::builder()
        .method(GooseMethod::Get)
        .path("/api/cards")
        .set_request_builder(request_builder)
        .build();

    let _goose_metrics = user.request(goose_request).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), GooseError> {
    GooseAttack::initialize()?
        .register_scenario(
            scenario!("HealthCheck").register_transaction(transaction!(health_check)),
        )
        .register_scenario(
            scenario!("AuthFlow").register_transaction(transaction!(register_and_login)),
        )
        .register_scenario(
            scenario!("CardFeed")
                .register_transaction(transaction!(start_session).set_on_start())
                .register_transaction(transaction!(list_cards)),
        )
        .execute()
        .await?;

    Ok(())
}
