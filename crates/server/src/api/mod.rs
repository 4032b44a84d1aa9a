//! HTTP API for the MacroMind backend.
//!
//! Submodules:
//! - `auth` - Registration/login/session endpoints (/api/auth/*)
//! - `profile` - Profile CRUD endpoints (/api/profile/*)
//! - `cards` - Card feed endpoints (/api/cards)
//! - `health` - Health check endpoint (/healthz)
//! - `openapi` - OpenAPI/Utoipa configuration

pub mod auth;
pub mod cards;
pub mod health;
pub mod openapi;
pub mod profile;

pub use auth::AUTH_TAG;
pub use cards::CARDS_TAG;
pub use health::MISC_TAG;
pub use profile::PROFILE_TAG;

use crate::AppResources;
use crate::accounts::AccountService;
use crate::auth::TokenSigner;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

/// Assemble the full application router. Shared by the binary and the
/// integration tests so both exercise the same middleware stack.
pub fn build_router(resources: AppResources) -> axum::Router {
    let signer = TokenSigner::from_config(&resources.config.auth);
    let accounts = AccountService::new(resources.db.clone(), signer);

    let (router, api) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .nest("/api/auth", auth::router(accounts))
        .nest("/api/profile", profile::router())
        .nest("/api/cards", cards::router())
        .routes(routes!(health::health))
        .layer(axum::Extension(resources))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .split_for_parts();

    router.merge(Redoc::with_url("/api-docs", api))
}

/// Starts the web server with all configured routes.
#[tracing::instrument(skip(resources))]
pub async fn start_webserver(resources: AppResources) -> color_eyre::Result<()> {
    let router = build_router(resources);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("listening on 0.0.0.0:8080");
    axum::serve(listener, router)
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
