//! Backend for the MacroMind card-swiping app.
//!
//! Users register and authenticate with email + password, maintain a swipe
//! profile, and fetch/create content cards. Sessions are a short-lived access
//! JWT plus a long-lived refresh JWT; only a SHA-256 fingerprint of the
//! current refresh token is stored, and every refresh rotates it.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

pub mod accounts;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;

/// Shared resources handed to every request handler via `axum::Extension`.
#[derive(Clone, Debug)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}
